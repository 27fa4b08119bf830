//! Curated formal-to-plain replacement pairs.

/// An immutable, versioned lookup table of manual overrides.
#[derive(Debug, Clone, Copy)]
pub struct ManualTable {
    pub version: u32,
    pub entries: &'static [(&'static str, &'static str)],
}

impl ManualTable {
    pub fn get(&self, word: &str) -> Option<&'static str> {
        let word = word.to_lowercase();
        self.entries
            .iter()
            .find(|(src, _)| *src == word)
            .map(|&(_, dst)| dst)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The default override table shipped with the crate.
pub const MANUAL_OVERRIDES: ManualTable = ManualTable {
    version: 1,
    entries: &[
        ("utilize", "use"),
        ("commence", "start"),
        ("terminate", "end"),
        ("endeavor", "try"),
        ("reside", "live"),
        ("assist", "help"),
        ("purchase", "buy"),
        ("endeavour", "try"),
        ("subsequent", "next"),
        ("prior", "before"),
        ("obtain", "get"),
        ("require", "need"),
        ("demonstrate", "show"),
        ("approximately", "about"),
        ("sufficient", "enough"),
        ("numerous", "many"),
        ("optimal", "best"),
        ("diminish", "reduce"),
        ("increase", "raise"),
        ("decrease", "lower"),
        ("inform", "tell"),
        ("attempt", "try"),
        ("assistive", "helping"),
        ("assistance", "help"),
        ("comprehend", "understand"),
        ("indicate", "show"),
        ("modify", "change"),
        ("nevertheless", "still"),
        ("therefore", "so"),
        ("consequently", "so"),
        ("subsequently", "later"),
        ("commonly", "often"),
        ("frequently", "often"),
        ("illustrate", "show"),
        ("observe", "see"),
        ("perceive", "see"),
        ("possess", "have"),
        ("select", "choose"),
        ("inquire", "ask"),
        ("facilitate", "help"),
    ],
};
