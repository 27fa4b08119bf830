//! Suffix-stripping fallback used when no synonym is found.
//!
//! This is a crude heuristic, not a lemmatizer: it proposes one base form and
//! the caller decides whether that form is a known easy word.

/// Propose a base form for `word` by applying the first matching suffix rule.
///
/// Returns the lowercased word unchanged when no rule applies.
pub fn heuristic_stem(word: &str) -> String {
    let w = word.to_lowercase();
    let len = w.chars().count();

    if len > 4 && w.ends_with("ies") {
        return format!("{}y", &w[..w.len() - 3]);
    }
    if len > 3 && w.ends_with("es") {
        return w[..w.len() - 2].to_string();
    }
    if len > 3 && w.ends_with('s') {
        return w[..w.len() - 1].to_string();
    }
    if len > 5 && w.ends_with("ing") {
        return undouble(&w[..w.len() - 3]);
    }
    if len > 4 && w.ends_with("ed") {
        return undouble(&w[..w.len() - 2]);
    }
    if len > 4 && w.ends_with("ly") {
        return w[..w.len() - 2].to_string();
    }
    w
}

/// Drop one of a doubled final letter: `stopp` -> `stop`.
fn undouble(stem: &str) -> String {
    let mut chars = stem.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(last), Some(prev)) if last == prev => {
            stem[..stem.len() - last.len_utf8()].to_string()
        }
        _ => stem.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_rules() {
        assert_eq!(heuristic_stem("berries"), "berry");
        assert_eq!(heuristic_stem("boxes"), "box");
        assert_eq!(heuristic_stem("dogs"), "dog");
        assert_eq!(heuristic_stem("running"), "run");
        assert_eq!(heuristic_stem("walking"), "walk");
        assert_eq!(heuristic_stem("stopped"), "stop");
        assert_eq!(heuristic_stem("jumped"), "jump");
        assert_eq!(heuristic_stem("quickly"), "quick");
    }

    #[test]
    fn test_length_guards() {
        // Too short for their rules.
        assert_eq!(heuristic_stem("yes"), "yes");
        assert_eq!(heuristic_stem("bus"), "bus");
        assert_eq!(heuristic_stem("sing"), "sing");
        assert_eq!(heuristic_stem("bed"), "bed");
        assert_eq!(heuristic_stem("fly"), "fly");
    }

    #[test]
    fn test_unmatched_word_is_returned_lowercased() {
        assert_eq!(heuristic_stem("Happy"), "happy");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // "-es" fires before the plain "-s" rule.
        assert_eq!(heuristic_stem("makes"), "mak");
    }
}
