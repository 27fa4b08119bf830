use proptest::prelude::*;

use tinyprep::{SynonymMap, SynonymMapper, normalize};

fn mapper() -> SynonymMapper {
    let map: SynonymMap = [("utilize", "use"), ("purchase", "buy")]
        .into_iter()
        .collect();
    SynonymMapper::new(&map)
}

fn non_word_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_alphanumeric() && *c != '_')
        .collect()
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in "\\PC{0,80}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_output_stays_in_alphabet(text in "\\PC{0,80}") {
        let out = normalize(&text);
        prop_assert!(out
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | ' ' | '\n' | ',' | '.' | '!' | '?')));
        prop_assert_eq!(out.trim(), out.as_str());
    }

    #[test]
    fn unmapped_words_pass_through(text in "[a-oq-tv-zA-OQ-TV-Z0-9 ,.!?\t\n]{0,60}") {
        // No 'u' or 'p', so neither map key can occur.
        prop_assert_eq!(mapper().simplify(&text), text.as_str());
    }

    #[test]
    fn replacement_keeps_surrounding_characters(
        words in prop::collection::vec(
            prop::sample::select(vec!["utilize", "Utilize", "UTILIZE", "purchase", "cat", "dog"]),
            1..12,
        ),
        separators in prop::collection::vec(
            prop::sample::select(vec![" ", ", ", "! ", "\t", " -- ", "\n"]),
            12,
        ),
    ) {
        let text: String = words
            .iter()
            .zip(&separators)
            .flat_map(|(word, sep)| [*word, *sep])
            .collect();
        let out = mapper().simplify(&text);
        prop_assert_eq!(non_word_chars(&out), non_word_chars(&text));
        prop_assert!(!out.to_lowercase().contains("utilize"));
    }
}
