//! Readability grading.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{PrepError, Result};

/// Produces a school-grade readability score for a text.
pub trait ReadabilityScorer: Send + Sync {
    /// The grade, or [`PrepError::ScoreUnavailable`] when the text cannot be scored.
    fn grade(&self, text: &str) -> Result<f64>;
}

impl<F> ReadabilityScorer for F
where
    F: Fn(&str) -> Option<f64> + Send + Sync,
{
    fn grade(&self, text: &str) -> Result<f64> {
        self(text).ok_or_else(|| PrepError::score_unavailable("scorer returned no grade"))
    }
}

/// Flesch-Kincaid grade level, rounded to one decimal place.
///
/// `0.39 * words/sentences + 11.8 * syllables/words - 15.59`
#[derive(Debug, Clone, Copy, Default)]
pub struct FleschKincaid;

impl FleschKincaid {
    pub fn new() -> Self {
        FleschKincaid
    }
}

fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|segment| segment.unicode_words().next().is_some())
        .count()
        .max(1)
}

/// Vowel-group syllable estimate with a silent trailing `e`.
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if letters.is_empty() {
        return 1;
    }
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    let n = letters.len();
    let silent_e = n > 2
        && letters[n - 1] == 'e'
        && !(letters[n - 2] == 'l' && !is_vowel(letters[n - 3]));
    if silent_e && count > 1 {
        count -= 1;
    }
    count.max(1)
}

impl ReadabilityScorer for FleschKincaid {
    fn grade(&self, text: &str) -> Result<f64> {
        let words: Vec<&str> = text.unicode_words().collect();
        if words.is_empty() {
            return Err(PrepError::score_unavailable("text has no words"));
        }
        let word_count = words.len() as f64;
        let sentences = count_sentences(text) as f64;
        let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

        let grade = 0.39 * (word_count / sentences) + 11.8 * (syllables as f64 / word_count) - 15.59;
        if !grade.is_finite() {
            return Err(PrepError::score_unavailable("grade is not finite"));
        }
        Ok((grade * 10.0).round() / 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllable_estimates() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("rhythm"), 1);
        assert_eq!(count_syllables("42"), 1);
    }

    #[test]
    fn test_simple_text_scores_lower_than_dense_text() {
        let scorer = FleschKincaid::new();
        let simple = scorer.grade("The cat sat on the mat. It was fun.").unwrap();
        let dense = scorer
            .grade(
                "Notwithstanding considerable institutional opposition, the \
                 administration systematically implemented comprehensive \
                 organizational restructuring initiatives.",
            )
            .unwrap();
        assert!(simple < 2.0, "simple grade {simple}");
        assert!(dense > 12.0, "dense grade {dense}");
    }

    #[test]
    fn test_empty_text_is_unscorable() {
        let scorer = FleschKincaid::new();
        assert!(matches!(
            scorer.grade("   "),
            Err(PrepError::ScoreUnavailable(_))
        ));
        assert!(matches!(
            scorer.grade("?!."),
            Err(PrepError::ScoreUnavailable(_))
        ));
    }

    #[test]
    fn test_closure_scorer() {
        let scorer = |text: &str| (!text.is_empty()).then_some(4.0);
        assert_eq!(scorer.grade("x").unwrap(), 4.0);
        assert!(scorer.grade("").is_err());
    }
}
