//! Rule-based ASL gloss conversion.
//!
//! A deterministic, dependency-free translation: uppercase the text,
//! simplify contractions and copulas, drop function words that ASL gloss
//! omits, and wrap the result into short lines. It approximates gloss
//! conventions without any linguistic model and never fails, which also
//! makes it the default backend when no LLM is configured.

use super::GlossTranslator;
use crate::error::GlossError;
use async_trait::async_trait;
use regex::Regex;

/// Multi-word and contraction rewrites, applied in order on the uppercased
/// text. Longer patterns come first so "SHE IS" is not clipped by "HE IS".
const REWRITES: &[(&str, &str)] = &[
    ("I'M", "I"),
    ("YOU'RE", "YOU"),
    ("SHE'S", "SHE"),
    ("HE'S", "HE"),
    ("IT'S", "IT"),
    ("WE'RE", "WE"),
    ("THEY'RE", "THEY"),
    ("ISN'T", "NOT"),
    ("AREN'T", "NOT"),
    ("WASN'T", "NOT"),
    ("WEREN'T", "NOT"),
    ("DON'T", "NOT"),
    ("DOESN'T", "NOT"),
    ("DIDN'T", "NOT"),
    ("WON'T", "WILL NOT"),
    ("CAN'T", "CANNOT"),
    ("I AM", "I"),
    ("YOU ARE", "YOU"),
    ("SHE IS", "SHE"),
    ("HE IS", "HE"),
    ("IT IS", "IT"),
    ("WE ARE", "WE"),
    ("THEY ARE", "THEY"),
];

/// Function words ASL gloss drops entirely.
const DROPPED_WORDS: &[&str] = &["THE", "A", "AN", "TO", "OF", "FOR", "AND", "OR", "BUT"];

/// Rule-based gloss translator.
pub struct RuleBasedGloss {
    rewrites: Vec<(Regex, &'static str)>,
    words_per_line: usize,
}

impl RuleBasedGloss {
    pub fn new(words_per_line: usize) -> Self {
        let rewrites = REWRITES
            .iter()
            .map(|(pattern, replacement)| {
                let regex = Regex::new(&format!(r"\b{}\b", regex::escape(pattern)))
                    .expect("Invalid regex");
                (regex, *replacement)
            })
            .collect();

        Self {
            rewrites,
            words_per_line: words_per_line.max(1),
        }
    }

    /// Convert English text to gloss notation.
    pub fn convert(&self, text: &str) -> String {
        let mut gloss = text.to_uppercase();

        for (regex, replacement) in &self.rewrites {
            gloss = regex.replace_all(&gloss, *replacement).into_owned();
        }

        // Strip quotes and commas; collapse ! and ? to sentence periods.
        let gloss: String = gloss
            .chars()
            .filter_map(|c| match c {
                '\'' | '"' | ',' => None,
                '!' | '?' => Some('.'),
                c => Some(c),
            })
            .collect();

        let words: Vec<&str> = gloss
            .split_whitespace()
            .filter(|w| !DROPPED_WORDS.contains(&w.trim_matches('.')))
            .collect();

        // Short lines read closer to signing rhythm than prose paragraphs.
        words
            .chunks(self.words_per_line)
            .map(|line| line.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for RuleBasedGloss {
    fn default() -> Self {
        Self::new(10)
    }
}

#[async_trait]
impl GlossTranslator for RuleBasedGloss {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn translate(&self, text: &str) -> std::result::Result<String, GlossError> {
        Ok(self.convert(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercases_and_drops_function_words() {
        let gloss = RuleBasedGloss::default().convert("The cat sat on a mat.");
        assert_eq!(gloss, "CAT SAT ON MAT.");
    }

    #[test]
    fn test_contractions_simplified() {
        let gloss = RuleBasedGloss::default().convert("I'm happy and they're not.");
        assert_eq!(gloss, "I HAPPY THEY NOT.");

        let gloss = RuleBasedGloss::default().convert("She is here. He is not.");
        assert_eq!(gloss, "SHE HERE. HE NOT.");
    }

    #[test]
    fn test_negation_contractions() {
        let gloss = RuleBasedGloss::default().convert("Dogs don't fly. Cats can't either.");
        assert_eq!(gloss, "DOGS NOT FLY. CATS CANNOT EITHER.");
    }

    #[test]
    fn test_punctuation_simplified() {
        let gloss = RuleBasedGloss::default().convert("Really? Yes, \"really\"!");
        assert_eq!(gloss, "REALLY. YES REALLY.");
    }

    #[test]
    fn test_rewrites_respect_word_boundaries() {
        // "THE ISLAND" must not trip the "HE IS" rewrite.
        let gloss = RuleBasedGloss::default().convert("The island is big.");
        assert_eq!(gloss, "ISLAND IS BIG.");
    }

    #[test]
    fn test_line_wrapping() {
        let text = "one two three four five six seven eight";
        let gloss = RuleBasedGloss::new(3).convert(text);
        assert_eq!(
            gloss,
            "ONE TWO THREE\nFOUR FIVE SIX\nSEVEN EIGHT"
        );
    }

    #[test]
    fn test_deterministic() {
        let translator = RuleBasedGloss::default();
        let text = "The market fell today, and it's likely to fall again.";
        assert_eq!(translator.convert(text), translator.convert(text));
    }
}
