//! Sentence boundary detection.
//!
//! Splits cleaned text on terminal punctuation with heuristics for
//! abbreviations and initials, so "Dr. Smith spoke." stays one sentence.

/// Lowercased tokens that end in a period without terminating a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "rev", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "cf",
    "inc", "ltd", "co", "corp", "dept", "est", "approx", "no", "vol", "fig",
];

/// Split text into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;

    let mut i = 0;
    while i < chars.len() {
        if matches!(chars[i], '.' | '!' | '?') {
            // Absorb the punctuation run and any trailing closers.
            let mut end = i + 1;
            while end < chars.len() && matches!(chars[end], '.' | '!' | '?' | '"' | '\'' | ')') {
                end += 1;
            }

            if is_boundary(&chars, start, i, end) {
                push_sentence(&chars[start..end], &mut sentences);
                start = end;
            }
            i = end;
        } else {
            i += 1;
        }
    }

    // Trailing text without terminal punctuation is still a sentence.
    if start < chars.len() {
        push_sentence(&chars[start..], &mut sentences);
    }

    sentences
}

fn push_sentence(chars: &[char], sentences: &mut Vec<String>) {
    let sentence: String = chars.iter().collect();
    let sentence = sentence.trim().to_string();
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

/// Decide whether the terminal punctuation at `punct` ends a sentence.
/// `end` is the first position after the punctuation run.
fn is_boundary(chars: &[char], start: usize, punct: usize, end: usize) -> bool {
    if end >= chars.len() {
        return true;
    }

    // A boundary needs following whitespace; "3.14" is not one.
    if !chars[end].is_whitespace() {
        return false;
    }

    // The next sentence starts with something capital-ish.
    let mut next = end;
    while next < chars.len() && chars[next].is_whitespace() {
        next += 1;
    }
    if next >= chars.len() {
        return true;
    }
    if chars[next].is_lowercase() {
        return false;
    }

    if chars[punct] == '.' {
        // Check the word before the period for abbreviations and initials.
        let mut word_start = punct;
        while word_start > start && !chars[word_start - 1].is_whitespace() {
            word_start -= 1;
        }
        let word: String = chars[word_start..punct].iter().collect();
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '.')
            .to_lowercase();

        if word.chars().count() == 1 && word.chars().all(|c| c.is_alphabetic()) {
            return false;
        }
        if ABBREVIATIONS.contains(&word.as_str()) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        let sentences = split_sentences("Cats are mammals. Dogs are mammals too.");
        assert_eq!(
            sentences,
            vec!["Cats are mammals.", "Dogs are mammals too."]
        );
    }

    #[test]
    fn test_question_and_exclamation() {
        let sentences = split_sentences("Is this real? It is! Good.");
        assert_eq!(sentences, vec!["Is this real?", "It is!", "Good."]);
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let sentences = split_sentences("Dr. Smith arrived late. He apologized.");
        assert_eq!(
            sentences,
            vec!["Dr. Smith arrived late.", "He apologized."]
        );

        let sentences = split_sentences("Use markers, e.g. Red ones. They work.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_initials_do_not_split() {
        let sentences = split_sentences("J. R. Tolkien wrote it. Many read it.");
        assert_eq!(
            sentences,
            vec!["J. R. Tolkien wrote it.", "Many read it."]
        );
    }

    #[test]
    fn test_decimal_numbers_do_not_split() {
        let sentences = split_sentences("Pi is about 3.14 roughly. Everyone knows.");
        assert_eq!(
            sentences,
            vec!["Pi is about 3.14 roughly.", "Everyone knows."]
        );
    }

    #[test]
    fn test_lowercase_continuation_does_not_split() {
        let sentences = split_sentences("It fell. and then recovered. The end.");
        assert_eq!(
            sentences,
            vec!["It fell. and then recovered.", "The end."]
        );
    }

    #[test]
    fn test_trailing_text_without_punctuation() {
        let sentences = split_sentences("First sentence. and no ending here");
        assert_eq!(sentences, vec!["First sentence. and no ending here"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }
}
