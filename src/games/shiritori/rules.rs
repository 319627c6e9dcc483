//! Word validation for shiritori.

use super::types::{UsedWords, Word};
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Why a word was rejected.
///
/// The display text is what players see as the game-over message.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum InvalidReason {
    /// Nothing but whitespace was submitted.
    #[display("No word was entered")]
    Empty,
    /// The word has already been played this game.
    #[display("「{word}」 has already been used")]
    Duplicate {
        /// The repeated word.
        word: String,
    },
    /// The word does not start with the required character.
    #[display("「{word}」 must start with 「{required}」")]
    ChainMismatch {
        /// Character the word had to start with.
        required: String,
        /// The offending word.
        word: String,
    },
    /// The word ends in the forbidden character.
    #[display("「{word}」 ends with 「{forbidden}」, which loses the game")]
    ForbiddenEnding {
        /// The offending word.
        word: String,
        /// The forbidden character.
        forbidden: String,
    },
}

/// Checks a candidate word against the game rules.
///
/// Rules are applied in a fixed order and the first failure wins:
/// empty, duplicate, chain mismatch, forbidden ending. An empty
/// `required_start` means no chaining constraint (first move).
#[instrument(skip(word, used_words), fields(word = %word, used = used_words.len()))]
pub fn validate_word(
    word: &Word,
    required_start: Option<&str>,
    used_words: &UsedWords,
    forbidden_ending: &str,
) -> Result<(), InvalidReason> {
    if word.is_blank() {
        debug!("Rejected empty word");
        return Err(InvalidReason::Empty);
    }

    if used_words.contains(word) {
        debug!("Rejected duplicate word");
        return Err(InvalidReason::Duplicate {
            word: word.to_string(),
        });
    }

    if let Some(required) = required_start.filter(|r| !r.is_empty())
        && word.first_char() != Some(required)
    {
        debug!(required, "Rejected chain mismatch");
        return Err(InvalidReason::ChainMismatch {
            required: required.to_string(),
            word: word.to_string(),
        });
    }

    if !forbidden_ending.is_empty() && word.last_char() == Some(forbidden_ending) {
        debug!(forbidden_ending, "Rejected forbidden ending");
        return Err(InvalidReason::ForbiddenEnding {
            word: word.to_string(),
            forbidden: forbidden_ending.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: &str = "ん";

    fn used(words: &[&str]) -> UsedWords {
        let mut set = UsedWords::new();
        for w in words {
            set.insert(Word::new(*w));
        }
        set
    }

    #[test]
    fn test_first_word_without_requirement_is_valid() {
        let result = validate_word(&Word::new("さくら"), None, &UsedWords::new(), N);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        for text in ["", "   ", "\u{3000}"] {
            let result = validate_word(&Word::new(text), Some("ら"), &used(&["さくら"]), N);
            assert_eq!(result, Err(InvalidReason::Empty), "input {text:?}");
        }
    }

    #[test]
    fn test_duplicate_beats_chain_mismatch() {
        // Already used and also starts with the wrong character
        let result = validate_word(&Word::new("さくら"), Some("ぱ"), &used(&["さくら"]), N);
        assert_eq!(
            result,
            Err(InvalidReason::Duplicate {
                word: "さくら".to_string()
            })
        );
    }

    #[test]
    fn test_chain_mismatch_beats_forbidden_ending() {
        let result = validate_word(&Word::new("めろん"), Some("ぱ"), &UsedWords::new(), N);
        assert!(matches!(result, Err(InvalidReason::ChainMismatch { .. })));
    }

    #[test]
    fn test_chain_mismatch_message_names_char_and_word() {
        let err = validate_word(&Word::new("りんご"), Some("ぱ"), &UsedWords::new(), N)
            .expect_err("should mismatch");
        let message = err.to_string();
        assert!(message.contains("ぱ"));
        assert!(message.contains("りんご"));
    }

    #[test]
    fn test_forbidden_ending_rejected() {
        let result = validate_word(&Word::new("めろん"), None, &UsedWords::new(), N);
        assert_eq!(
            result,
            Err(InvalidReason::ForbiddenEnding {
                word: "めろん".to_string(),
                forbidden: N.to_string(),
            })
        );
    }

    #[test]
    fn test_empty_requirement_is_no_requirement() {
        let result = validate_word(&Word::new("らっぱ"), Some(""), &UsedWords::new(), N);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_chain_compares_whole_graphemes() {
        let word = Word::new("か\u{3099}か\u{3099}");
        assert_eq!(
            validate_word(&word, Some("か\u{3099}"), &UsedWords::new(), N),
            Ok(())
        );
        // Base character alone does not satisfy a voiced requirement
        assert!(validate_word(&Word::new("かさ"), Some("か\u{3099}"), &UsedWords::new(), N).is_err());
    }

    #[test]
    fn test_validation_does_not_mutate_used_words() {
        let set = used(&["さくら"]);
        let before = set.clone();
        let _ = validate_word(&Word::new("らっぱ"), Some("ら"), &set, N);
        assert_eq!(set, before);
    }
}
