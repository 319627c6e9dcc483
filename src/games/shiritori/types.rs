//! Core domain types for shiritori.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Text accepted as a successful move in the history log.
pub const VALID_WORD_MESSAGE: &str = "Valid word";

/// The default forbidden ending (the moraic nasal).
pub const DEFAULT_FORBIDDEN_ENDING: &str = "ん";

/// A played word.
///
/// Character access works on extended grapheme clusters, so a symbol
/// made of several code points still counts as one character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    /// Wraps raw text as a word. No validation happens here.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the word text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the word is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First grapheme, or `None` for an empty word.
    pub fn first_char(&self) -> Option<&str> {
        self.0.graphemes(true).next()
    }

    /// Last grapheme, or `None` for an empty word.
    pub fn last_char(&self) -> Option<&str> {
        self.0.graphemes(true).next_back()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Word {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Words already played, in the order they were accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsedWords(Vec<Word>);

impl UsedWords {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match membership test.
    pub fn contains(&self, word: &Word) -> bool {
        self.0.iter().any(|w| w == word)
    }

    /// Adds a word. Returns `false` and leaves the set untouched if the
    /// word is already present.
    pub fn insert(&mut self, word: Word) -> bool {
        if self.contains(&word) {
            return false;
        }
        self.0.push(word);
        true
    }

    /// Words in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.0.iter()
    }

    /// Number of words played.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing has been played yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Empties the set.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Which side produced a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// The human player.
    User,
    /// The automated opponent.
    Opponent,
}

impl Side {
    /// Returns the other side.
    pub fn other(self) -> Self {
        match self {
            Side::User => Side::Opponent,
            Side::Opponent => Side::User,
        }
    }
}

/// One submission, accepted or not.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Who submitted the word.
    actor: Side,
    /// The submitted text. Empty when the opponent failed to answer.
    word: String,
    /// When the submission was recorded.
    timestamp: DateTime<Utc>,
    /// Whether the word was legal.
    accepted: bool,
    /// Validation outcome or failure detail.
    message: String,
}

impl HistoryEntry {
    /// Records an accepted word.
    pub fn new_accepted(actor: Side, word: &Word) -> Self {
        Self {
            actor,
            word: word.to_string(),
            timestamp: Utc::now(),
            accepted: true,
            message: VALID_WORD_MESSAGE.to_string(),
        }
    }

    /// Records a rejected word or a failed opponent response.
    pub fn new_rejected(actor: Side, word: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            actor,
            word: word.into(),
            timestamp: Utc::now(),
            accepted: false,
            message: message.into(),
        }
    }
}

/// Tunable rules for a session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct GameRules {
    /// Ending that makes the producer of a word lose.
    #[setters(into)]
    forbidden_ending: String,
    /// Upper bound on a single opponent move.
    move_timeout: Duration,
}

impl GameRules {
    /// Creates rules with an explicit forbidden ending and opponent timeout.
    pub fn new(forbidden_ending: impl Into<String>, move_timeout: Duration) -> Self {
        Self {
            forbidden_ending: forbidden_ending.into(),
            move_timeout,
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self::new(DEFAULT_FORBIDDEN_ENDING, Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_char_hiragana() {
        let word = Word::new("さくら");
        assert_eq!(word.first_char(), Some("さ"));
        assert_eq!(word.last_char(), Some("ら"));
    }

    #[test]
    fn test_last_char_combining_mark_is_one_grapheme() {
        // か + combining dakuten
        let word = Word::new("たまか\u{3099}");
        assert_eq!(word.last_char(), Some("か\u{3099}"));
    }

    #[test]
    fn test_empty_word_has_no_chars() {
        let word = Word::new("");
        assert_eq!(word.first_char(), None);
        assert_eq!(word.last_char(), None);
        assert!(word.is_blank());
        assert!(Word::new("  \t").is_blank());
    }

    #[test]
    fn test_used_words_rejects_duplicate_insert() {
        let mut used = UsedWords::new();
        assert!(used.insert(Word::new("りんご")));
        assert!(!used.insert(Word::new("りんご")));
        assert_eq!(used.len(), 1);
    }

    #[test]
    fn test_used_words_keeps_insertion_order() {
        let mut used = UsedWords::new();
        used.insert(Word::new("さくら"));
        used.insert(Word::new("らっぱ"));
        used.insert(Word::new("ぱんだ"));
        let words: Vec<&str> = used.iter().map(Word::as_str).collect();
        assert_eq!(words, ["さくら", "らっぱ", "ぱんだ"]);
    }

    #[test]
    fn test_history_entry_constructors_set_accepted_flag() {
        let ok = HistoryEntry::new_accepted(Side::User, &Word::new("さくら"));
        assert!(*ok.accepted());
        assert_eq!(ok.message(), VALID_WORD_MESSAGE);

        let bad = HistoryEntry::new_rejected(Side::Opponent, "", "timed out");
        assert!(!*bad.accepted());
        assert_eq!(bad.word(), "");
    }

    #[test]
    fn test_side_serializes_lowercase() {
        let json = serde_json::to_string(&Side::Opponent).expect("serialize");
        assert_eq!(json, "\"opponent\"");
        assert_eq!(Side::User.to_string(), "user");
    }
}
