//! Filtered, time-sorted view of one speaker's nodes.
//!
//! The post-processing passes all operate on the lattice with marker and
//! whitespace-only nodes removed. The view is computed once per pass
//! invocation so every neighbor lookup observes the same snapshot, even while
//! the pass writes rewritten words back into the lattice.

use crate::lattice::{is_marker, Lattice, NULL_WORD};

/// One visible node: its id plus the word pre-split into sub-tokens.
#[derive(Debug, Clone)]
pub struct ViewEntry {
    pub id: String,
    pub tokens: Vec<String>,
}

/// The four sub-tokens surrounding a position, crossing node boundaries.
///
/// Missing neighbors (start/end of the speaker's transcript) are reported as
/// the `!NULL` marker, which no numeric or punctuation test matches.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenContext {
    pub before2: String,
    pub before: String,
    pub next: String,
    pub next2: String,
}

/// Marker-free, time-sorted snapshot of a speaker's nodes.
#[derive(Debug, Clone)]
pub struct SpeakerView {
    entries: Vec<ViewEntry>,
}

impl SpeakerView {
    pub fn build(lattice: &Lattice, speaker: &str) -> Self {
        let entries = lattice
            .sorted_ids(speaker)
            .into_iter()
            .filter_map(|id| {
                let word = lattice.word(speaker, &id)?;
                if is_marker(word) || word.trim().is_empty() {
                    return None;
                }
                Some(ViewEntry {
                    tokens: word.split_whitespace().map(str::to_string).collect(),
                    id,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ViewEntry] {
        &self.entries
    }

    /// The two sub-tokens before and after position `j` of entry `i`.
    ///
    /// When the current entry runs out of sub-tokens in either direction the
    /// window continues into the adjacent entries of the snapshot: a
    /// single-token neighbor contributes one position and the entry beyond it
    /// the second; a multi-token neighbor contributes both.
    pub fn context(&self, i: usize, j: usize) -> TokenContext {
        let tokens = &self.entries[i].tokens;
        let len = tokens.len();

        let (before2, before) = if j == 0 {
            match self.tokens_at(i.checked_sub(1)) {
                Some(prev) if prev.len() == 1 => (
                    self.last_token_at(i.checked_sub(2)),
                    prev[0].clone(),
                ),
                Some(prev) => (prev[prev.len() - 2].clone(), prev[prev.len() - 1].clone()),
                None => (NULL_WORD.to_string(), NULL_WORD.to_string()),
            }
        } else if j == 1 {
            (self.last_token_at(i.checked_sub(1)), tokens[0].clone())
        } else {
            (tokens[j - 2].clone(), tokens[j - 1].clone())
        };

        let (next, next2) = if j + 1 == len {
            match self.tokens_at(Some(i + 1)) {
                Some(following) if following.len() == 1 => (
                    following[0].clone(),
                    self.first_token_at(Some(i + 2)),
                ),
                Some(following) => (following[0].clone(), following[1].clone()),
                None => (NULL_WORD.to_string(), NULL_WORD.to_string()),
            }
        } else if j + 2 == len {
            (tokens[j + 1].clone(), self.first_token_at(Some(i + 1)))
        } else {
            (tokens[j + 1].clone(), tokens[j + 2].clone())
        };

        TokenContext {
            before2,
            before,
            next,
            next2,
        }
    }

    fn tokens_at(&self, index: Option<usize>) -> Option<&[String]> {
        let entry = self.entries.get(index?)?;
        Some(entry.tokens.as_slice())
    }

    fn first_token_at(&self, index: Option<usize>) -> String {
        self.tokens_at(index)
            .and_then(|tokens| tokens.first())
            .cloned()
            .unwrap_or_else(|| NULL_WORD.to_string())
    }

    fn last_token_at(&self, index: Option<usize>) -> String {
        self.tokens_at(index)
            .and_then(|tokens| tokens.last())
            .cloned()
            .unwrap_or_else(|| NULL_WORD.to_string())
    }
}
