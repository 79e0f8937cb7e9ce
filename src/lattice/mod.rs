//! Lattice data model shared by the engine, import adapter, and export.
//!
//! A lattice maps speaker ids to time-stamped word nodes. Node ids are unique
//! within a speaker but carry no ordering meaning; the only valid ordering key
//! is `start` (ties broken by node id).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod view;

pub use view::{SpeakerView, TokenContext, ViewEntry};

/// Sentinel word for a consumed or empty slot.
pub const NULL_WORD: &str = "!NULL";
/// Structural boundary marker at the start of an utterance.
pub const ENTER_WORD: &str = "!ENTER";
/// Structural boundary marker at the end of an utterance.
pub const EXIT_WORD: &str = "!EXIT";

/// Returns true for the three reserved marker tokens.
pub fn is_marker(word: &str) -> bool {
    matches!(word, NULL_WORD | ENTER_WORD | EXIT_WORD)
}

/// One timed word entry in the lattice.
///
/// After processing, `word` may contain several space-separated sub-tokens
/// representing merged conversions that share one timing slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordNode {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub weight: f64,
    pub best_path: bool,
    pub speaker: u32,
    pub word: String,
    pub intensity: f64,
}

impl Default for WordNode {
    fn default() -> Self {
        Self {
            id: String::new(),
            start: 0.0,
            end: 0.0,
            weight: 0.0,
            best_path: true,
            speaker: 1,
            word: String::new(),
            intensity: 0.0,
        }
    }
}

impl WordNode {
    pub fn new(
        id: impl Into<String>,
        start: f64,
        end: f64,
        speaker: u32,
        word: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            speaker,
            word: word.into(),
            ..Default::default()
        }
    }
}

/// Per-speaker collection of timed word nodes representing a transcript.
///
/// Backed by ordered maps so iteration is deterministic, but time ordering
/// must always be derived from `start` via [`Lattice::sorted_ids`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lattice {
    speakers: BTreeMap<String, BTreeMap<String, WordNode>>,
}

impl Lattice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under the given speaker, keyed by the node's id.
    pub fn insert(&mut self, speaker: impl Into<String>, node: WordNode) {
        self.speakers
            .entry(speaker.into())
            .or_default()
            .insert(node.id.clone(), node);
    }

    /// Speaker ids, cloned so callers can mutate the lattice while iterating.
    pub fn speaker_ids(&self) -> Vec<String> {
        self.speakers.keys().cloned().collect()
    }

    pub fn nodes(&self, speaker: &str) -> Option<&BTreeMap<String, WordNode>> {
        self.speakers.get(speaker)
    }

    pub fn get(&self, speaker: &str, id: &str) -> Option<&WordNode> {
        self.speakers.get(speaker).and_then(|nodes| nodes.get(id))
    }

    pub fn word(&self, speaker: &str, id: &str) -> Option<&str> {
        self.get(speaker, id).map(|node| node.word.as_str())
    }

    pub fn set_word(&mut self, speaker: &str, id: &str, word: impl Into<String>) {
        if let Some(node) = self
            .speakers
            .get_mut(speaker)
            .and_then(|nodes| nodes.get_mut(id))
        {
            node.word = word.into();
        }
    }

    /// Node ids for a speaker, sorted ascending by `start` with the node id
    /// as a stable tie-break.
    pub fn sorted_ids(&self, speaker: &str) -> Vec<String> {
        let Some(nodes) = self.speakers.get(speaker) else {
            return Vec::new();
        };
        let mut ids: Vec<&String> = nodes.keys().collect();
        ids.sort_by(|a, b| {
            nodes[*a]
                .start
                .total_cmp(&nodes[*b].start)
                .then_with(|| a.cmp(b))
        });
        ids.into_iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_marker() {
        assert!(is_marker("!NULL"));
        assert!(is_marker("!ENTER"));
        assert!(is_marker("!EXIT"));
        assert!(!is_marker("二十三"));
        assert!(!is_marker(""));
    }

    #[test]
    fn test_sorted_ids_orders_by_start_not_key() {
        let mut lattice = Lattice::new();
        lattice.insert("1", WordNode::new("a", 2.0, 2.5, 1, "三"));
        lattice.insert("1", WordNode::new("b", 0.5, 1.0, 1, "一"));
        lattice.insert("1", WordNode::new("c", 1.0, 1.5, 1, "二"));

        assert_eq!(lattice.sorted_ids("1"), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sorted_ids_ties_break_on_id() {
        let mut lattice = Lattice::new();
        lattice.insert("1", WordNode::new("z", 1.0, 1.5, 1, "x"));
        lattice.insert("1", WordNode::new("a", 1.0, 1.5, 1, "y"));

        assert_eq!(lattice.sorted_ids("1"), vec!["a", "z"]);
    }

    #[test]
    fn test_set_word_mutates_in_place() {
        let mut lattice = Lattice::new();
        lattice.insert("1", WordNode::new("a", 0.0, 0.1, 1, "十"));

        lattice.set_word("1", "a", "10");
        assert_eq!(lattice.word("1", "a"), Some("10"));

        // Timing is untouched by word rewrites
        let node = lattice.get("1", "a").unwrap();
        assert_eq!(node.start, 0.0);
        assert_eq!(node.end, 0.1);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut lattice = Lattice::new();
        lattice.insert("1", WordNode::new("0", 0.0, 0.1, 1, "二"));

        let json = serde_json::to_string(&lattice).unwrap();
        let back: Lattice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lattice);
    }
}
