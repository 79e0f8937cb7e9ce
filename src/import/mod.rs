//! Adapter for recognizer export documents.
//!
//! The recognizer exports a nested per-node-graph structure keyed by link id.
//! This adapter keeps only `best_path` links, escapes literal `%` characters,
//! collects the spoken keywords, and flattens the document into the lattice
//! shape the engine consumes. A document that does not match the expected
//! structure is an invalid input: no lattice is produced for it.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::lattice::{is_marker, Lattice, WordNode};

const CHANNEL_KEYS: [&str; 2] = ["firstChannelLabel", "firstChannel"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid recognizer document: {0}")]
    InvalidDocument(String),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::InvalidDocument(err.to_string())
    }
}

/// The flattened lattice plus every recognized (non-marker) word on the best
/// path, in document order.
#[derive(Debug)]
pub struct ImportResult {
    pub lattice: Lattice,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RecognizerExport {
    channels: BTreeMap<String, Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    lattice: BTreeMap<String, NodeGraph>,
}

#[derive(Debug, Deserialize)]
struct NodeGraph {
    links: BTreeMap<String, Link>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Link {
    start: f64,
    end: f64,
    weight: f64,
    best_path: bool,
    speaker: u32,
    word: String,
    intensity: f64,
}

/// Flatten a recognizer export into the `{speaker: {node_id: node}}` shape.
pub fn import_lattice(document: &str) -> Result<ImportResult, ImportError> {
    let export: RecognizerExport = serde_json::from_str(document)?;

    let channel = CHANNEL_KEYS
        .iter()
        .find_map(|key| export.channels.get(*key))
        .ok_or_else(|| {
            ImportError::InvalidDocument(format!(
                "no channel entry named {}",
                CHANNEL_KEYS.join(" or ")
            ))
        })?;

    let mut lattice = Lattice::new();
    let mut keywords = Vec::new();

    for (speaker, graph) in &channel.lattice {
        for (link_id, link) in &graph.links {
            if !link.best_path {
                continue;
            }
            if !link.word.is_empty() && !is_marker(&link.word) {
                keywords.push(link.word.clone());
            }
            lattice.insert(
                speaker.clone(),
                WordNode {
                    id: link_id.clone(),
                    start: link.start,
                    end: link.end,
                    weight: link.weight,
                    best_path: link.best_path,
                    speaker: link.speaker,
                    // Lattice words may end up in printf-style templates
                    word: link.word.replace('%', "%%"),
                    intensity: link.intensity,
                },
            );
        }
    }

    debug!(
        speakers = lattice.speaker_ids().len(),
        keywords = keywords.len(),
        "Imported recognizer export"
    );

    Ok(ImportResult { lattice, keywords })
}
