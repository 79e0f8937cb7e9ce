//! Line-oriented table export.
//!
//! Renders a lattice as a `start_time,speaker,content` text table. Rows
//! follow global start-time order; while the same speaker keeps talking the
//! content accumulates inside one quoted field, and a new row begins when the
//! speaker changes. Markers and a fixed stoplist of fillers are dropped.

use crate::lattice::{is_marker, Lattice};

const HEADER: &str = "start_time,speaker,content";

/// Filler words that carry no content worth exporting.
const FILLER_STOPLIST: [&str; 4] = ["はい", "はいはい", "あー", "あぁ"];

pub fn lattice_to_table(lattice: &Lattice) -> String {
    let mut entries: Vec<(f64, bool, u32, String)> = Vec::new();
    for speaker in lattice.speaker_ids() {
        if let Some(nodes) = lattice.nodes(&speaker) {
            for node in nodes.values() {
                entries.push((node.start, node.best_path, node.speaker, node.word.clone()));
            }
        }
    }
    entries.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.2.cmp(&b.2)).then(a.3.cmp(&b.3)));

    let mut body = String::from(HEADER);
    let mut current_speaker: Option<u32> = None;

    for (start, best_path, speaker, word) in entries {
        if !best_path || is_marker(&word) || FILLER_STOPLIST.contains(&word.as_str()) {
            continue;
        }

        let word = word.replace('＋', "+");

        if current_speaker == Some(speaker) {
            // Reopen the previous row's quoted field and extend it
            body.pop();
            body.push_str(&word);
            body.push('"');
        } else {
            body.push_str(&format!("\n{start},{speaker},\"{word}\""));
        }
        current_speaker = Some(speaker);
    }

    body
}
