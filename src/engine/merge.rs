//! Single-digit run merge.
//!
//! Digit-by-digit readings come out of grouping as consecutive nodes each
//! holding one digit. This pass pulls such a run into the run's first node so
//! the digits share one timing slot, nulling the slots it emptied.

use crate::engine::value::parse_int;
use crate::lattice::{is_marker, Lattice, NULL_WORD};

pub(crate) fn merge_single_digit_runs(lattice: &mut Lattice) {
    for speaker in lattice.speaker_ids() {
        let order = lattice.sorted_ids(&speaker);
        let mut run: Vec<String> = Vec::new();

        for id in order {
            let Some(word) = lattice.word(&speaker, &id).map(str::to_string) else {
                continue;
            };

            if is_marker(&word) {
                merge_run(lattice, &speaker, &mut run);
                continue;
            }
            if word.trim().is_empty() {
                // An empty slot neither joins nor ends a run
                continue;
            }

            let all_single_digits = word
                .split_whitespace()
                .all(|token| token.chars().count() == 1 && parse_int(token).is_some());

            if all_single_digits {
                run.push(id);
            } else {
                merge_run(lattice, &speaker, &mut run);
            }
        }

        merge_run(lattice, &speaker, &mut run);
    }
}

fn merge_run(lattice: &mut Lattice, speaker: &str, run: &mut Vec<String>) {
    if run.len() > 1 {
        let joined = run
            .iter()
            .filter_map(|id| lattice.word(speaker, id))
            .collect::<Vec<_>>()
            .join(" ");
        lattice.set_word(speaker, &run[0], joined);
        for id in &run[1..] {
            lattice.set_word(speaker, id, NULL_WORD);
        }
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::WordNode;

    fn lattice_of(words: &[&str]) -> Lattice {
        let mut lattice = Lattice::new();
        for (i, word) in words.iter().enumerate() {
            lattice.insert(
                "1",
                WordNode::new(format!("n{i:03}"), i as f64, i as f64 + 1.0, 1, *word),
            );
        }
        lattice
    }

    fn words(lattice: &Lattice) -> Vec<String> {
        lattice
            .sorted_ids("1")
            .iter()
            .map(|id| lattice.word("1", id).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_merges_consecutive_single_digits() {
        let mut lattice = lattice_of(&["0", "3", "5"]);
        merge_single_digit_runs(&mut lattice);
        assert_eq!(words(&lattice), vec!["0 3 5", "!NULL", "!NULL"]);
    }

    #[test]
    fn test_multi_digit_node_ends_run() {
        let mut lattice = lattice_of(&["3", "4", "23", "5", "6"]);
        merge_single_digit_runs(&mut lattice);
        assert_eq!(words(&lattice), vec!["3 4", "!NULL", "23", "5 6", "!NULL"]);
    }

    #[test]
    fn test_marker_ends_run() {
        let mut lattice = lattice_of(&["3", "!NULL", "4"]);
        merge_single_digit_runs(&mut lattice);
        assert_eq!(words(&lattice), vec!["3", "!NULL", "4"]);
    }

    #[test]
    fn test_non_numeric_ends_run() {
        let mut lattice = lattice_of(&["3", "はい", "4"]);
        merge_single_digit_runs(&mut lattice);
        assert_eq!(words(&lattice), vec!["3", "はい", "4"]);
    }

    #[test]
    fn test_multi_token_single_digits_join_run() {
        let mut lattice = lattice_of(&["3 4", "5"]);
        merge_single_digit_runs(&mut lattice);
        assert_eq!(words(&lattice), vec!["3 4 5", "!NULL"]);
    }
}
