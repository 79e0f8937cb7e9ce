//! Spacing normalization.
//!
//! Final pass. Walks each speaker's visible nodes newest-first and each
//! node's sub-tokens in reverse, deciding at every boundary whether adjacent
//! numeric sub-tokens concatenate directly or keep a separating space.
//! Single-digit neighbors concatenate ("1 2 3" → "123"); longer numbers stay
//! apart; around a decimal point exactly one digit glues to the left
//! ("2 3 . 5 6" → "2 3.56").

use crate::engine::value::parse_int;
use crate::lattice::{Lattice, SpeakerView};

#[derive(Debug, Default)]
struct SpacingState {
    /// Character length of the numeric sub-token processed last (to the
    /// right of the current one), 0 when none.
    next_len: usize,
    /// A numeric sub-token was just emitted, so a boundary space may apply.
    pending_space: bool,
    /// Currently left of a decimal point.
    after_point: bool,
    /// Sub-tokens emitted since the decimal point.
    count: u32,
}

pub(crate) fn normalize_spacing(lattice: &mut Lattice) {
    for speaker in lattice.speaker_ids() {
        let view = SpeakerView::build(lattice, &speaker);
        let mut state = SpacingState::default();

        for entry in view.entries().iter().rev() {
            let mut tail = String::new();

            for token in entry.tokens.iter().rev() {
                if token == "." {
                    state.next_len = 0;
                    state.pending_space = false;
                    state.after_point = true;
                    state.count = 1;
                    tail = format!("{token}{tail}");
                    continue;
                }

                if parse_int(token).is_none() {
                    // Non-numeric sub-tokens keep a space on both sides, so
                    // the pass stays idempotent once a decimal has fused
                    state = SpacingState {
                        pending_space: true,
                        ..Default::default()
                    };
                    tail = if tail.is_empty() {
                        token.clone()
                    } else {
                        format!("{token} {tail}")
                    };
                    continue;
                }

                let token_len = token.chars().count();
                let glue = (token_len == 1 && state.next_len == 1) || !state.pending_space;
                if glue {
                    if state.after_point && state.count == 2 {
                        tail = format!("{token} {tail}");
                        state.after_point = false;
                        state.count = 0;
                    } else {
                        tail = format!("{token}{tail}");
                    }
                } else {
                    tail = format!("{token} {tail}");
                }
                state.next_len = token_len;
                state.pending_space = true;
                if state.after_point {
                    state.count += 1;
                }
            }

            if !tail.is_empty() {
                lattice.set_word(&speaker, &entry.id, tail);
            }
        }
    }
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
    fn test_single_digit_run_concatenates() {
        let mut lattice = lattice_of(&["1 2 3"]);
        normalize_spacing(&mut lattice);
        assert_eq!(words(&lattice), vec!["123"]);
    }

    #[test]
    fn test_longer_numbers_keep_space() {
        let mut lattice = lattice_of(&["23 45"]);
        normalize_spacing(&mut lattice);
        assert_eq!(words(&lattice), vec!["23 45"]);
    }

    #[test]
    fn test_decimal_point_joins_neighbors() {
        let mut lattice = lattice_of(&["3 . 5"]);
        normalize_spacing(&mut lattice);
        assert_eq!(words(&lattice), vec!["3.5"]);
    }

    #[test]
    fn test_one_digit_glues_left_of_point() {
        let mut lattice = lattice_of(&["2 3 . 5 6"]);
        normalize_spacing(&mut lattice);
        assert_eq!(words(&lattice), vec!["2 3.56"]);
    }

    #[test]
    fn test_non_numeric_resets_state() {
        let mut lattice = lattice_of(&["はい 3"]);
        normalize_spacing(&mut lattice);
        assert_eq!(words(&lattice), vec!["はい 3"]);
    }

    #[test]
    fn test_number_stays_separated_from_following_word() {
        let mut lattice = lattice_of(&["3 回"]);
        normalize_spacing(&mut lattice);
        assert_eq!(words(&lattice), vec!["3 回"]);
    }

    #[test]
    fn test_fused_decimal_survives_reapplication() {
        let mut lattice = lattice_of(&["2 3.56"]);
        normalize_spacing(&mut lattice);
        assert_eq!(words(&lattice), vec!["2 3.56"]);
    }

    #[test]
    fn test_idempotent_on_normalized_input() {
        let mut lattice = lattice_of(&["2 3 . 5 6", "はい", "1 2 3"]);
        normalize_spacing(&mut lattice);
        let once = words(&lattice);
        normalize_spacing(&mut lattice);
        assert_eq!(words(&lattice), once);
    }
}
