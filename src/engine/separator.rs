//! Consecutive-number separator insertion.
//!
//! Two adjacent single digits can be either one number read digit by digit or
//! two sequential counts ("three, four"). When the digits ascend by one and
//! the following context starts with a configured unit character, a `，` is
//! inserted so the pair is not later merged into a single number.

use crate::engine::value::parse_int;
use crate::lattice::{Lattice, SpeakerView};

const SEPARATOR: &str = "，";

pub(crate) fn insert_sequence_separators(lattice: &mut Lattice, unit_chars: &str) {
    for speaker in lattice.speaker_ids() {
        let view = SpeakerView::build(lattice, &speaker);
        let mut after_point = false;

        for (i, entry) in view.entries().iter().enumerate() {
            let mut rewritten: Vec<String> = Vec::with_capacity(entry.tokens.len());

            for (j, token) in entry.tokens.iter().enumerate() {
                if token.chars().count() > 1 || token == "0" {
                    rewritten.push(token.clone());
                    continue;
                }
                if token == "." {
                    rewritten.push(token.clone());
                    after_point = true;
                    continue;
                }

                let ctx = view.context(i, j);

                let (current, next) = match (parse_int(token), parse_int(&ctx.next)) {
                    (Some(current), Some(next)) => (current, next),
                    _ => {
                        rewritten.push(token.clone());
                        after_point = false;
                        continue;
                    }
                };

                // A numeric predecessor means this digit is already part of a
                // longer reading
                if parse_int(&ctx.before).is_some() {
                    rewritten.push(token.clone());
                    continue;
                }

                if parse_int(&ctx.next2).is_none() {
                    let unit_follows = ctx
                        .next2
                        .chars()
                        .next()
                        .is_some_and(|first| unit_chars.contains(first));

                    if ctx.next.chars().count() == 1
                        && next - current == 1
                        && !after_point
                        && unit_follows
                    {
                        rewritten.push(token.clone());
                        rewritten.push(SEPARATOR.to_string());
                        continue;
                    }
                }

                rewritten.push(token.clone());
            }

            lattice.set_word(&speaker, &entry.id, rewritten.join(" "));
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
    fn test_inserts_between_sequential_digits_before_unit() {
        let mut lattice = lattice_of(&["3", "4", "回は"]);
        insert_sequence_separators(&mut lattice, "回");
        assert_eq!(words(&lattice), vec!["3 ，", "4", "回は"]);
    }

    #[test]
    fn test_no_separator_without_unit_context() {
        let mut lattice = lattice_of(&["3", "4", "です"]);
        insert_sequence_separators(&mut lattice, "回");
        assert_eq!(words(&lattice), vec!["3", "4", "です"]);
    }

    #[test]
    fn test_no_separator_when_not_sequential() {
        let mut lattice = lattice_of(&["3", "5", "回は"]);
        insert_sequence_separators(&mut lattice, "回");
        assert_eq!(words(&lattice), vec!["3", "5", "回は"]);
    }

    #[test]
    fn test_no_separator_after_decimal_point() {
        let mut lattice = lattice_of(&["1", ".", "3", "4", "回は"]);
        insert_sequence_separators(&mut lattice, "回");
        assert_eq!(words(&lattice), vec!["1", ".", "3", "4", "回は"]);
    }

    #[test]
    fn test_no_separator_inside_longer_reading() {
        // 2 3 4: every digit has a numeric neighbor, so this reads as one
        // number spelled digit by digit
        let mut lattice = lattice_of(&["2", "3", "4", "回は"]);
        insert_sequence_separators(&mut lattice, "回");
        assert_eq!(words(&lattice), vec!["2", "3", "4", "回は"]);
    }

    #[test]
    fn test_zero_is_never_separated() {
        let mut lattice = lattice_of(&["0", "1", "回は"]);
        insert_sequence_separators(&mut lattice, "回");
        assert_eq!(words(&lattice), vec!["0", "1", "回は"]);
    }
}
