//! Decimal-point promotion.
//!
//! A spoken "point" comes out of recognition as the punctuation `、` or the
//! word `点` sitting between two numbers. When the surrounding sub-tokens
//! form a plausible decimal reading, the punctuation is promoted to a literal
//! decimal point; otherwise it is left as is.

use crate::engine::value::parse_int;
use crate::lattice::{Lattice, SpeakerView};

/// Point-like sub-tokens: the two spoken variants plus an already-promoted
/// decimal point.
pub(crate) fn is_point_like(token: &str) -> bool {
    matches!(token, "、" | "点" | ".")
}

pub(crate) fn promote_decimal_points(lattice: &mut Lattice) {
    for speaker in lattice.speaker_ids() {
        let view = SpeakerView::build(lattice, &speaker);

        for (i, entry) in view.entries().iter().enumerate() {
            let mut rewritten: Vec<&str> = Vec::with_capacity(entry.tokens.len());

            for (j, token) in entry.tokens.iter().enumerate() {
                if token != "、" && token != "点" {
                    rewritten.push(token);
                    continue;
                }

                let ctx = view.context(i, j);
                let promote = parse_int(&ctx.before).is_some()
                    && parse_int(&ctx.next).is_some()
                    && ctx.next.chars().count() == 1
                    && !is_point_like(&ctx.before2)
                    && !is_point_like(&ctx.next2);

                rewritten.push(if promote { "." } else { token });
            }

            lattice.set_word(&speaker, &entry.id, rewritten.join(" "));
        }
    }
}
