//! Numeral normalization engine.
//!
//! Rewrites kanji and full-width numeral tokens in a transcription lattice
//! into canonical Arabic digits while preserving slot timing and speaker
//! attribution. Conversion is fail-open: a run the engine cannot interpret
//! passes through as original text, and the engine itself never errors once
//! constructed.

mod decimal;
mod grouping;
mod merge;
mod separator;
mod spacing;
mod value;

pub use value::{digit_value, parse_int, unit_value, ValueConverter};

use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::Config;
use crate::lattice::Lattice;

use decimal::promote_decimal_points;
use grouping::GroupingPass;
use merge::merge_single_digit_runs;
use separator::insert_sequence_separators;
use spacing::normalize_spacing;

/// Characters that mark a word as carrying numeral content. ASCII digits are
/// absent on purpose: a word that is already plain Arabic needs no grouping.
const NUMERAL_CLASS: &str = "一二三四五六七八九〇零十百千０-９";

/// The normalization engine. Holds only immutable configuration and compiled
/// patterns; every `execute` call keeps its scan state in a private
/// accumulator, so one engine may serve concurrent batch invocations.
pub struct Engine {
    config: Config,
    converter: ValueConverter,
    numeral_re: Regex,
    disallowed_re: Regex,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self> {
        let numeral_re = Regex::new(&format!("[{NUMERAL_CLASS}]"))?;

        // Anything outside the allow-set (numerals, units, punctuation, kana,
        // Latin letters, and the configured unit characters) blocks
        // conversion of the whole word unless force mode is on.
        let disallowed_re = Regex::new(&format!(
            "[^{NUMERAL_CLASS}、.。,\\dあ-んア-ヴｦ-ﾟa-zA-Zａ-ｚＡ-Ｚ{}]",
            regex::escape(&config.unit_chars)
        ))?;

        info!(
            exclude_words = config.exclude_words.len(),
            unit_chars = config.unit_chars.chars().count(),
            "Creating numeral normalization engine"
        );

        Ok(Self {
            converter: ValueConverter::new()?,
            config,
            numeral_re,
            disallowed_re,
        })
    }

    /// Run the full pipeline over a lattice and return the result.
    ///
    /// `extra_excludes` extends the configured exclusion set for this call
    /// only; `force` bypasses the disallowed-character filter (the exclusion
    /// set always wins). The lattice is owned for the duration of the call,
    /// so no aliasing with the caller's data is observable.
    pub fn execute(&self, lattice: Lattice, extra_excludes: &[String], force: bool) -> Lattice {
        let mut lattice = lattice;

        let excludes: HashSet<String> = self
            .config
            .exclude_words
            .iter()
            .chain(extra_excludes)
            .cloned()
            .collect();

        debug!(
            speakers = lattice.speaker_ids().len(),
            force, "Running numeral normalization"
        );

        GroupingPass::new(
            &self.converter,
            &self.numeral_re,
            &self.disallowed_re,
            &excludes,
            force,
        )
        .run(&mut lattice);

        promote_decimal_points(&mut lattice);
        insert_sequence_separators(&mut lattice, &self.config.unit_chars);
        merge_single_digit_runs(&mut lattice);
        normalize_spacing(&mut lattice);

        lattice
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

    fn engine() -> Engine {
        Engine::new(Config::default()).unwrap()
    }

    #[test]
    fn test_pipeline_composes_kanji_number() {
        let result = engine().execute(lattice_of(&["二千三十四"]), &[], false);
        assert_eq!(words(&result), vec!["2034"]);
    }

    #[test]
    fn test_pipeline_promotes_decimal() {
        // Each slot keeps its own timing; the export stage renders the three
        // slots contiguously as "3.5"
        let result = engine().execute(lattice_of(&["三", "点", "五"]), &[], false);
        assert_eq!(words(&result), vec!["3", ".", "5"]);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
