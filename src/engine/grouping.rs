//! Digit grouping pass.
//!
//! Scans each speaker's nodes in start-time order, accumulates numeral
//! characters into a run, and on each run boundary writes the converted value
//! into the run's first node while nulling the slots it consumed. All scan
//! state lives in a per-invocation accumulator so concurrent engine calls
//! never share it.

use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::engine::value::ValueConverter;
use crate::lattice::{is_marker, Lattice, NULL_WORD};

/// Kanji and full-width digits 1-9. ASCII digits are deliberately absent:
/// a bare ASCII digit is never combined with its neighbors at this stage.
const DIGITS_ONE_TO_NINE: &[char] = &[
    '一', '二', '三', '四', '五', '六', '七', '八', '九', '１', '２', '３', '４', '５', '６', '７',
    '８', '９',
];

/// Sub-tokens that make the given unit redundant when seen one position back.
fn flush_on_previous(unit: char) -> &'static [char] {
    match unit {
        '千' => &['千', '百', '十', '〇', '零', '０'],
        '百' => &['百', '十', '一', '１', '〇', '零', '０'],
        _ => &['十', '一', '１', '〇', '零', '０'],
    }
}

/// Sub-tokens that make the given unit redundant when seen two positions back.
fn flush_on_second_previous(unit: char) -> &'static [char] {
    match unit {
        '千' => &['千', '百', '十'],
        '百' => &['百', '十'],
        _ => &['十'],
    }
}

/// Transient run state for one speaker scan.
#[derive(Debug, Default)]
struct RunAccumulator {
    /// Accumulated numeral characters, in reading order.
    text: String,
    /// Source node ids of the run, first id owns the flushed result.
    ids: Vec<String>,
    /// Last character consumed into the run.
    before: Option<char>,
    /// Character consumed before that.
    before2: Option<char>,
    /// Prefix the next flushed value with a space when its slot already
    /// emitted a value earlier in the scan.
    insert_space: bool,
    /// First node id of the previous flush.
    last_first_id: Option<String>,
}

impl RunAccumulator {
    fn push(&mut self, ch: char, id: &str) {
        self.text.push(ch);
        if !self.ids.iter().any(|existing| existing == id) {
            self.ids.push(id.to_string());
        }
        self.before2 = self.before;
        self.before = Some(ch);
    }

    /// Clear run state; with `keep_tail` the final character and its node id
    /// seed the next run so a boundary-adjacent unit is not lost.
    fn clear(&mut self, keep_tail: bool) {
        if keep_tail {
            let tail = self.text.chars().last();
            self.text = tail.map(String::from).unwrap_or_default();
            if self.ids.len() > 1 {
                self.ids = self.ids.split_off(self.ids.len() - 1);
            }
            self.before = tail;
            self.before2 = None;
        } else {
            self.text.clear();
            self.ids.clear();
            self.before = None;
            self.before2 = None;
        }
    }
}

/// One grouping scan over the whole lattice.
pub(crate) struct GroupingPass<'a> {
    converter: &'a ValueConverter,
    numeral_re: &'a Regex,
    disallowed_re: &'a Regex,
    excludes: &'a HashSet<String>,
    force: bool,
}

impl<'a> GroupingPass<'a> {
    pub(crate) fn new(
        converter: &'a ValueConverter,
        numeral_re: &'a Regex,
        disallowed_re: &'a Regex,
        excludes: &'a HashSet<String>,
        force: bool,
    ) -> Self {
        Self {
            converter,
            numeral_re,
            disallowed_re,
            excludes,
            force,
        }
    }

    pub(crate) fn run(&self, lattice: &mut Lattice) {
        for speaker in lattice.speaker_ids() {
            self.run_speaker(lattice, &speaker);
        }
    }

    fn run_speaker(&self, lattice: &mut Lattice, speaker: &str) {
        // Snapshot the scan order and words up front: flushes rewrite earlier
        // slots and must not affect what the scan reads.
        let snapshot: Vec<(String, String)> = lattice
            .sorted_ids(speaker)
            .into_iter()
            .filter_map(|id| {
                let word = lattice.word(speaker, &id)?.to_string();
                Some((id, word))
            })
            .collect();

        let mut acc = RunAccumulator::default();

        for (id, word) in &snapshot {
            if is_marker(word) {
                // Boundary markers always terminate a pending run
                self.flush(lattice, speaker, &mut acc, false);
                continue;
            }

            let convertible = self.numeral_re.is_match(word)
                && !self.excludes.contains(word)
                && (self.force || !self.disallowed_re.is_match(word));

            if convertible {
                for ch in word.chars() {
                    self.process_char(lattice, speaker, &mut acc, ch, id);
                }
                continue;
            }

            self.flush(lattice, speaker, &mut acc, false);
            acc.insert_space = false;
        }

        if !acc.text.is_empty() {
            self.flush(lattice, speaker, &mut acc, false);
        }
    }

    fn process_char(
        &self,
        lattice: &mut Lattice,
        speaker: &str,
        acc: &mut RunAccumulator,
        ch: char,
        id: &str,
    ) {
        if matches!(ch, '千' | '百' | '十') {
            if acc
                .before
                .is_some_and(|prev| flush_on_previous(ch).contains(&prev))
            {
                self.flush(lattice, speaker, acc, false);
            } else if acc
                .before2
                .is_some_and(|prev2| flush_on_second_previous(ch).contains(&prev2))
            {
                // A lone leading one composes with a following thousand, so
                // flush the whole run and let the unit start fresh
                if ch == '千' && matches!(acc.before, Some('一') | Some('１')) {
                    self.flush(lattice, speaker, acc, false);
                } else {
                    self.flush(lattice, speaker, acc, true);
                }
            }
            acc.push(ch, id);
        } else if DIGITS_ONE_TO_NINE.contains(&ch) {
            // Two adjacent bare digits never combine into one number here
            if acc
                .before
                .is_some_and(|prev| DIGITS_ONE_TO_NINE.contains(&prev))
            {
                self.flush(lattice, speaker, acc, false);
            }
            acc.push(ch, id);
        } else {
            // Zeros and anything force mode lets through stand alone
            self.flush(lattice, speaker, acc, false);
            acc.push(ch, id);
            self.flush(lattice, speaker, acc, false);
        }
    }

    /// Finalize the pending run: null consumed slots, write the converted
    /// value into the run's first node, and reset the accumulator.
    ///
    /// With `keep_tail` the run's final character is excluded from the
    /// conversion and retained to seed the next run.
    fn flush(&self, lattice: &mut Lattice, speaker: &str, acc: &mut RunAccumulator, keep_tail: bool) {
        if !acc.ids.is_empty() {
            let first_id = acc.ids[0].clone();
            let continues_slot = acc.last_first_id.as_deref() == Some(first_id.as_str());

            let null_from = if continues_slot { 1 } else { 0 };
            for id in &acc.ids[null_from..] {
                lattice.set_word(speaker, id, NULL_WORD);
            }

            let source: String = if keep_tail {
                let count = acc.text.chars().count();
                acc.text.chars().take(count.saturating_sub(1)).collect()
            } else {
                acc.text.clone()
            };
            let converted = self.converter.convert(&source);
            debug!(speaker, run = %source, result = %converted, "flush");

            let current = lattice.word(speaker, &first_id).map(str::to_string);
            match current.as_deref() {
                Some(NULL_WORD) => {
                    let value = if acc.insert_space {
                        format!(" {converted}")
                    } else {
                        converted
                    };
                    lattice.set_word(speaker, &first_id, value);
                }
                Some(existing) => {
                    let appended = format!("{existing} {converted}");
                    lattice.set_word(speaker, &first_id, appended);
                }
                None => {}
            }

            acc.last_first_id = Some(first_id);
        }

        acc.clear(keep_tail);
        acc.insert_space = true;
    }
}
