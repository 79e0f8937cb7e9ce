//! Numeral value conversion.
//!
//! Turns a run of digit and place-value characters into its positional value
//! ("二千三十四" → 2034), and substitutes converted runs back into mixed text
//! while leaving everything else untouched.

use anyhow::Result;
use regex::Regex;

/// Decimal value of a kanji, full-width, or ASCII digit character.
pub fn digit_value(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => Some(ch as u32 - '0' as u32),
        '０'..='９' => Some(ch as u32 - '０' as u32),
        '〇' | '零' => Some(0),
        '一' => Some(1),
        '二' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

/// Magnitude of a place-value unit character.
pub fn unit_value(ch: char) -> Option<u64> {
    match ch {
        '十' => Some(10),
        '百' => Some(100),
        '千' => Some(1000),
        _ => None,
    }
}

/// Parse a whole token the way the passes test for "is an integer": every
/// character a decimal digit (ASCII or full-width), optional leading sign.
pub fn parse_int(token: &str) -> Option<i64> {
    let trimmed = token.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for ch in digits.chars() {
        // Kanji digits are not integers here, matching the pass semantics
        let digit = match ch {
            '0'..='9' | '０'..='９' => digit_value(ch)?,
            _ => return None,
        };
        value = value.checked_mul(10)?.checked_add(digit as i64)?;
    }
    Some(if negative { -value } else { value })
}

/// Converts numeral runs to Arabic digits.
pub struct ValueConverter {
    run_re: Regex,
    piece_re: Regex,
}

impl ValueConverter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // Maximal contiguous digit/unit substrings of a mixed string
            run_re: Regex::new(r"[十百千\d]+")?,
            // One unit character or one digit group inside a run
            piece_re: Regex::new(r"[十百千]|\d+")?,
        })
    }

    /// Positional value of a validated numeral run.
    ///
    /// Scans right to left: a digit group multiplies into the pending unit, a
    /// unit character first banks any pending smaller unit, and a bare
    /// trailing unit means one of that unit ("千" → 1000, "一千" → 1000).
    ///
    /// Returns `None` only on arithmetic overflow.
    pub fn compose(&self, token: &str) -> Option<u64> {
        let normalized = to_ascii_digits(token);
        let pieces: Vec<&str> = self
            .piece_re
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .collect();

        let mut unit: u64 = 1;
        let mut result: u64 = 0;
        for piece in pieces.iter().rev() {
            if let Some(magnitude) = piece.chars().next().and_then(unit_value) {
                if unit > 1 {
                    result = result.checked_add(unit)?;
                }
                unit = magnitude;
            } else {
                let digits: u64 = piece.parse().ok()?;
                result = result.checked_add(digits.checked_mul(unit)?)?;
                unit = 1;
            }
        }
        if unit > 1 {
            result = result.checked_add(unit)?;
        }
        Some(result)
    }

    /// Rewrite every numeral run inside `text` to Arabic digits, leaving
    /// non-numeral characters untouched.
    ///
    /// Runs are processed longest first so a short run is never re-converted
    /// inside the replacement of a longer one. Runs that are already pure
    /// decimal digits pass through, as does any run whose value overflows.
    pub fn convert(&self, text: &str) -> String {
        let mut normalized = to_ascii_digits(text);

        let mut runs: Vec<String> = self
            .run_re
            .find_iter(&normalized)
            .map(|m| m.as_str().to_string())
            .collect();
        runs.sort();
        runs.dedup();
        runs.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        for run in runs {
            if run.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if let Some(value) = self.compose(&run) {
                normalized = normalized.replace(&run, &value.to_string());
            }
        }
        normalized
    }
}

/// Fold kanji and full-width digits to their ASCII forms; everything else is
/// passed through (place-value units included).
fn to_ascii_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '十' | '百' | '千' => ch,
            _ => match digit_value(ch) {
                Some(d) => char::from_digit(d, 10).unwrap_or(ch),
                None => ch,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> ValueConverter {
        ValueConverter::new().unwrap()
    }

    #[test]
    fn test_compose_positional_values() {
        let conv = converter();
        assert_eq!(conv.compose("二千三十四"), Some(2034));
        assert_eq!(conv.compose("千"), Some(1000));
        assert_eq!(conv.compose("一千"), Some(1000));
        assert_eq!(conv.compose("二十三"), Some(23));
        assert_eq!(conv.compose("百五"), Some(105));
        assert_eq!(conv.compose("〇"), Some(0));
    }

    #[test]
    fn test_compose_bare_unit_chain() {
        // Each bare unit contributes one of itself
        assert_eq!(converter().compose("十百千"), Some(1110));
    }

    #[test]
    fn test_compose_full_width_digits() {
        let conv = converter();
        assert_eq!(conv.compose("２十３"), Some(23));
        assert_eq!(conv.compose("５百"), Some(500));
    }

    #[test]
    fn test_convert_leaves_plain_text_alone() {
        let conv = converter();
        assert_eq!(conv.convert("こんにちは"), "こんにちは");
        assert_eq!(conv.convert(""), "");
    }

    #[test]
    fn test_convert_substitutes_runs_in_place() {
        let conv = converter();
        assert_eq!(conv.convert("二十三"), "23");
        assert_eq!(conv.convert("第三十五回"), "第35回");
    }

    #[test]
    fn test_convert_keeps_pure_decimal_runs() {
        assert_eq!(converter().convert("123"), "123");
    }

    #[test]
    fn test_convert_handles_multiple_runs() {
        assert_eq!(converter().convert("三百円と五十円"), "300円と50円");
    }

    #[test]
    fn test_parse_int_accepts_full_width() {
        assert_eq!(parse_int("２３"), Some(23));
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("-4"), Some(-4));
    }

    #[test]
    fn test_parse_int_rejects_non_integers() {
        assert_eq!(parse_int("三"), None);
        assert_eq!(parse_int("."), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("12a"), None);
    }
}
