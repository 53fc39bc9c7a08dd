//! Display formatting for amounts and holding periods.
//!
//! Amounts are shown rounded half away from zero to a fixed number of
//! fraction digits with thousands grouping. The default follows the `es-CO`
//! convention (`1.234.567,89`).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Digits after the decimal separator (default: 2).
    pub fraction_digits: u32,
    /// Decimal separator.
    pub decimal_separator: char,
    /// Thousands separator; `None` disables grouping.
    pub group_separator: Option<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            fraction_digits: 2,
            decimal_separator: ',',
            group_separator: Some('.'),
        }
    }
}

impl NumberFormat {
    /// Plain format with `.` as decimal separator and no grouping.
    #[must_use]
    pub const fn plain(fraction_digits: u32) -> Self {
        Self {
            fraction_digits,
            decimal_separator: '.',
            group_separator: None,
        }
    }

    /// Format `value` according to this configuration.
    ///
    /// ```
    /// use fifochain_core::NumberFormat;
    /// use rust_decimal_macros::dec;
    ///
    /// let fmt = NumberFormat::default();
    /// assert_eq!(fmt.format(dec!(1234567.891)), "1.234.567,89");
    /// assert_eq!(fmt.format(dec!(-0.005)), "-0,01");
    /// assert_eq!(NumberFormat::plain(2).format(dec!(7.5)), "7.50");
    /// ```
    #[must_use]
    pub fn format(&self, value: Decimal) -> String {
        let mut rounded =
            value.round_dp_with_strategy(self.fraction_digits, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.fraction_digits);

        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (digits.as_str(), None),
        };

        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if negative {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.group_separator));
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }
}

fn group_digits(int_part: &str, separator: Option<char>) -> String {
    let Some(sep) = separator else {
        return int_part.to_string();
    };

    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Format a holding period, `-` when unknown.
#[must_use]
pub fn format_days(days: Option<i64>) -> String {
    match days {
        Some(1) => "1 day".to_string(),
        Some(n) => format!("{n} days"),
        None => "-".to_string(),
    }
}
