//! Number formatting for legend text.
//!
//! The resizable legend uses short compact notation (`1.2K`, `35M`). The
//! static legend uses the older long form with `million` / `billion` names,
//! space-grouped thousands, and scientific notation for extreme powers of ten.

use serde::{Deserialize, Serialize};
use tsify::Tsify;

const COMPACT_SUFFIXES: [(i32, &str); 5] = [(0, ""), (3, "K"), (6, "M"), (9, "B"), (12, "T")];

/// Powers of ten with a spoken name in the static legend.
const LARGE_NUMBER_NAMES: [(i32, &str); 2] = [(6, "million"), (9, "billion")];

/// Static-legend powers outside `(MIN_NAMED_POWER, MAX_NAMED_POWER)` fall back
/// to scientific notation.
const MIN_NAMED_POWER: i32 = -4;
const MAX_NAMED_POWER: i32 = 12;

fn trim_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Rounds to `digits` significant digits and renders without trailing zeros.
pub fn to_significant(value: f64, digits: i32) -> String {
    if value == 0. || !value.is_finite() {
        return format!("{}", value);
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    trim_zeros(format!("{:.*}", decimals, value))
}

/// Compact short notation: `999`, `1.2K`, `12K`, `123K`, `4.5M`, `2B`, `1.1T`.
///
/// Scaled values below 100 keep two significant digits; larger ones are
/// rounded to integers. Values that round up to 1000 move to the next suffix
/// (`999_999` is `1M`).
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let mut idx = COMPACT_SUFFIXES
        .iter()
        .rposition(|(power, _)| abs >= 10f64.powi(*power))
        .unwrap_or(0);
    loop {
        let (power, suffix) = COMPACT_SUFFIXES[idx];
        let scaled = value / 10f64.powi(power);
        let rendered = if scaled.abs() < 100. {
            to_significant(scaled, 2)
        } else {
            format!("{:.0}", scaled)
        };
        let carries = rendered
            .trim_start_matches('-')
            .parse::<f64>()
            .map_or(false, |r| r >= 1000.);
        if carries && idx + 1 < COMPACT_SUFFIXES.len() {
            idx += 1;
            continue;
        }
        return format!("{}{}", rendered, suffix);
    }
}

/// Groups the integer part in threes separated by spaces: `1 234 567.5`.
/// At most three fraction digits are kept.
pub fn group_thousands(value: f64) -> String {
    let rendered = trim_zeros(format!("{:.3}", value));
    let (sign, rendered) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", rendered),
    };
    let (int, frac) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (rendered, None),
    };
    let mut grouped = String::new();
    for (idx, ch) in int.chars().enumerate() {
        if idx > 0 && (int.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    match frac {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Static-legend text for one grid square: a number, an optional `× 10^n`
/// exponent, and the unit text that follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct LegendText {
    pub number: String,
    pub exponent: Option<i32>,
    pub unit: String,
}

impl LegendText {
    pub fn plain(&self) -> String {
        match self.exponent {
            Some(exponent) => format!("{} × 10^{} {}", self.number, exponent, self.unit),
            None => format!("{}{}", self.number, self.unit),
        }
    }
}

/// Legend text for `nice · 10^power` units.
pub fn format_legend_value(nice: f64, power: i32, unit: &str) -> LegendText {
    if !(MIN_NAMED_POWER < power && power < MAX_NAMED_POWER) {
        return LegendText {
            number: to_significant(nice, 3),
            exponent: Some(power),
            unit: unit.to_string(),
        };
    }
    let named = LARGE_NUMBER_NAMES.iter().find(|(p, _)| *p == power);
    let (number, unit) = if let Some((_, name)) = named {
        (to_significant(nice, 3), format!("  {} {}", name, unit))
    } else if power > 9 {
        (to_significant(nice * 10f64.powi(power - 9), 6), format!(" billion {}", unit))
    } else if power > 6 {
        (to_significant(nice * 10f64.powi(power - 6), 6), format!(" million {}", unit))
    } else {
        (group_thousands(nice * 10f64.powi(power)), format!(" {}", unit))
    };
    LegendText { number, exponent: None, unit }
}

/// `Total: 3.27 million people`, with three significant digits once the
/// total reaches a named power.
pub fn format_total(total: f64, unit: &str) -> String {
    if total <= 0. || !total.is_finite() {
        return format!("Total: {} {}", group_thousands(total.max(0.)), unit);
    }
    let power = total.log10().floor() as i32;
    if !(MIN_NAMED_POWER < power && power < MAX_NAMED_POWER) {
        let mantissa = to_significant(total / 10f64.powi(power), 3);
        return format!("Total: {} × 10^{} {}", mantissa, power, unit);
    }
    let named = LARGE_NUMBER_NAMES.iter().find(|(p, _)| *p == power);
    if let Some((p, name)) = named {
        let mantissa = to_significant(total / 10f64.powi(*p), 3);
        format!("Total: {} {} {}", mantissa, name, unit)
    } else if power > 9 {
        format!("Total: {} billion {}", to_significant(total / 1e9, 3), unit)
    } else if power > 6 {
        format!("Total: {} million {}", to_significant(total / 1e6, 3), unit)
    } else {
        format!("Total: {} {}", group_thousands(total), unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn compact() {
        assert_eq!(format_compact(0.), "0");
        assert_eq!(format_compact(0.5), "0.5");
        assert_eq!(format_compact(12.34), "12");
        assert_eq!(format_compact(999.), "999");
        assert_eq!(format_compact(1234.), "1.2K");
        assert_eq!(format_compact(12345.), "12K");
        assert_eq!(format_compact(123456.), "123K");
        assert_eq!(format_compact(2_000_000.), "2M");
        assert_eq!(format_compact(4_500_000_000.), "4.5B");
        assert_eq!(format_compact(1.1e12), "1.1T");
        assert_eq!(format_compact(-1500.), "-1.5K");
    }

    #[test]
    fn compact_carries_into_next_suffix() {
        assert_eq!(format_compact(999_999.), "1M");
        assert_eq!(format_compact(-999_999.), "-1M");
        assert_eq!(format_compact(999.7), "1K");
        assert_eq!(format_compact(999_400.), "999K");
        assert_eq!(format_compact(2e15), "2000T");
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(1234567.), "1 234 567");
        assert_eq!(group_thousands(999.), "999");
        assert_eq!(group_thousands(1000.5), "1 000.5");
        assert_eq!(group_thousands(-12000.), "-12 000");
        assert_eq!(group_thousands(0.125), "0.125");
    }

    #[test]
    fn legend_values() {
        let t = format_legend_value(5., 6, "people");
        assert_eq!(t.number, "5");
        assert!(t.unit.contains("million people"));

        let t = format_legend_value(2., 7, "people");
        assert_eq!(t.number, "20");
        assert_eq!(t.unit, " million people");

        let t = format_legend_value(5., 10, "USD");
        assert_eq!(t.number, "50");
        assert_eq!(t.unit, " billion USD");

        let t = format_legend_value(2., 4, "km²");
        assert_eq!(t.number, "20 000");
        assert_eq!(t.unit, " km²");
        assert_eq!(t.plain(), "20 000 km²");

        let t = format_legend_value(5., 13, "USD");
        assert_eq!(t.exponent, Some(13));
        assert_eq!(t.plain(), "5 × 10^13 USD");
    }

    #[test]
    fn totals() {
        assert_eq!(format_total(3_270_000., "people"), "Total: 3.27 million people");
        assert_eq!(format_total(45_600_000., "people"), "Total: 45.6 million people");
        assert_eq!(format_total(1_234_567_890_123., "USD"), "Total: 1.23 × 10^12 USD");
        assert_eq!(format_total(54321., "km²"), "Total: 54 321 km²");
    }
}
