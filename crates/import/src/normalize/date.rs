use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_separator_run, r"[^\p{L}\p{N}/\-]+");
re!(re_integer_run, r"\d+");

// ── Pattern tables ───────────────────────────────────────────────────────────

/// Which of two ambiguous numeric orders (`02/03/2025`) is tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Date(&'static str),
    DateTime(&'static str),
    Rfc3339,
    /// "Feb 2025", read as the first of the month.
    MonthYear,
}

const ISO: &[Pattern] = &[
    Pattern::Date("%Y-%m-%d"),
    Pattern::Rfc3339,
    Pattern::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
    Pattern::DateTime("%Y-%m-%dT%H:%M:%S%.fZ"),
    Pattern::DateTime("%Y-%m-%dT%H:%M"),
    Pattern::DateTime("%Y-%m-%d %H:%M:%S%.f"),
    Pattern::DateTime("%Y-%m-%d %H:%M"),
];

const US: &[Pattern] = &[
    Pattern::Date("%m/%d/%Y"),
    Pattern::Date("%m/%d/%y"),
    Pattern::DateTime("%m/%d/%Y %H:%M:%S"),
    Pattern::DateTime("%m/%d/%Y %H:%M"),
    Pattern::DateTime("%m/%d/%Y %I:%M %p"),
];

const EUROPEAN: &[Pattern] = &[
    Pattern::Date("%d/%m/%Y"),
    Pattern::Date("%d/%m/%y"),
    Pattern::Date("%d.%m.%Y"),
    Pattern::Date("%d.%m.%y"),
    Pattern::DateTime("%d/%m/%Y %H:%M:%S"),
    Pattern::DateTime("%d/%m/%Y %H:%M"),
    Pattern::DateTime("%d.%m.%Y %H:%M"),
];

const ASIAN: &[Pattern] = &[
    Pattern::Date("%Y/%m/%d"),
    Pattern::Date("%Y.%m.%d"),
    Pattern::DateTime("%Y/%m/%d %H:%M:%S"),
    Pattern::DateTime("%Y/%m/%d %H:%M"),
];

const US_DASH: &[Pattern] = &[Pattern::Date("%m-%d-%Y"), Pattern::Date("%m-%d-%y")];

const EUROPEAN_DASH: &[Pattern] = &[Pattern::Date("%d-%m-%Y"), Pattern::Date("%d-%m-%y")];

// `%B` accepts both "Feb" and "February" when parsing.
const NAMED_MONTH: &[Pattern] = &[
    Pattern::Date("%B %d, %Y"),
    Pattern::Date("%B %d %Y"),
    Pattern::Date("%d %B %Y"),
    Pattern::Date("%d %B, %Y"),
    Pattern::Date("%d-%B-%Y"),
    Pattern::Date("%d-%B-%y"),
    Pattern::Date("%Y-%B-%d"),
    Pattern::Date("%A, %B %d, %Y"),
    Pattern::Date("%A %B %d %Y"),
    Pattern::DateTime("%B %d, %Y %I:%M %p"),
    Pattern::DateTime("%B %d, %Y %I:%M:%S %p"),
    Pattern::DateTime("%B %d, %Y %H:%M"),
    Pattern::DateTime("%B %d, %Y %H:%M:%S"),
    Pattern::DateTime("%B %d %Y %I:%M %p"),
    Pattern::DateTime("%B %d %Y %H:%M"),
    Pattern::DateTime("%d %B %Y %I:%M %p"),
    Pattern::DateTime("%d %B %Y %H:%M"),
    Pattern::DateTime("%d %B %Y %H:%M:%S"),
    Pattern::MonthYear,
];

fn pattern_groups(order: DateOrder) -> [&'static [Pattern]; 7] {
    match order {
        DateOrder::MonthFirst => [ISO, US, EUROPEAN, ASIAN, US_DASH, EUROPEAN_DASH, NAMED_MONTH],
        DateOrder::DayFirst => [ISO, EUROPEAN, US, ASIAN, EUROPEAN_DASH, US_DASH, NAMED_MONTH],
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

/// How a date was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateConfidence {
    /// A known pattern matched the cell as written.
    Exact,
    /// A known pattern matched after separators were collapsed.
    Normalized,
    /// Built from whatever integers the cell contained, or from the reference day.
    Guessed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub confidence: DateConfidence,
}

impl ParsedDate {
    pub fn is_guessed(&self) -> bool {
        self.confidence == DateConfidence::Guessed
    }
}

/// Cascading date parser. Never fails: the last strategy always produces a date.
#[derive(Debug, Clone, Copy)]
pub struct DateParser {
    order: DateOrder,
    reference: NaiveDate,
}

impl DateParser {
    /// `reference` stands in for "today" when the fallback has nothing to go on.
    pub fn new(order: DateOrder, reference: NaiveDate) -> Self {
        Self { order, reference }
    }

    pub fn parse(&self, raw: &str) -> ParsedDate {
        let raw = raw.trim();

        if let Some(date) = self.try_patterns(raw) {
            return ParsedDate { date, confidence: DateConfidence::Exact };
        }

        let collapsed = collapse_separators(raw);
        if collapsed != raw {
            if let Some(date) = self.try_patterns(&collapsed) {
                return ParsedDate { date, confidence: DateConfidence::Normalized };
            }
        }

        ParsedDate {
            date: guess_from_integers(raw, self.reference),
            confidence: DateConfidence::Guessed,
        }
    }

    fn try_patterns(&self, s: &str) -> Option<NaiveDate> {
        if s.is_empty() {
            return None;
        }
        pattern_groups(self.order)
            .iter()
            .flat_map(|group| group.iter())
            .find_map(|p| try_pattern(*p, s))
    }
}

fn try_pattern(pattern: Pattern, s: &str) -> Option<NaiveDate> {
    let date = match pattern {
        Pattern::Date(fmt) => NaiveDate::parse_from_str(s, fmt).ok()?,
        Pattern::DateTime(fmt) => NaiveDateTime::parse_from_str(s, fmt).ok()?.date(),
        Pattern::Rfc3339 => DateTime::parse_from_rfc3339(s).ok()?.date_naive(),
        Pattern::MonthYear => NaiveDate::parse_from_str(&format!("1 {s}"), "%d %B %Y").ok()?,
    };
    plausible(date).then_some(date)
}

/// `%Y` accepts any digit count, so `02/28/25` would otherwise read as year 25.
fn plausible(date: NaiveDate) -> bool {
    (1000..=9999).contains(&date.year())
}

fn collapse_separators(s: &str) -> String {
    re_separator_run().replace_all(s, " ").trim().to_string()
}

// ── Integer-extraction fallback ──────────────────────────────────────────────

fn guess_from_integers(raw: &str, reference: NaiveDate) -> NaiveDate {
    let mut numbers: Vec<u32> = re_integer_run()
        .find_iter(raw)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    let mut year = take_first(&mut numbers, |n| (1900..=2100).contains(&n)).map(|n| n as i32);

    if year.is_none() && numbers.len() >= 3 {
        if let Some(largest) = numbers.iter().copied().max() {
            take_first(&mut numbers, |n| n == largest);
            let y = if largest < 100 { largest + 2000 } else { largest };
            year = Some(y as i32);
        }
    }

    let month = take_first(&mut numbers, |n| (1..=12).contains(&n));
    let day = take_first(&mut numbers, |n| (1..=31).contains(&n));

    let month = match (year, month) {
        (_, Some(m)) => m,
        (None, None) => reference.month(),
        (Some(_), None) => 1,
    };
    let year = year.unwrap_or_else(|| reference.year());
    let day = day.unwrap_or(1);

    clamped_date(year, month, day).unwrap_or(reference)
}

fn take_first(numbers: &mut Vec<u32>, pred: impl Fn(u32) -> bool) -> Option<u32> {
    let idx = numbers.iter().position(|&n| pred(n))?;
    Some(numbers.remove(idx))
}

/// Pulls an out-of-range day back to the month's last day.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    (1..=day)
        .rev()
        .take(4)
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn reference() -> NaiveDate {
        d(2026, 10, 16)
    }

    fn us() -> DateParser {
        DateParser::new(DateOrder::MonthFirst, reference())
    }

    fn eu() -> DateParser {
        DateParser::new(DateOrder::DayFirst, reference())
    }

    // ── Known patterns ────────────────────────────────────────────────────────

    #[test]
    fn same_day_in_every_notation() {
        let target = d(2025, 2, 28);
        assert_eq!(us().parse("2025-02-28").date, target);
        assert_eq!(us().parse("02/28/2025").date, target);
        assert_eq!(eu().parse("28/02/2025").date, target);
        assert_eq!(us().parse("Feb 28, 2025").date, target);
        assert_eq!(us().parse("2025/02/28").date, target);
        assert_eq!(us().parse("28.02.2025").date, target);
        assert_eq!(us().parse("28-Feb-2025").date, target);
        assert_eq!(us().parse("February 28, 2025").date, target);
        assert_eq!(us().parse("2025-02-28").confidence, DateConfidence::Exact);
    }

    #[test]
    fn timestamps_keep_the_calendar_day() {
        let target = d(2025, 2, 28);
        assert_eq!(us().parse("2025-02-28T13:45:00").date, target);
        assert_eq!(us().parse("2025-02-28T13:45:00.123Z").date, target);
        assert_eq!(us().parse("2025-02-28T23:59:59+02:00").date, target);
        assert_eq!(us().parse("2025-02-28 08:00:00").date, target);
        assert_eq!(us().parse("02/28/2025 8:05 PM").date, target);
    }

    #[test]
    fn named_month_with_time_of_day() {
        let p = us().parse("Feb 28, 2025 10:30 AM");
        assert_eq!(p.date, d(2025, 2, 28));
        assert_eq!(p.confidence, DateConfidence::Exact);

        let p = us().parse("28 Feb 2025 14:05");
        assert_eq!(p.date, d(2025, 2, 28));
        assert_eq!(p.confidence, DateConfidence::Exact);

        assert_eq!(eu().parse("28 February 2025 14:05:09").date, d(2025, 2, 28));
        assert_eq!(us().parse("February 28 2025 9:15 pm").date, d(2025, 2, 28));
    }

    #[test]
    fn ambiguous_numeric_follows_order() {
        assert_eq!(us().parse("02/03/2025").date, d(2025, 2, 3));
        assert_eq!(eu().parse("02/03/2025").date, d(2025, 3, 2));
    }

    #[test]
    fn unambiguous_european_parses_under_us_order() {
        assert_eq!(us().parse("28/02/2025").date, d(2025, 2, 28));
    }

    #[test]
    fn short_years() {
        assert_eq!(us().parse("02/28/25").date, d(2025, 2, 28));
        assert_eq!(us().parse("2/8/25").date, d(2025, 2, 8));
        assert_eq!(us().parse("03/04/05").date, d(2005, 3, 4));
    }

    #[test]
    fn dash_variants() {
        assert_eq!(us().parse("02-28-2025").date, d(2025, 2, 28));
        assert_eq!(us().parse("28-02-2025").date, d(2025, 2, 28));
    }

    #[test]
    fn month_without_day() {
        assert_eq!(us().parse("Feb 2025").date, d(2025, 2, 1));
    }

    // ── Normalized retry ──────────────────────────────────────────────────────

    #[test]
    fn collapses_stray_punctuation() {
        let p = us().parse("Feb. 28, 2025");
        assert_eq!(p.date, d(2025, 2, 28));
        assert_eq!(p.confidence, DateConfidence::Normalized);

        let p = us().parse("  2025-02-28 ");
        assert_eq!(p.confidence, DateConfidence::Exact);
    }

    // ── Fallback ──────────────────────────────────────────────────────────────

    #[test]
    fn unknown_falls_back_to_first_of_reference_month() {
        let p = us().parse("unknown");
        assert_eq!(p.date, d(2026, 10, 1));
        assert!(p.is_guessed());
        assert_eq!(us().parse("").date, d(2026, 10, 1));
    }

    #[test]
    fn year_in_range_anchors_the_guess() {
        let p = us().parse("28 02 2025");
        assert_eq!(p.date, d(2025, 2, 28));
        assert!(p.is_guessed());
    }

    #[test]
    fn year_alone_is_january_first() {
        assert_eq!(us().parse("FY 2023").date, d(2023, 1, 1));
    }

    #[test]
    fn largest_of_three_becomes_year() {
        // No pattern accepts this shape; 24 is the largest and becomes 2024.
        let p = us().parse("5|24|7");
        assert_eq!(p.date, d(2024, 5, 7));
        assert!(p.is_guessed());
    }

    #[test]
    fn impossible_day_is_clamped() {
        assert_eq!(us().parse("2025 2 31 x").date, d(2025, 2, 28));
    }

    #[test]
    fn out_of_range_year_pattern_is_rejected() {
        // `%Y` would read "0002"; plausibility sends it to the fallback.
        let p = us().parse("01/02/0002");
        assert!(p.is_guessed());
    }

    #[test]
    fn clamped_date_handles_leap_years() {
        assert_eq!(clamped_date(2024, 2, 30), Some(d(2024, 2, 29)));
        assert_eq!(clamped_date(2025, 4, 31), Some(d(2025, 4, 30)));
        assert_eq!(clamped_date(2025, 13, 1), None);
    }
}
