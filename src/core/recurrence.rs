use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar unit a recurrence steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
    Year,
}

impl RecurrenceUnit {
    pub const ALL: [RecurrenceUnit; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    /// Canonical singular spelling used in recurrence phrases.
    pub fn as_word(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }

    /// Accepts "day", "Days", "WEEK", ... (singular or plural, any case).
    pub fn from_word(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        match singular {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

/// A structured recurrence: every `interval` `unit`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub interval: u32,
    pub unit: RecurrenceUnit,
}

impl Default for RecurrenceRule {
    /// The fallback period: once a week.
    fn default() -> Self {
        Self {
            interval: 1,
            unit: RecurrenceUnit::Week,
        }
    }
}

/// Outcome of decoding a stored recurrence phrase.
///
/// Decoding never fails outright: a phrase that cannot be understood yields
/// `Fallback`, which still resolves to a usable rule so the recurrence chain
/// keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceParse {
    Recognized(RecurrenceRule),
    Fallback,
}

impl RecurrenceParse {
    pub fn rule(self) -> RecurrenceRule {
        match self {
            Self::Recognized(rule) => rule,
            Self::Fallback => RecurrenceRule::default(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl RecurrenceRule {
    pub fn new(interval: u32, unit: RecurrenceUnit) -> Self {
        Self { interval, unit }
    }

    /// Parse a phrase like "Every 2 Weeks" or the legacy "daily".
    pub fn parse(phrase: &str) -> RecurrenceParse {
        let tokens: Vec<&str> = phrase.split_whitespace().collect();

        if tokens.len() >= 3 {
            let interval = match tokens[1].parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return RecurrenceParse::Fallback,
            };
            return match RecurrenceUnit::from_word(tokens[2]) {
                Some(unit) => RecurrenceParse::Recognized(Self::new(interval, unit)),
                None => RecurrenceParse::Fallback,
            };
        }

        let unit = match phrase.trim().to_lowercase().as_str() {
            "daily" => RecurrenceUnit::Day,
            "weekly" => RecurrenceUnit::Week,
            "monthly" => RecurrenceUnit::Month,
            "yearly" => RecurrenceUnit::Year,
            _ => return RecurrenceParse::Fallback,
        };
        RecurrenceParse::Recognized(Self::new(1, unit))
    }

    /// The date one period after `anchor`.
    ///
    /// Month and year steps clamp the day to the length of the target month
    /// (Jan 31 + 1 month is the last day of February). Results past the end of
    /// the supported calendar saturate at `NaiveDate::MAX`.
    pub fn next_after(&self, anchor: NaiveDate) -> NaiveDate {
        let count = self.interval.max(1);
        let next = match self.unit {
            RecurrenceUnit::Day => anchor.checked_add_days(Days::new(count as u64)),
            RecurrenceUnit::Week => anchor.checked_add_days(Days::new(count as u64 * 7)),
            RecurrenceUnit::Month => anchor.checked_add_months(Months::new(count)),
            RecurrenceUnit::Year => count
                .checked_mul(12)
                .and_then(|months| anchor.checked_add_months(Months::new(months))),
        };
        next.unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Every {} {}{}",
            self.interval,
            self.unit.as_word(),
            if self.interval > 1 { "s" } else { "" }
        )
    }
}

/// Format a recurrence phrase: `format_recurrence(2, Week)` is "Every 2 Weeks".
pub fn format_recurrence(interval: u32, unit: RecurrenceUnit) -> String {
    RecurrenceRule::new(interval, unit).to_string()
}

/// Decode a recurrence phrase. See [`RecurrenceRule::parse`].
pub fn parse_recurrence(phrase: &str) -> RecurrenceParse {
    RecurrenceRule::parse(phrase)
}

/// Step `anchor` forward by `interval` `unit`s.
pub fn next_occurrence(anchor: NaiveDate, interval: u32, unit: RecurrenceUnit) -> NaiveDate {
    RecurrenceRule::new(interval, unit).next_after(anchor)
}
