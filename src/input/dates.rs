//! Recognition of due dates and times written in plain English.
//!
//! Each recognizer scans the whole input and reports its first valid match;
//! [`extract`] keeps the earliest one in the text and, when a time of day sits
//! right next to it, folds both into a single span.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

const MONTHS: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static RELATIVE_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<word>day after tomorrow|today|tonight|tomorrow|tmrw|tmr|yesterday)\b").unwrap()
});

static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:on\s+)?(?:(?P<modifier>this|next)\s+)?(?P<day>monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|weds|wed|thurs|thur|thu|fri|sat|sun)\b",
    )
    .unwrap()
});

static IN_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bin\s+(?P<count>\d{1,4}|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+(?P<unit>day|week|month|year)s?\b",
    )
    .unwrap()
});

static NEXT_PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnext\s+(?P<unit>week|month|year)\b").unwrap());

static ISO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})\b").unwrap()
});

static SLASH_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<month>\d{1,2})/(?P<day>\d{1,2})(?:/(?P<year>\d{4}))?\b").unwrap()
});

static MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:on\s+)?(?P<month>{MONTHS})\.?\s+(?P<day>\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(?P<year>\d{{4}}))?\b"
    ))
    .unwrap()
});

static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:on\s+)?(?:the\s+)?(?P<day>\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?(?P<month>{MONTHS})(?:,?\s+(?P<year>\d{{4}}))?\b"
    ))
    .unwrap()
});

static CLOCK_12H_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:at\s+)?(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?P<meridiem>am|pm)\b").unwrap()
});

static CLOCK_24H_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bat\s+(?P<hour>\d{1,2}):(?P<minute>\d{2})\b").unwrap());

static NAMED_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:at\s+)?(?P<name>noon|midnight)\b").unwrap());

/// A recognized due date with an optional time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueMoment {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl DueMoment {
    /// Date-only moments resolve to noon.
    pub fn to_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or_else(implied_time))
    }
}

fn implied_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// The byte span of the recognized expression within the input, and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub span: Range<usize>,
    pub moment: DueMoment,
}

struct DateCandidate {
    span: Range<usize>,
    date: NaiveDate,
    time: Option<NaiveTime>,
}

struct TimeCandidate {
    span: Range<usize>,
    time: NaiveTime,
}

/// Find the first date/time expression in `text`, relative to `now`.
pub fn extract(text: &str, now: NaiveDateTime) -> Option<DateMatch> {
    let today = now.date();

    let date = [
        relative_day(text, today),
        weekday(text, today),
        in_duration(text, today),
        next_period(text, today),
        iso_date(text),
        slash_date(text, today),
        month_name_date(text, today),
    ]
    .into_iter()
    .flatten()
    .min_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(b.span.end.cmp(&a.span.end))
    });

    let time = [clock_12h(text), clock_24h(text), named_time(text)]
        .into_iter()
        .flatten()
        .min_by_key(|t| t.span.start);

    match (date, time) {
        (Some(d), Some(t)) if adjacent(text, &d.span, &t.span) => Some(DateMatch {
            span: d.span.start.min(t.span.start)..d.span.end.max(t.span.end),
            moment: DueMoment {
                date: d.date,
                time: Some(t.time),
            },
        }),
        (Some(d), Some(t)) if t.span.start < d.span.start => Some(time_today(t, today)),
        (Some(d), _) => Some(DateMatch {
            span: d.span,
            moment: DueMoment {
                date: d.date,
                time: d.time,
            },
        }),
        (None, Some(t)) => Some(time_today(t, today)),
        (None, None) => None,
    }
}

fn time_today(t: TimeCandidate, today: NaiveDate) -> DateMatch {
    DateMatch {
        span: t.span,
        moment: DueMoment {
            date: today,
            time: Some(t.time),
        },
    }
}

/// Whether two spans are separated only by whitespace.
fn adjacent(text: &str, a: &Range<usize>, b: &Range<usize>) -> bool {
    let gap = if a.end <= b.start {
        &text[a.end..b.start]
    } else if b.end <= a.start {
        &text[b.end..a.start]
    } else {
        return false;
    };
    gap.chars().all(char::is_whitespace)
}

fn span(caps: &Captures) -> Range<usize> {
    caps.get(0).map(|m| m.range()).unwrap_or(0..0)
}

fn relative_day(text: &str, today: NaiveDate) -> Option<DateCandidate> {
    RELATIVE_DAY_RE.captures_iter(text).find_map(|caps| {
        let word = caps["word"].to_lowercase();
        let (date, time) = match word.as_str() {
            "today" => (Some(today), None),
            "tonight" => (Some(today), NaiveTime::from_hms_opt(22, 0, 0)),
            "tomorrow" | "tmrw" | "tmr" => (today.succ_opt(), None),
            "yesterday" => (today.pred_opt(), None),
            "day after tomorrow" => (today.checked_add_days(Days::new(2)), None),
            _ => return None,
        };
        Some(DateCandidate {
            span: span(&caps),
            date: date?,
            time,
        })
    })
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    let lower = s.to_lowercase();
    match lower.get(..3)? {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Bare weekdays mean the next such day (1 to 7 days out), "this" allows
/// today, and "next" means that day in the following Monday-started week.
fn weekday(text: &str, today: NaiveDate) -> Option<DateCandidate> {
    WEEKDAY_RE.captures_iter(text).find_map(|caps| {
        let target = parse_weekday(&caps["day"])?.num_days_from_monday() as u64;
        let current = today.weekday().num_days_from_monday() as u64;
        let modifier = caps.name("modifier").map(|m| m.as_str().to_lowercase());
        let ahead = match modifier.as_deref() {
            Some("this") => (target + 7 - current) % 7,
            Some("next") => 7 - current + target,
            _ => match (target + 7 - current) % 7 {
                0 => 7,
                n => n,
            },
        };
        Some(DateCandidate {
            span: span(&caps),
            date: today.checked_add_days(Days::new(ahead))?,
            time: None,
        })
    })
}

fn count_word(s: &str) -> Option<u32> {
    let lower = s.to_lowercase();
    let n = match lower.as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse().ok()?,
    };
    Some(n)
}

fn add_units(date: NaiveDate, count: u32, unit: &str) -> Option<NaiveDate> {
    match unit.to_lowercase().as_str() {
        "day" => date.checked_add_days(Days::new(count as u64)),
        "week" => date.checked_add_days(Days::new(count as u64 * 7)),
        "month" => date.checked_add_months(Months::new(count)),
        "year" => date.checked_add_months(Months::new(count.checked_mul(12)?)),
        _ => None,
    }
}

fn in_duration(text: &str, today: NaiveDate) -> Option<DateCandidate> {
    IN_DURATION_RE.captures_iter(text).find_map(|caps| {
        let count = count_word(&caps["count"])?;
        Some(DateCandidate {
            span: span(&caps),
            date: add_units(today, count, &caps["unit"])?,
            time: None,
        })
    })
}

fn next_period(text: &str, today: NaiveDate) -> Option<DateCandidate> {
    NEXT_PERIOD_RE.captures_iter(text).find_map(|caps| {
        Some(DateCandidate {
            span: span(&caps),
            date: add_units(today, 1, &caps["unit"])?,
            time: None,
        })
    })
}

fn iso_date(text: &str) -> Option<DateCandidate> {
    ISO_DATE_RE.captures_iter(text).find_map(|caps| {
        let date = NaiveDate::from_ymd_opt(
            caps["year"].parse().ok()?,
            caps["month"].parse().ok()?,
            caps["day"].parse().ok()?,
        )?;
        Some(DateCandidate {
            span: span(&caps),
            date,
            time: None,
        })
    })
}

/// A month/day with an optional year. Without a year, a date already past
/// this year lands next year.
fn resolve_month_day(month: u32, day: u32, year: Option<&str>, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year.parse().ok()?, month, day);
    }
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

fn slash_date(text: &str, today: NaiveDate) -> Option<DateCandidate> {
    SLASH_DATE_RE.captures_iter(text).find_map(|caps| {
        let date = resolve_month_day(
            caps["month"].parse().ok()?,
            caps["day"].parse().ok()?,
            caps.name("year").map(|m| m.as_str()),
            today,
        )?;
        Some(DateCandidate {
            span: span(&caps),
            date,
            time: None,
        })
    })
}

fn parse_month(s: &str) -> Option<u32> {
    let lower = s.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn month_name_date(text: &str, today: NaiveDate) -> Option<DateCandidate> {
    let from = |re: &Regex| {
        re.captures_iter(text).find_map(|caps| {
            let date = resolve_month_day(
                parse_month(&caps["month"])?,
                caps["day"].parse().ok()?,
                caps.name("year").map(|m| m.as_str()),
                today,
            )?;
            Some(DateCandidate {
                span: span(&caps),
                date,
                time: None,
            })
        })
    };
    match (from(&*MONTH_DAY_RE), from(&*DAY_MONTH_RE)) {
        (Some(a), Some(b)) => Some(if b.span.start < a.span.start { b } else { a }),
        (a, b) => a.or(b),
    }
}

fn clock_12h(text: &str) -> Option<TimeCandidate> {
    CLOCK_12H_RE.captures_iter(text).find_map(|caps| {
        let hour: u32 = caps["hour"].parse().ok()?;
        let minute: u32 = match caps.name("minute") {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = caps["meridiem"].eq_ignore_ascii_case("pm");
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        Some(TimeCandidate {
            span: span(&caps),
            time: NaiveTime::from_hms_opt(hour, minute, 0)?,
        })
    })
}

fn clock_24h(text: &str) -> Option<TimeCandidate> {
    CLOCK_24H_RE.captures_iter(text).find_map(|caps| {
        Some(TimeCandidate {
            span: span(&caps),
            time: NaiveTime::from_hms_opt(caps["hour"].parse().ok()?, caps["minute"].parse().ok()?, 0)?,
        })
    })
}

fn named_time(text: &str) -> Option<TimeCandidate> {
    NAMED_TIME_RE.captures_iter(text).find_map(|caps| {
        let time = if caps["name"].eq_ignore_ascii_case("noon") {
            NaiveTime::from_hms_opt(12, 0, 0)?
        } else {
            NaiveTime::MIN
        };
        Some(TimeCandidate {
            span: span(&caps),
            time,
        })
    })
}
