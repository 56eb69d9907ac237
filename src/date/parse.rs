//! Free-text Persian date parsing
//!
//! News sites print publication dates in many shapes: `1403/04/13`,
//! `شنبه ۱۳ تیر ۱۴۰۳ - ۰۸:۳۸`, `تاریخ انتشار: ۱۳ تیر ۱۴۰۳`, and so on. This
//! module turns all of them into a [`PersianDate`] and then into a
//! [`GregorianTimestamp`].

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::digits::normalize_digits;
use super::jalali;

/// `YYYY-MM-DD` or `YYYY/MM/DD`, year strictly four digits
static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{4})[-/]([0-9]{1,2})[-/]([0-9]{1,2})(?:[^0-9]|$)")
        .expect("numeric date pattern is valid")
});

/// `H:MM` or `HH:MM`
static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{1,2}):([0-9]{2})").expect("time pattern is valid")
});

/// Token separators for the worded path
static TOKEN_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-،,]+").expect("separator pattern is valid"));

/// Errors produced while parsing or converting a date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("no date found in text")]
    NoDate,

    #[error("month name '{0}' is not preceded by a day")]
    MissingDay(String),

    #[error("month name '{0}' is not followed by a four-digit year")]
    MissingYear(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("year {0} is outside the supported range")]
    YearOutOfRange(i32),

    #[error("month {0} is outside 1-12")]
    MonthOutOfRange(u32),

    #[error("day {day} does not exist in month {month} of year {year}")]
    DayOutOfRange { year: i32, month: u32, day: u32 },
}

/// A Jalali date and time of day as read from page text
///
/// The components are taken as printed; nothing guarantees they form a real
/// calendar day until [`PersianDate::to_gregorian`] validates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersianDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl PersianDate {
    /// Parses a Persian date out of free text
    ///
    /// A numeric `YYYY/MM/DD` date is preferred when present. Otherwise the
    /// first Persian month name in the text is located and the tokens on
    /// either side of it are read as day and year. The time of day is picked
    /// up independently and defaults to midnight.
    ///
    /// # Arguments
    ///
    /// * `text` - Raw date text, possibly with Persian digits, weekday names
    ///   or a leading label
    ///
    /// # Returns
    ///
    /// * `Ok(PersianDate)` - Components found in the text (not yet validated
    ///   against the calendar)
    /// * `Err(DateParseError)` - No usable date in the text
    pub fn parse(text: &str) -> Result<Self, DateParseError> {
        let text = normalize_digits(text);
        let (year, month, day) = match parse_numeric(&text)? {
            Some(ymd) => ymd,
            None => parse_worded(&text)?,
        };
        let (hour, minute) = parse_time(&text).unwrap_or((0, 0));

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
        })
    }

    /// Validates the date against the Jalali calendar and converts it
    pub fn to_gregorian(&self) -> Result<GregorianTimestamp, DateParseError> {
        if !(jalali::MIN_YEAR..jalali::MAX_YEAR_EXCLUSIVE).contains(&self.year) {
            return Err(DateParseError::YearOutOfRange(self.year));
        }
        let length = jalali::month_length(self.year, self.month)
            .ok_or(DateParseError::MonthOutOfRange(self.month))?;
        if self.day == 0 || self.day > length {
            return Err(self.day_out_of_range());
        }

        let date = jalali::to_gregorian(self.year, self.month, self.day)
            .ok_or_else(|| self.day_out_of_range())?;
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN);

        Ok(GregorianTimestamp(date.and_time(time)))
    }

    fn day_out_of_range(&self) -> DateParseError {
        DateParseError::DayOutOfRange {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }
}

/// A normalized Gregorian date and time
///
/// Displays as `YYYY-MM-DD HH:MM:SS`, the form stored in `Gregorian_Date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GregorianTimestamp(NaiveDateTime);

impl GregorianTimestamp {
    /// Wraps an already-Gregorian timestamp
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for GregorianTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Parses and converts a Persian date string in one step
///
/// # Example
///
/// ```
/// use khabargir::date::normalize;
///
/// let ts = normalize("شنبه ۱۳ تیر ۱۴۰۳ - ۰۸:۳۸").unwrap();
/// assert_eq!(ts.to_string(), "2024-07-03 08:38:00");
/// ```
pub fn normalize(text: &str) -> Result<GregorianTimestamp, DateParseError> {
    PersianDate::parse(text)?.to_gregorian()
}

/// Like [`normalize`], but logs the failure and returns `None`
///
/// Extractors use this so an unreadable date never costs the record.
pub fn normalize_or_none(text: &str) -> Option<String> {
    match normalize(text) {
        Ok(ts) => Some(ts.to_string()),
        Err(e) => {
            tracing::debug!("Could not normalize date {:?}: {}", text, e);
            None
        }
    }
}

fn parse_numeric(text: &str) -> Result<Option<(i32, u32, u32)>, DateParseError> {
    let Some(caps) = NUMERIC_DATE.captures(text) else {
        return Ok(None);
    };

    let year = parse_number(&caps[1])?;
    let month = parse_number(&caps[2])?;
    let day = parse_number(&caps[3])?;

    Ok(Some((year as i32, month, day)))
}

fn parse_worded(text: &str) -> Result<(i32, u32, u32), DateParseError> {
    let tokens: Vec<&str> = TOKEN_SEPARATOR
        .split(text)
        .filter(|t| !t.is_empty())
        .collect();

    let (idx, month) = tokens
        .iter()
        .enumerate()
        .find_map(|(idx, token)| jalali::month_number(token).map(|m| (idx, m)))
        .ok_or(DateParseError::NoDate)?;
    let name = tokens[idx].to_string();

    let day = idx
        .checked_sub(1)
        .map(|i| tokens[i])
        .filter(|t| is_digits(t))
        .ok_or_else(|| DateParseError::MissingDay(name.clone()))?;

    let year = tokens
        .get(idx + 1)
        .copied()
        .filter(|t| t.len() == 4 && is_digits(t))
        .ok_or(DateParseError::MissingYear(name))?;

    Ok((parse_number(year)? as i32, month, parse_number(day)?))
}

fn parse_time(text: &str) -> Option<(u32, u32)> {
    let caps = TIME_OF_DAY.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

fn parse_number(s: &str) -> Result<u32, DateParseError> {
    s.parse()
        .map_err(|_| DateParseError::InvalidNumber(s.to_string()))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_ascii_persian(s: &str) -> String {
        s.chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => char::from_u32(0x06F0 + d).unwrap(),
                None => c,
            })
            .collect()
    }

    #[test]
    fn test_known_conversions() {
        assert_eq!(
            normalize("1403-04-13").unwrap().to_string(),
            "2024-07-03 00:00:00"
        );
        assert_eq!(
            normalize("1402/11/29").unwrap().to_string(),
            "2024-02-18 00:00:00"
        );
        assert_eq!(
            normalize("13 تیر 1403").unwrap().to_string(),
            "2024-07-03 00:00:00"
        );
    }

    #[test]
    fn test_site_formats() {
        // Weekday, Persian digits and a trailing time
        assert_eq!(
            normalize("شنبه ۱۳ تیر ۱۴۰۳ - ۰۸:۳۸").unwrap().to_string(),
            "2024-07-03 08:38:00"
        );
        // Leading label
        assert_eq!(
            normalize("تاریخ انتشار: ۲۹ بهمن ۱۴۰۲ - ۱۴:۰۵").unwrap().to_string(),
            "2024-02-18 14:05:00"
        );
        // Comma separated, Arabic-Indic digits
        assert_eq!(
            normalize("١٣ تیر، ١٤٠٣").unwrap().to_string(),
            "2024-07-03 00:00:00"
        );
        // Numeric date with time first
        assert_eq!(
            normalize("۰۸:۳۸ - ۱۴۰۳/۰۴/۱۳").unwrap().to_string(),
            "2024-07-03 08:38:00"
        );
        // Month name written with Arabic Yeh
        assert_eq!(
            normalize("1 دي 1402").unwrap().to_string(),
            "2023-12-22 00:00:00"
        );
    }

    #[test]
    fn test_worded_and_numeric_agree() {
        for year in [1402, 1403] {
            let mut previous: Option<NaiveDate> = None;
            for month in 1..=12u32 {
                let length = jalali::month_length(year, month).unwrap();
                let name = jalali::month_name(month).unwrap();
                for day in 1..=length {
                    let numeric = format!("{}/{:02}/{:02}", year, month, day);
                    let worded = to_ascii_persian(&format!("{} {} {}", day, name, year));

                    let a = normalize(&numeric).unwrap();
                    let b = normalize(&worded).unwrap();
                    assert_eq!(a, b, "{} vs {}", numeric, worded);

                    if let Some(prev) = previous {
                        assert_eq!(prev.succ_opt(), Some(a.date()), "gap before {}", numeric);
                    }
                    previous = Some(a.date());
                }
            }
        }
    }

    #[test]
    fn test_first_month_wins() {
        let date = PersianDate::parse("5 مهر 1402 تا 10 آبان 1402").unwrap();
        assert_eq!((date.year, date.month, date.day), (1402, 7, 5));
    }

    #[test]
    fn test_time_defaults_and_bounds() {
        let date = PersianDate::parse("13 تیر 1403").unwrap();
        assert_eq!((date.hour, date.minute), (0, 0));

        let date = PersianDate::parse("13 تیر 1403 ساعت 7:05").unwrap();
        assert_eq!((date.hour, date.minute), (7, 5));

        let date = PersianDate::parse("13 تیر 1403 - 25:70").unwrap();
        assert_eq!((date.hour, date.minute), (0, 0));
    }

    #[test]
    fn test_missing_year() {
        assert_eq!(
            normalize("13 تیر"),
            Err(DateParseError::MissingYear("تیر".to_string()))
        );
        // Two-digit years are not accepted
        assert_eq!(
            normalize("13 تیر 03"),
            Err(DateParseError::MissingYear("تیر".to_string()))
        );
    }

    #[test]
    fn test_missing_day() {
        assert_eq!(
            normalize("تیر 1403"),
            Err(DateParseError::MissingDay("تیر".to_string()))
        );
        assert_eq!(
            normalize("شنبه تیر 1403"),
            Err(DateParseError::MissingDay("تیر".to_string()))
        );
    }

    #[test]
    fn test_unknown_month() {
        assert_eq!(normalize("13 July 1403"), Err(DateParseError::NoDate));
        assert_eq!(normalize(""), Err(DateParseError::NoDate));
    }

    #[test]
    fn test_invalid_days() {
        assert_eq!(
            normalize("35 تیر 1403"),
            Err(DateParseError::DayOutOfRange {
                year: 1403,
                month: 4,
                day: 35
            })
        );
        assert_eq!(
            normalize("30 اسفند 1402"),
            Err(DateParseError::DayOutOfRange {
                year: 1402,
                month: 12,
                day: 30
            })
        );
        assert!(normalize("30 اسفند 1403").is_ok());
        assert_eq!(
            normalize("1403/13/01"),
            Err(DateParseError::MonthOutOfRange(13))
        );
        assert_eq!(
            normalize("1403/04/00"),
            Err(DateParseError::DayOutOfRange {
                year: 1403,
                month: 4,
                day: 0
            })
        );
    }

    #[test]
    fn test_numeric_year_must_be_four_digits() {
        // Five-digit run is not a year
        assert_eq!(normalize("11403/04/13"), Err(DateParseError::NoDate));
    }

    #[test]
    fn test_normalize_or_none() {
        assert_eq!(
            normalize_or_none("۱۳ تیر ۱۴۰۳").as_deref(),
            Some("2024-07-03 00:00:00")
        );
        assert_eq!(normalize_or_none("بدون تاریخ"), None);
    }
}
