//! Jalali (Persian solar) calendar arithmetic
//!
//! Leap years follow the 33-year cycle rules anchored on a table of break
//! years, the same scheme used by the common Jalali↔Gregorian reference
//! converters. The first day of each Jalali year (1 Farvardin) is located as a
//! day in March of the Gregorian year `jy + 621`; every other day is an offset
//! from there, so `chrono` handles all Gregorian-side arithmetic.

use chrono::{Datelike, Days, NaiveDate};

/// Break years of the 33-year leap cycles
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// Smallest Jalali year the break table covers
pub const MIN_YEAR: i32 = BREAKS[0];

/// First Jalali year beyond the break table
pub const MAX_YEAR_EXCLUSIVE: i32 = BREAKS[BREAKS.len() - 1];

/// Canonical month names, Farvardin first
pub const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Position of a Jalali year inside its leap cycle
struct YearInfo {
    /// Years since the last leap year (0 means this year is leap)
    leap: i32,
    /// Gregorian year in which this Jalali year begins
    gy: i32,
    /// Day in March of 1 Farvardin
    march: i32,
}

fn year_info(jy: i32) -> Option<YearInfo> {
    if !(MIN_YEAR..MAX_YEAR_EXCLUSIVE).contains(&jy) {
        return None;
    }

    let gy = jy + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Some(YearInfo { leap, gy, march })
}

/// Returns true when the Jalali year has a 30-day Esfand
///
/// Years outside the supported range are reported as common years.
pub fn is_leap_year(jy: i32) -> bool {
    year_info(jy).map(|info| info.leap == 0).unwrap_or(false)
}

/// Number of days in a Jalali month, or `None` for a month outside 1–12
pub fn month_length(jy: i32, jm: u32) -> Option<u32> {
    match jm {
        1..=6 => Some(31),
        7..=11 => Some(30),
        12 if is_leap_year(jy) => Some(30),
        12 => Some(29),
        _ => None,
    }
}

/// Looks up a month number (1–12) by its Persian name
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as u32 + 1)
}

/// Returns the Persian name of a month number (1–12)
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Converts a Jalali calendar date to a Gregorian calendar date
///
/// Returns `None` when the year is outside the supported range, the month is
/// outside 1–12, or the day does not exist in that month.
pub fn to_gregorian(jy: i32, jm: u32, jd: u32) -> Option<NaiveDate> {
    let len = month_length(jy, jm)?;
    if jd == 0 || jd > len {
        return None;
    }

    let info = year_info(jy)?;
    let nowruz = NaiveDate::from_ymd_opt(info.gy, 3, info.march as u32)?;

    // Months 1-6 have 31 days, 7-12 have 30
    let month_offset = if jm <= 6 {
        (jm - 1) * 31
    } else {
        186 + (jm - 7) * 30
    };
    let offset = month_offset + jd - 1;

    nowruz.checked_add_days(Days::new(offset as u64))
}

/// Converts a Gregorian calendar date to a Jalali `(year, month, day)`
pub fn from_gregorian(date: NaiveDate) -> Option<(i32, u32, u32)> {
    let mut jy = date.year() - 621;
    let mut nowruz = to_gregorian(jy, 1, 1)?;
    if date < nowruz {
        jy -= 1;
        nowruz = to_gregorian(jy, 1, 1)?;
    }

    let days = (date - nowruz).num_days() as u32;
    let (jm, jd) = if days < 186 {
        (days / 31 + 1, days % 31 + 1)
    } else {
        let rest = days - 186;
        (rest / 30 + 7, rest % 30 + 1)
    };

    Some((jy, jm, jd))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nowruz_dates() {
        assert_eq!(to_gregorian(1402, 1, 1), Some(ymd(2023, 3, 21)));
        assert_eq!(to_gregorian(1403, 1, 1), Some(ymd(2024, 3, 20)));
        assert_eq!(to_gregorian(1404, 1, 1), Some(ymd(2025, 3, 21)));
    }

    #[test]
    fn test_known_dates() {
        assert_eq!(to_gregorian(1403, 4, 13), Some(ymd(2024, 7, 3)));
        assert_eq!(to_gregorian(1402, 11, 29), Some(ymd(2024, 2, 18)));
        assert_eq!(to_gregorian(1392, 7, 13), Some(ymd(2013, 10, 5)));
        assert_eq!(to_gregorian(1357, 11, 22), Some(ymd(1979, 2, 11)));
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(1399));
        assert!(is_leap_year(1403));
        assert!(!is_leap_year(1400));
        assert!(!is_leap_year(1401));
        assert!(!is_leap_year(1402));
        assert!(!is_leap_year(1404));
    }

    #[test]
    fn test_esfand_length() {
        assert_eq!(month_length(1403, 12), Some(30));
        assert_eq!(month_length(1402, 12), Some(29));
        assert_eq!(to_gregorian(1403, 12, 30), Some(ymd(2025, 3, 20)));
        assert_eq!(to_gregorian(1402, 12, 30), None);
    }

    #[test]
    fn test_year_end_is_followed_by_nowruz() {
        let last = to_gregorian(1402, 12, 29).unwrap();
        let next = to_gregorian(1403, 1, 1).unwrap();
        assert_eq!(last.succ_opt(), Some(next));
    }

    #[test]
    fn test_rejects_invalid_components() {
        assert_eq!(to_gregorian(1403, 0, 1), None);
        assert_eq!(to_gregorian(1403, 13, 1), None);
        assert_eq!(to_gregorian(1403, 7, 31), None);
        assert_eq!(to_gregorian(1403, 1, 0), None);
        assert_eq!(to_gregorian(3200, 1, 1), None);
    }

    #[test]
    fn test_from_gregorian() {
        assert_eq!(from_gregorian(ymd(2024, 7, 3)), Some((1403, 4, 13)));
        assert_eq!(from_gregorian(ymd(2024, 2, 18)), Some((1402, 11, 29)));
        assert_eq!(from_gregorian(ymd(2024, 3, 19)), Some((1402, 12, 29)));
        assert_eq!(from_gregorian(ymd(2025, 3, 20)), Some((1403, 12, 30)));
        assert_eq!(from_gregorian(ymd(2025, 3, 21)), Some((1404, 1, 1)));
    }

    #[test]
    fn test_from_gregorian_inverts_to_gregorian() {
        let mut date = ymd(2023, 3, 1);
        while date < ymd(2025, 4, 1) {
            let (jy, jm, jd) = from_gregorian(date).unwrap();
            assert_eq!(to_gregorian(jy, jm, jd), Some(date));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_number("تیر"), Some(4));
        assert_eq!(month_number("اسفند"), Some(12));
        assert_eq!(month_number("January"), None);
        assert_eq!(month_name(1), Some("فروردین"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
