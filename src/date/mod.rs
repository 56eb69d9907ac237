//! Persian date normalization
//!
//! This module provides:
//! - Persian and Arabic-Indic digit normalization
//! - Jalali calendar arithmetic and conversion to Gregorian
//! - Free-text date parsing for the formats news sites print

mod digits;
pub mod jalali;
mod parse;

pub use digits::normalize_digits;
pub use jalali::{is_leap_year, month_length, month_name, month_number};
pub use parse::{normalize, normalize_or_none, DateParseError, GregorianTimestamp, PersianDate};
