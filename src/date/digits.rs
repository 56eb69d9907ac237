//! Digit and letter normalization for Persian text

/// Maps Persian and Arabic-Indic digits to ASCII digits
///
/// Persian digits (`۰`–`۹`, U+06F0–U+06F9) and Arabic-Indic digits
/// (`٠`–`٩`, U+0660–U+0669) are translated by fixed codepoint offset. The
/// Arabic letters Yeh (`ي`) and Kaf (`ك`), which some sites use in month
/// names, are folded to their Persian forms (`ی`, `ک`). Every other
/// character passes through unchanged, so the function is idempotent.
///
/// # Example
///
/// ```
/// use khabargir::date::normalize_digits;
///
/// assert_eq!(normalize_digits("۱۳ تیر ۱۴۰۳"), "13 تیر 1403");
/// ```
pub fn normalize_digits(text: &str) -> String {
    text.chars().map(normalize_char).collect()
}

fn normalize_char(c: char) -> char {
    match c {
        '\u{06F0}'..='\u{06F9}' => shift(c, 0x06F0),
        '\u{0660}'..='\u{0669}' => shift(c, 0x0660),
        'ي' => 'ی',
        'ك' => 'ک',
        _ => c,
    }
}

fn shift(c: char, zero: u32) -> char {
    char::from_digit(c as u32 - zero, 10).unwrap_or(c)
}
