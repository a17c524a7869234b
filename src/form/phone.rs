/// Longest digit run the mask applies to: two area-code digits plus a
/// nine-digit mobile number.
pub const MAX_MASKED_DIGITS: usize = 11;

pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mask raw keystrokes as `(DD) DDDDD-DDDD`, filling the groups in as the
/// user types. Ten digits take the landline shape `(DD) DDDD-DDDD`.
///
/// Input carrying more than eleven digits is returned untouched.
pub fn format_phone(raw: &str) -> String {
    let digits = digits_only(raw);
    let n = digits.len();

    if n > MAX_MASKED_DIGITS {
        return raw.to_string();
    }

    match n {
        0 => String::new(),
        1..=2 => format!("({}", digits),
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}
