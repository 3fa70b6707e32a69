/// Formats free-form phone input as `+7 XXX XXX XX XX`.
///
/// Non-digits are dropped, a single leading country digit `7` is stripped and
/// at most ten subscriber digits are kept. Groups appear as digits arrive, so
/// partial input renders partially.
pub fn mask_phone(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.strip_prefix('7').unwrap_or(&digits);
    let digits = &digits[..digits.len().min(10)];

    let mut out = String::from("+7");
    for (start, end) in [(0, 3), (3, 6), (6, 8), (8, 10)] {
        if digits.len() <= start {
            break;
        }
        out.push(' ');
        out.push_str(&digits[start..end.min(digits.len())]);
    }
    out
}
