use crate::models::{Amount, PixError};

/// Longest canonical amount string the payload accepts (`9999999999.99`).
pub const MAX_CANONICAL_LEN: usize = 13;

/// Normalizes a locale-formatted amount (`"R$ 1.234,56"`, `"12,5"`, `"1234.56"`)
/// into minor units.
///
/// Without a comma, dots are read as thousands separators only when they form
/// proper three-digit groups (`"1.234"`, `"12.345.678"`); otherwise a single dot
/// is the decimal point. Digits past the second decimal are rounded half away
/// from zero.
pub fn normalize_amount(input: &str) -> Result<Amount, PixError> {
    let invalid = || PixError::InvalidAmount(input.to_string());

    let cleaned: String = input
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let (int_part, frac_part) = split_decimal(&cleaned).ok_or_else(invalid)?;

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let int_digits = int_part.trim_start_matches('0');
    if int_digits.len() > MAX_CANONICAL_LEN {
        return Err(invalid());
    }
    let units: u64 = if int_digits.is_empty() {
        0
    } else {
        int_digits.parse().map_err(|_| invalid())?
    };

    let frac = frac_part.as_bytes();
    let digit = |i: usize| frac.get(i).map(|b| u64::from(b - b'0')).unwrap_or(0);
    let round_up = u64::from(digit(2) >= 5);
    let fraction = digit(0) * 10 + digit(1) + round_up;

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(invalid)?;

    let amount = Amount::from_cents(cents).ok_or_else(invalid)?;
    if amount.to_string().len() > MAX_CANONICAL_LEN {
        return Err(invalid());
    }

    Ok(amount)
}

fn split_decimal(cleaned: &str) -> Option<(String, String)> {
    if cleaned.contains(',') {
        let (int_part, frac_part) = cleaned.split_once(',')?;
        if frac_part.contains(',') || frac_part.contains('.') {
            return None;
        }
        return Some((int_part.replace('.', ""), frac_part.to_string()));
    }

    let groups: Vec<&str> = cleaned.split('.').collect();
    match groups.as_slice() {
        [whole] => Some((whole.to_string(), String::new())),
        _ if is_thousands_grouping(&groups) => Some((groups.concat(), String::new())),
        [int_part, frac_part] => Some((int_part.to_string(), frac_part.to_string())),
        _ => None,
    }
}

fn is_thousands_grouping(groups: &[&str]) -> bool {
    let Some((head, tail)) = groups.split_first() else {
        return false;
    };
    (1..=3).contains(&head.len())
        && !head.starts_with('0')
        && tail.iter().all(|g| g.len() == 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(input: &str) -> String {
        normalize_amount(input).unwrap().to_string()
    }

    #[test]
    fn test_locale_formats() {
        assert_eq!(canonical("R$ 1.234,56"), "1234.56");
        assert_eq!(canonical("R$ 123,45"), "123.45");
        assert_eq!(canonical("R$123,45"), "123.45");
        assert_eq!(canonical("R$\u{a0}1.000.000,00"), "1000000.00");
        assert_eq!(canonical("  50,5 "), "50.50");
        assert_eq!(canonical("0,01"), "0.01");
        assert_eq!(canonical(",99"), "0.99");
        assert_eq!(canonical("7"), "7.00");
    }

    #[test]
    fn test_canonical_input_passes_through() {
        assert_eq!(canonical("1234.56"), "1234.56");
        assert_eq!(canonical("12.5"), "12.50");
        assert_eq!(canonical("0.125"), "0.13");
        assert_eq!(canonical("1234.567"), "1234.57");
    }

    #[test]
    fn test_dots_as_thousands_without_comma() {
        assert_eq!(canonical("1.234"), "1234.00");
        assert_eq!(canonical("12.345.678"), "12345678.00");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(canonical("1,005"), "1.01");
        assert_eq!(canonical("1,0049"), "1.00");
        assert_eq!(canonical("2,675"), "2.68");
        assert_eq!(canonical("9,999"), "10.00");
    }

    #[test]
    fn test_rejects_invalid() {
        for input in ["0", "-5,00", "abc", "", "   ", "R$", "0,00", "0,004", "1,2,3", "1.2.3", "12abc", "1,5.0", "+5"] {
            assert_eq!(
                normalize_amount(input),
                Err(PixError::InvalidAmount(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_amounts_longer_than_field_ceiling() {
        assert_eq!(canonical("9999999999,99"), "9999999999.99");
        assert!(normalize_amount("99999999999,99").is_err());
        assert!(normalize_amount("123456789012345678901234567890").is_err());
    }

    #[test]
    fn test_leading_zeros_do_not_count_toward_length() {
        assert_eq!(canonical("000000000000000012,34"), "12.34");
    }

    #[test]
    fn test_numeric_value_is_preserved_across_formats() {
        for (cents, text) in [(1u64, "0,01"), (1050, "10,50"), (123456, "1.234,56"), (100000, "1.000")] {
            let amount = normalize_amount(text).unwrap();
            assert_eq!(amount.cents(), cents);
            // Display form and canonical form both read back to the same value.
            assert_eq!(normalize_amount(&amount.to_brl_display()).unwrap(), amount);
            assert_eq!(normalize_amount(&amount.to_string()).unwrap(), amount);
        }
    }
}
