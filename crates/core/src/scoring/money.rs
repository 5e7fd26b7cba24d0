use rust_decimal::Decimal;
use std::str::FromStr;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Parses a plain decimal amount such as `"35.00"` into a fixed-point value.
///
/// Surrounding whitespace, negative values and anything `Decimal` cannot represent
/// (`"inf"`, `"NaN"`, exponents) are rejected.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    if text.trim() != text {
        return None;
    }
    let value = Decimal::from_str(text).ok()?;
    if value < Decimal::ZERO {
        return None;
    }
    Some(value)
}

/// Unicode letter (any `L*` category) or decimal digit (`Nd`).
pub fn is_alphanumeric(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(parse_amount("35.00"), Some(Decimal::new(3500, 2)));
        assert_eq!(parse_amount("100"), Some(Decimal::from(100)));
        assert_eq!(parse_amount("0.25"), Some(Decimal::new(25, 2)));
    }

    #[test]
    fn rejects_garbage_and_out_of_range_values() {
        for text in ["", "abc", " 1.00", "1.00 ", "$1.00", "-1.00", "inf", "NaN", "1,00"] {
            assert_eq!(parse_amount(text), None, "{text:?} should be rejected");
        }
    }

    #[test]
    fn classifies_unicode_letters_and_digits() {
        assert!(is_alphanumeric('a'));
        assert!(is_alphanumeric('Z'));
        assert!(is_alphanumeric('7'));
        assert!(is_alphanumeric('é'));
        assert!(is_alphanumeric('가'));
        assert!(is_alphanumeric('क'));
        assert!(!is_alphanumeric('&'));
        assert!(!is_alphanumeric(' '));
        assert!(!is_alphanumeric('-'));
    }

    #[test]
    fn marks_and_non_decimal_numbers_do_not_count() {
        // Devanagari vowel sign I (Mc), vulgar fraction, superscript, roman numeral.
        for c in ['\u{093F}', '½', '²', 'Ⅻ'] {
            assert!(!is_alphanumeric(c), "{c:?} should not count");
        }
    }
}
