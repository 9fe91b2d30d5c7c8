use std::fmt;

/// Result of coercing a catalog field into an integer.
///
/// Coercion never fails: input without a leading integer becomes [`NumericField::NotANumber`],
/// which is stored as `NULL`. Callers decide whether the sentinel is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Integer(i64),
    NotANumber,
}

impl NumericField {
    /// Returns the integer value, or `None` for the sentinel.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            NumericField::Integer(value) => Some(*value),
            NumericField::NotANumber => None,
        }
    }
}

impl From<Option<i64>> for NumericField {
    fn from(value: Option<i64>) -> Self {
        value.map_or(NumericField::NotANumber, NumericField::Integer)
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericField::Integer(value) => write!(f, "{value}"),
            NumericField::NotANumber => f.write_str("NaN"),
        }
    }
}

/// Coerces a text field into an integer by reading its leading integer.
///
/// Leading whitespace and a single sign are accepted, a `0x`/`0X` prefix switches to
/// hexadecimal, and parsing stops at the first character that is not a digit. This
/// truncates fractional input toward zero (`"12.9"` is 12, `"-3.9"` is -3) and ignores
/// trailing garbage (`"42kg"` is 42). Input without any digit, or whose value does not
/// fit in an `i64`, yields [`NumericField::NotANumber`].
///
/// Out-of-range input is therefore written as `NULL` and the run goes on. A float-based
/// `parseInt` would instead keep the huge value and have the database reject the write
/// with an out-of-range error, stopping the run.
pub fn coerce_integer(value: &str) -> NumericField {
    let trimmed = value.trim_start();

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let mut magnitude: u64 = 0;
    let mut seen_digit = false;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        seen_digit = true;
        magnitude = match magnitude
            .checked_mul(u64::from(radix))
            .and_then(|value| value.checked_add(u64::from(digit)))
        {
            Some(value) => value,
            None => return NumericField::NotANumber,
        };
    }

    if !seen_digit {
        return NumericField::NotANumber;
    }

    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };

    value.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use NumericField::{Integer, NotANumber};

    #[test]
    fn plain_integers() {
        assert_eq!(coerce_integer("10"), Integer(10));
        assert_eq!(coerce_integer("0"), Integer(0));
        assert_eq!(coerce_integer("-7"), Integer(-7));
        assert_eq!(coerce_integer("+7"), Integer(7));
        assert_eq!(coerce_integer("  42"), Integer(42));
        assert_eq!(coerce_integer("007"), Integer(7));
    }

    #[test]
    fn fractions_truncate_toward_zero() {
        assert_eq!(coerce_integer("12.9"), Integer(12));
        assert_eq!(coerce_integer("-3.9"), Integer(-3));
        assert_eq!(coerce_integer("1e3"), Integer(1));
    }

    #[test]
    fn trailing_garbage_is_ignored() {
        assert_eq!(coerce_integer("42kg"), Integer(42));
        assert_eq!(coerce_integer("5 units"), Integer(5));
    }

    #[test]
    fn hexadecimal_prefix() {
        assert_eq!(coerce_integer("0x1F"), Integer(31));
        assert_eq!(coerce_integer("-0Xff"), Integer(-255));
        assert_eq!(coerce_integer("0x"), NotANumber);
    }

    #[test]
    fn non_numeric_input_is_the_sentinel() {
        assert_eq!(coerce_integer("abc"), NotANumber);
        assert_eq!(coerce_integer(""), NotANumber);
        assert_eq!(coerce_integer("   "), NotANumber);
        assert_eq!(coerce_integer("-"), NotANumber);
        assert_eq!(coerce_integer(".5"), NotANumber);
    }

    #[test]
    fn out_of_range_is_the_sentinel() {
        assert_eq!(coerce_integer("9223372036854775807"), Integer(i64::MAX));
        assert_eq!(coerce_integer("-9223372036854775808"), Integer(i64::MIN));
        assert_eq!(coerce_integer("9223372036854775808"), NotANumber);
        assert_eq!(coerce_integer("99999999999999999999999"), NotANumber);
    }

    #[test]
    fn sentinel_maps_to_none() {
        assert_eq!(NotANumber.as_integer(), None);
        assert_eq!(Integer(3).as_integer(), Some(3));
        assert_eq!(NumericField::from(None), NotANumber);
        assert_eq!(NotANumber.to_string(), "NaN");
    }
}
