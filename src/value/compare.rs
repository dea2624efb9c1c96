//! Cross-kind three-way comparison of dynamic values
//!
//! Ordering rules:
//! - same numeric kind: direct numeric comparison
//! - mixed numeric kinds: the right operand is cast to the left operand's
//!   representation (wrapping for int/uint, truncating for float -> int)
//! - number vs string: the string is parsed as the left operand's kind;
//!   a parse failure is `Incomparable`
//! - string vs number: the number is formatted as a decimal string and the
//!   two strings are compared byte-wise
//! - string vs string: byte-wise
//! - anything involving bool, seq, nested or null: `Incomparable`
//!
//! The number/string rules are not mirror images: `compare(10, "9")` is
//! `Greater` while `compare("10", 9)` is `Less`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::types::{Value, ValueKind};

/// No ordering is defined between the two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incomparable {
    pub left: ValueKind,
    pub right: ValueKind,
}

impl Incomparable {
    fn between(x: &Value, y: &Value) -> Self {
        Self {
            left: x.kind(),
            right: y.kind(),
        }
    }
}

impl fmt::Display for Incomparable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uncomparable kinds {} and {}", self.left, self.right)
    }
}

impl std::error::Error for Incomparable {}

/// Compares `x` against `y`.
///
/// `Ok(Ordering::Equal)` is the only notion of equality used by the store.
pub fn compare(x: &Value, y: &Value) -> Result<Ordering, Incomparable> {
    let ordering = match (x, y) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Int(a), Value::UInt(b)) => a.cmp(&(*b as i64)),
        (Value::Int(a), Value::Float(b)) => a.cmp(&(*b as i64)),
        (Value::Int(a), Value::Str(b)) => a.cmp(&parse::<i64>(b, x, y)?),

        (Value::UInt(a), Value::Int(b)) => a.cmp(&(*b as u64)),
        (Value::UInt(a), Value::UInt(b)) => a.cmp(b),
        (Value::UInt(a), Value::Float(b)) => a.cmp(&(*b as u64)),
        (Value::UInt(a), Value::Str(b)) => a.cmp(&parse::<u64>(b, x, y)?),

        (Value::Float(a), Value::Int(b)) => float_order(*a, *b as f64),
        (Value::Float(a), Value::UInt(b)) => float_order(*a, *b as f64),
        (Value::Float(a), Value::Float(b)) => float_order(*a, *b),
        (Value::Float(a), Value::Str(b)) => float_order(*a, parse::<f64>(b, x, y)?),

        (Value::Str(a), Value::Int(b)) => a.as_str().cmp(b.to_string().as_str()),
        (Value::Str(a), Value::UInt(b)) => a.as_str().cmp(b.to_string().as_str()),
        (Value::Str(a), Value::Float(b)) => a.as_str().cmp(b.to_string().as_str()),
        (Value::Str(a), Value::Str(b)) => a.as_str().cmp(b.as_str()),

        _ => return Err(Incomparable::between(x, y)),
    };
    Ok(ordering)
}

fn parse<T: FromStr>(s: &str, x: &Value, y: &Value) -> Result<T, Incomparable> {
    s.parse::<T>().map_err(|_| Incomparable::between(x, y))
}

/// Equal, else less, else greater: NaN on either side orders as greater.
fn float_order(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(x: impl Into<Value>, y: impl Into<Value>) -> Result<Ordering, Incomparable> {
        compare(&x.into(), &y.into())
    }

    #[test]
    fn test_same_kind_numeric() {
        assert_eq!(cmp(1i64, 2i64), Ok(Ordering::Less));
        assert_eq!(cmp(2u64, 2u64), Ok(Ordering::Equal));
        assert_eq!(cmp(2.5f64, 1.5f64), Ok(Ordering::Greater));
    }

    #[test]
    fn test_int_equals_float() {
        assert_eq!(cmp(5i64, 5.0f64), Ok(Ordering::Equal));
        assert_eq!(cmp(5.0f64, 5i64), Ok(Ordering::Equal));
    }

    #[test]
    fn test_float_truncates_against_int() {
        // 5.9 is cast to 5 when the left operand is an int
        assert_eq!(cmp(5i64, 5.9f64), Ok(Ordering::Equal));
        // but compared exactly when the left operand is the float
        assert_eq!(cmp(5.9f64, 5i64), Ok(Ordering::Greater));
    }

    #[test]
    fn test_int_uint_wrapping_cast() {
        assert_eq!(cmp(3i64, 3u64), Ok(Ordering::Equal));
        // u64::MAX wraps to -1 when read as a signed integer
        assert_eq!(cmp(-1i64, u64::MAX), Ok(Ordering::Equal));
        // -1 wraps to u64::MAX when read as an unsigned integer
        assert_eq!(cmp(1u64, -1i64), Ok(Ordering::Less));
    }

    #[test]
    fn test_number_parses_string() {
        assert_eq!(cmp(10i64, "9"), Ok(Ordering::Greater));
        assert_eq!(cmp(10u64, "10"), Ok(Ordering::Equal));
        assert_eq!(cmp(1.5f64, "2.25"), Ok(Ordering::Less));
    }

    #[test]
    fn test_number_vs_unparsable_string_is_incomparable() {
        let err = cmp(10i64, "ten").unwrap_err();
        assert_eq!(err.left, ValueKind::Int);
        assert_eq!(err.right, ValueKind::Str);
        // integers do not accept a fractional literal
        assert!(cmp(10i64, "10.0").is_err());
        assert!(cmp(10u64, "-1").is_err());
    }

    #[test]
    fn test_string_vs_number_is_lexicographic() {
        // "10" < "9" byte-wise, even though 10 > 9 numerically
        assert_eq!(cmp("10", 9i64), Ok(Ordering::Less));
        assert_eq!(cmp(10i64, "9"), Ok(Ordering::Greater));
        assert_eq!(cmp("5", 5.0f64), Ok(Ordering::Equal));
        assert_eq!(cmp("42", 42u64), Ok(Ordering::Equal));
    }

    #[test]
    fn test_strings_bytewise() {
        assert_eq!(cmp("apple", "banana"), Ok(Ordering::Less));
        assert_eq!(cmp("B", "a"), Ok(Ordering::Less));
        assert_eq!(cmp("same", "same"), Ok(Ordering::Equal));
    }

    #[test]
    fn test_unordered_kinds() {
        assert!(cmp(true, true).is_err());
        assert!(cmp(Value::Null, 1i64).is_err());
        assert!(cmp(1i64, Value::Null).is_err());
        assert!(cmp("a", false).is_err());
        assert!(cmp(Value::Seq(vec![]), Value::Seq(vec![])).is_err());
    }

    #[test]
    fn test_nan_orders_greater() {
        assert_eq!(cmp(f64::NAN, 1.0f64), Ok(Ordering::Greater));
        assert_eq!(cmp(f64::NAN, f64::NAN), Ok(Ordering::Greater));
    }

    #[test]
    fn test_incomparable_display() {
        let err = cmp(true, 1i64).unwrap_err();
        assert_eq!(err.to_string(), "uncomparable kinds bool and int");
    }
}
