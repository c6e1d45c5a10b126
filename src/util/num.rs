/// Characters PHP-style numeric strings may be padded with.
pub const NUMERIC_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\u{0b}', '\u{0c}'];

/// A number recovered from a string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// The text had no fraction or exponent and fits in an `i64`.
    Int(i64),
    /// Everything else.
    Float(f64),
}

impl Number {
    /// The number as a float; integers beyond `2^53` round.
    #[must_use]
    pub const fn to_f64(self) -> f64 {
        match self {
            Self::Int(n) => i64_to_f64(n),
            Self::Float(r) => r,
        }
    }
}

/// Reads the numeric prefix of a string.
///
/// Leading whitespace and an optional sign are accepted, followed by digits
/// with an optional fraction and exponent. Integer text that overflows `i64`
/// is read as a float.
///
/// ## Returns
/// - `None` when the string does not start with a number.
/// - `Some((number, true))` when the whole string is numeric, trailing
///   whitespace allowed.
/// - `Some((number, false))` when only a prefix is numeric, as in `"12abc"`.
///
/// ## Example
/// ```
/// use opal::util::num::{Number, numeric_prefix};
///
/// assert_eq!(numeric_prefix(" 42 "), Some((Number::Int(42), true)));
/// assert_eq!(numeric_prefix("1.5e3"), Some((Number::Float(1500.0), true)));
/// assert_eq!(numeric_prefix("12abc"), Some((Number::Int(12), false)));
/// assert_eq!(numeric_prefix("abc"), None);
/// ```
#[must_use]
pub fn numeric_prefix(text: &str) -> Option<(Number, bool)> {
    let trimmed = text.trim_start_matches(NUMERIC_WHITESPACE);
    let bytes = trimmed.as_bytes();
    let digits_from = |mut index: usize| {
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            index += 1;
        }
        index
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let int_digits = int_end - end;
    end = int_end;

    let mut is_float = false;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        frac_digits = frac_end - end - 1;
        if int_digits > 0 || frac_digits > 0 {
            is_float = true;
            end = frac_end;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            is_float = true;
            end = exponent_end;
        }
    }

    let literal = &trimmed[..end];
    let whole = trimmed[end..].chars().all(|c| NUMERIC_WHITESPACE.contains(&c));

    let number = if is_float {
        Number::Float(literal.parse().ok()?)
    } else {
        match literal.parse::<i64>() {
            Ok(value) => Number::Int(value),
            Err(_) => Number::Float(literal.parse().ok()?),
        }
    };

    Some((number, whole))
}

/// Converts a float to an integer the way an `(int)` cast does.
///
/// The fraction is truncated toward zero. `NaN` and infinities become `0`;
/// finite values beyond the `i64` range saturate.
///
/// ## Example
/// ```
/// use opal::util::num::f64_to_i64_truncating;
///
/// assert_eq!(f64_to_i64_truncating(-3.9), -3);
/// assert_eq!(f64_to_i64_truncating(f64::NAN), 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn f64_to_i64_truncating(value: f64) -> i64 {
    if value.is_finite() {
        value as i64
    } else {
        0
    }
}

/// Converts a float to an integer if and only if no information is lost.
///
/// ## Returns
/// - `Some(i64)` for finite integral values inside the `i64` range.
/// - `None` for fractional, non-finite or out-of-range values.
///
/// ## Example
/// ```
/// use opal::util::num::f64_to_i64_exact;
///
/// assert_eq!(f64_to_i64_exact(8.0), Some(8));
/// assert_eq!(f64_to_i64_exact(8.5), None);
/// assert_eq!(f64_to_i64_exact(1e300), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_exact(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if !value.is_finite() || value.fract() != 0.0 || value < i64::MIN as f64
       || value >= i64::MAX as f64
    {
        return None;
    }
    Some(value as i64)
}

/// Converts an `i64` to `f64`.
///
/// Values beyond `2^53` round to the nearest representable float, which is
/// the documented behavior of integer overflow promotion.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Formats a float the way string conversion prints it.
///
/// Integral values print without a fraction, very large and very small
/// magnitudes use exponent notation, and the special values print as `NAN`,
/// `INF` and `-INF`. Every finite result reads back as the same float.
///
/// ## Example
/// ```
/// use opal::util::num::format_float;
///
/// assert_eq!(format_float(3.0), "3");
/// assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(format_float(1e20), "1.0E+20");
/// assert_eq!(format_float(f64::NEG_INFINITY), "-INF");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e15 || (magnitude != 0.0 && magnitude < 1e-4) {
        let formatted = format!("{value:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let fraction = if mantissa.contains('.') { "" } else { ".0" };
        let sign = if exponent.starts_with('-') { "" } else { "+" };
        return format!("{mantissa}{fraction}E{sign}{exponent}");
    }

    format!("{value}")
}
