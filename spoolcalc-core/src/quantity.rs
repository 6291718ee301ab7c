//! Observable numeric cell
//!
//! A [`Quantity`] stores one `f64`, NaN meaning "unset". Setting it reports
//! whether the stored value actually changed; the engine turns that into a
//! change notification and a cascade. Two NaNs count as equal here, so
//! re-clearing an unset field is not a change.

/// One numeric cell, NaN when unset
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    value: f64,
}

impl Default for Quantity {
    fn default() -> Self {
        Self::unset()
    }
}

impl Quantity {
    /// Cell holding no value
    pub const fn unset() -> Self {
        Self { value: f64::NAN }
    }

    /// Cell holding `value`
    pub const fn new(value: f64) -> Self {
        Self { value }
    }

    /// Raw value, NaN when unset
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value if set
    pub fn get(&self) -> Option<f64> {
        if self.value.is_nan() {
            None
        } else {
            Some(self.value)
        }
    }

    /// True when holding a number
    pub fn is_set(&self) -> bool {
        !self.value.is_nan()
    }

    /// Store `value`, returning the previous value if it changed
    pub fn set(&mut self, value: f64) -> Option<f64> {
        if same_value(self.value, value) {
            return None;
        }
        let old = self.value;
        self.value = value;
        Some(old)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        same_value(self.value, other.value)
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Option<f64>> for Quantity {
    fn from(value: Option<f64>) -> Self {
        value.map_or_else(Self::unset, Self::new)
    }
}

/// Equality where NaN equals NaN
pub fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Parse the longest numeric prefix of `text`, NaN if there is none
///
/// Form inputs arrive as text such as `"1000"`, `" 12.5 g"` or `""`. Leading
/// whitespace is skipped, then an optional sign, digits with an optional
/// fraction and exponent, or `Infinity`. Anything after the number is ignored.
pub fn parse_lenient(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if text[end..].starts_with("Infinity") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            mantissa_digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return f64::NAN;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}
