//! Quantity input clamping.
//!
//! Quantity inputs carry their limits as `min`/`max` attributes and the user
//! can type anything into them. Parsing follows the browser's `parseInt`:
//! leading whitespace, an optional sign, then as many digits as are present.
//! A result of zero counts as "no value", matching `parseInt(x) || fallback`.

/// Lower bound used when the input carries no usable `min` attribute.
pub const DEFAULT_MIN_QUANTITY: i64 = 1;

/// Upper bound used when the input carries no usable `max` attribute.
pub const DEFAULT_MAX_QUANTITY: i64 = 999;

/// Inclusive bounds for a quantity input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    min: i64,
    max: i64,
}

impl Default for QuantityBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_QUANTITY,
            max: DEFAULT_MAX_QUANTITY,
        }
    }
}

impl QuantityBounds {
    /// Create bounds from explicit limits.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Build bounds from the raw `min`/`max` attribute values of an input.
    #[must_use]
    pub fn from_attributes(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.and_then(parse_int_prefix).unwrap_or(DEFAULT_MIN_QUANTITY),
            max: max.and_then(parse_int_prefix).unwrap_or(DEFAULT_MAX_QUANTITY),
        }
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// Snap a raw input value into the bounds.
    ///
    /// Non-numeric input snaps to `min`. The `min` check runs first, so with
    /// inverted bounds the result is `max`.
    #[must_use]
    pub fn clamp_input(&self, raw: &str) -> i64 {
        let mut value = parse_int_prefix(raw).unwrap_or(self.min);
        if value < self.min {
            value = self.min;
        }
        if value > self.max {
            value = self.max;
        }
        value
    }
}

/// Integer-prefix parse. Returns `None` for no digits and for zero.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, s.get(1..)?),
        Some(b'+') => (false, s.get(1..)?),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits.get(..end)?;
    if magnitude.is_empty() {
        return None;
    }

    // Saturate absurdly long digit runs instead of failing
    let value = magnitude.parse::<i64>().unwrap_or(i64::MAX);
    let value = if negative { -value } else { value };
    (value != 0).then_some(value)
}
