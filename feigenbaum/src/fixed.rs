//! `fixed` is the module holding the FixedPoint number type used by the
//! exact rendering backend. A bifurcation sweep runs tens of thousands of
//! logistic-map steps per pixel column, and floating point rounding can
//! accumulate differently across platforms over a run that long. Fixed point
//! arithmetic truncates the same way everywhere, so the picture is
//! reproducible bit-for-bit.

use std::ops::{Add, Div, Mul, Sub};

/// Bits reserved for the integer part of a value.
pub const UNIT_BITS: u32 = 3;
/// Bits reserved for the fractional part; also the binary scale factor.
pub const FRAC_BITS: u32 = 61;

/// A non-negative fixed-point number packed into a single u64 register as
/// `(units << FRAC_BITS) | frac`, representing `units + frac / 2^FRAC_BITS`.
/// With 3 unit bits and 61 fraction bits the representable range is
/// [0, 8), which covers both the k parameter domain [0, 4) and the
/// trajectory domain [0, 1) of the logistic map.
///
/// Values are immutable; every operator returns a fresh value. Going out of
/// range (construction outside the bit budgets, additive overflow,
/// subtractive underflow) is a caller bug and panics rather than returning
/// an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedPoint {
    raw: u64,
}

impl FixedPoint {
    pub const ZERO: FixedPoint = FixedPoint { raw: 0 };
    pub const ONE: FixedPoint = FixedPoint { raw: 1 << FRAC_BITS };
    pub const HALF: FixedPoint = FixedPoint { raw: 1 << (FRAC_BITS - 1) };

    /// Build a value from an integer part and a fraction numerator, i.e.
    /// `units + frac / 2^FRAC_BITS`. Panics if either part does not fit its
    /// bit budget.
    pub fn new(units: u64, frac: u64) -> FixedPoint {
        assert!(
            units < (1 << UNIT_BITS),
            "integer part {} does not fit in {} bits",
            units,
            UNIT_BITS
        );
        assert!(
            frac < (1 << FRAC_BITS),
            "fraction numerator {} does not fit in {} bits",
            frac,
            FRAC_BITS
        );
        FixedPoint {
            raw: (units << FRAC_BITS) | frac,
        }
    }

    /// Convert from a float, truncating anything below the last fractional
    /// bit. Only used at the configuration boundary (CLI bounds for k); the
    /// sweep itself never touches floating point on this backend.
    pub fn from_f64(v: f64) -> FixedPoint {
        assert!(v >= 0.0, "fixed-point values are non-negative, got {}", v);
        assert!(
            v < (1u64 << UNIT_BITS) as f64,
            "{} does not fit in {} integer bits",
            v,
            UNIT_BITS
        );
        let units = v as u64;
        let frac = ((v - units as f64) * (1u64 << FRAC_BITS) as f64) as u64;
        FixedPoint::new(units, frac)
    }

    pub fn to_f64(self) -> f64 {
        self.raw as f64 / (1u64 << FRAC_BITS) as f64
    }

    /// The underlying scaled register. Exposed for exact comparison against
    /// high-precision references.
    pub fn raw(self) -> u64 {
        self.raw
    }
}

impl Add for FixedPoint {
    type Output = FixedPoint;
    fn add(self, rhs: FixedPoint) -> FixedPoint {
        match self.raw.checked_add(rhs.raw) {
            Some(raw) => FixedPoint { raw: raw },
            None => panic!("fixed-point addition overflowed the register"),
        }
    }
}

impl Sub for FixedPoint {
    type Output = FixedPoint;
    fn sub(self, rhs: FixedPoint) -> FixedPoint {
        match self.raw.checked_sub(rhs.raw) {
            Some(raw) => FixedPoint { raw: raw },
            None => panic!("fixed-point subtraction underflowed below zero"),
        }
    }
}

impl Mul for FixedPoint {
    type Output = FixedPoint;
    /// Widen both registers to 128 bits, multiply, and shift back down by
    /// the scale. The widening is what makes the intermediate product safe;
    /// the shift truncates toward zero, losing at most one unit in the last
    /// fractional bit.
    fn mul(self, rhs: FixedPoint) -> FixedPoint {
        let wide = self.raw as u128 * rhs.raw as u128;
        let scaled = wide >> FRAC_BITS;
        assert!(
            scaled <= std::u64::MAX as u128,
            "fixed-point multiplication overflowed the register"
        );
        FixedPoint { raw: scaled as u64 }
    }
}

impl Mul<u32> for FixedPoint {
    type Output = u32;
    /// Scale by a plain integer, producing a plain integer: `(raw * rhs) >>
    /// FRAC_BITS`, truncated. This is the pixel conversion: an x in [0, 1)
    /// times a canvas height lands in [0, height).
    fn mul(self, rhs: u32) -> u32 {
        ((self.raw as u128 * rhs as u128) >> FRAC_BITS) as u32
    }
}

impl Div<u32> for FixedPoint {
    type Output = FixedPoint;
    fn div(self, rhs: u32) -> FixedPoint {
        FixedPoint {
            raw: self.raw / rhs as u64,
        }
    }
}
