use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
};

use rug::Rational;

use super::{DivisionByZero, Field, OrderedField, Ring};

/// The default magnitude below which a floating point pivot is considered zero.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-10;

/// The field of double precision floating point numbers.
pub type RR = FloatField;
/// The field of double precision floating point numbers, with the default pivot tolerance.
pub const RR: FloatField = FloatField::new();

/// A field of `f64` values.
///
/// Arithmetic is only approximately associative and distributive, so the
/// elimination engine treats every pivot with a magnitude at most `tolerance` as zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatField {
    tolerance: f64,
}

impl FloatField {
    pub const fn new() -> FloatField {
        FloatField {
            tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }

    /// Create a float field that rejects pivots with a magnitude at most `tolerance`.
    pub const fn with_tolerance(tolerance: f64) -> FloatField {
        FloatField { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for FloatField {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FloatField {
    fn fmt(&self, _f: &mut Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl Ring for FloatField {
    type Element = f64;

    #[inline]
    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    #[inline]
    fn sub(&self, a: &f64, b: &f64) -> f64 {
        a - b
    }

    #[inline]
    fn mul(&self, a: &f64, b: &f64) -> f64 {
        a * b
    }

    #[inline]
    fn add_assign(&self, a: &mut f64, b: &f64) {
        *a += b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut f64, b: &f64) {
        *a -= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut f64, b: &f64) {
        *a *= b;
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut f64, b: &f64, c: &f64) {
        *a -= b * c;
    }

    #[inline]
    fn neg(&self, a: &f64) -> f64 {
        -a
    }

    #[inline]
    fn zero(&self) -> f64 {
        0.
    }

    #[inline]
    fn one(&self) -> f64 {
        1.
    }

    #[inline]
    fn is_zero(a: &f64) -> bool {
        *a == 0.
    }

    #[inline]
    fn is_one(&self, a: &f64) -> bool {
        *a == 1.
    }
}

impl Field for FloatField {
    #[inline]
    fn div(&self, a: &f64, b: &f64) -> Result<f64, DivisionByZero> {
        if *b == 0. {
            return Err(DivisionByZero);
        }
        Ok(a / b)
    }

    #[inline]
    fn div_assign(&self, a: &mut f64, b: &f64) -> Result<(), DivisionByZero> {
        *a = self.div(a, b)?;
        Ok(())
    }

    #[inline]
    fn inv(&self, a: &f64) -> Result<f64, DivisionByZero> {
        self.div(&1., a)
    }

    fn from_rational(&self, r: &Rational) -> f64 {
        r.to_f64()
    }
}

impl OrderedField for FloatField {
    /// Compare two floats. `NaN` compares equal to everything, so it never
    /// wins a pivot or ratio test.
    fn cmp(&self, a: &f64, b: &f64) -> Ordering {
        a.partial_cmp(b).unwrap_or(Ordering::Equal)
    }

    #[inline]
    fn abs(&self, a: &f64) -> f64 {
        a.abs()
    }

    fn is_negligible_pivot(&self, a: &f64) -> bool {
        a.abs() <= self.tolerance
    }
}
