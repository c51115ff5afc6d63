use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
};

use rug::Rational;

use super::{DivisionByZero, Field, OrderedField, Ring};

/// The field of rational numbers.
pub type Q = RationalField;
/// The field of rational numbers.
pub const Q: RationalField = RationalField::new();

/// The field of arbitrary-precision rational numbers.
///
/// Elements are always kept in canonical form by [rug], so equality is structural
/// and a pivot is only rejected when it is exactly zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct RationalField;

impl RationalField {
    pub const fn new() -> RationalField {
        RationalField
    }
}

impl Display for RationalField {
    fn fmt(&self, _f: &mut Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl Ring for RationalField {
    type Element = Rational;

    fn add(&self, a: &Rational, b: &Rational) -> Rational {
        Rational::from(a + b)
    }

    fn sub(&self, a: &Rational, b: &Rational) -> Rational {
        Rational::from(a - b)
    }

    fn mul(&self, a: &Rational, b: &Rational) -> Rational {
        Rational::from(a * b)
    }

    fn add_assign(&self, a: &mut Rational, b: &Rational) {
        *a += b;
    }

    fn sub_assign(&self, a: &mut Rational, b: &Rational) {
        *a -= b;
    }

    fn mul_assign(&self, a: &mut Rational, b: &Rational) {
        *a *= b;
    }

    fn sub_mul_assign(&self, a: &mut Rational, b: &Rational, c: &Rational) {
        *a -= Rational::from(b * c);
    }

    fn neg(&self, a: &Rational) -> Rational {
        Rational::from(-a)
    }

    fn zero(&self) -> Rational {
        Rational::new()
    }

    fn one(&self) -> Rational {
        Rational::from(1)
    }

    fn is_zero(a: &Rational) -> bool {
        a.cmp0() == Ordering::Equal
    }

    fn is_one(&self, a: &Rational) -> bool {
        *a == 1
    }
}

impl Field for RationalField {
    fn div(&self, a: &Rational, b: &Rational) -> Result<Rational, DivisionByZero> {
        if Self::is_zero(b) {
            return Err(DivisionByZero);
        }
        Ok(Rational::from(a / b))
    }

    fn div_assign(&self, a: &mut Rational, b: &Rational) -> Result<(), DivisionByZero> {
        if Self::is_zero(b) {
            return Err(DivisionByZero);
        }
        *a /= b;
        Ok(())
    }

    fn inv(&self, a: &Rational) -> Result<Rational, DivisionByZero> {
        if Self::is_zero(a) {
            return Err(DivisionByZero);
        }
        Ok(Rational::from(a.recip_ref()))
    }

    fn from_rational(&self, r: &Rational) -> Rational {
        r.clone()
    }
}

impl OrderedField for RationalField {
    fn cmp(&self, a: &Rational, b: &Rational) -> Ordering {
        Ord::cmp(a, b)
    }

    fn abs(&self, a: &Rational) -> Rational {
        Rational::from(a.abs_ref())
    }
}
