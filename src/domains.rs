//! Defines the algebraic traits the solvers are generic over.
//!
//! The core trait is [Ring], which has two binary operations, addition and multiplication.
//! Each ring has an associated element type, that should not be confused with the ring type itself.
//! For example:
//! - The field of floating point numbers [RR](type@float::RR) has elements of type [f64].
//! - The field of rational numbers [Q](type@rational::Q) has elements of type [Rational](rug::Rational).
//!
//! In general, the ring elements are not combined with native operators,
//! but rather the ring itself performs the arithmetic. The [Matrix](crate::tensors::matrix::Matrix),
//! the Gaussian elimination engine and the simplex solver are all generic over the ring type.
//!
//! An extension of the ring trait is the [`Field`] trait, which adds the ability to divide and invert elements.
//! The [`OrderedField`] trait adds a total ordering, which is needed for pivot selection.
pub mod float;
pub mod rational;

use std::cmp::Ordering;
use std::fmt::{Debug, Display};

use rug::Rational;

/// Error returned when dividing by the additive identity of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivisionByZero;

impl Display for DivisionByZero {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Division by zero")
    }
}

impl std::error::Error for DivisionByZero {}

/// A ring is a set with two binary operations, addition and multiplication.
///
/// Each ring has an element type, that should not be confused with the ring type itself.
/// Implementations must satisfy the ring axioms within their precision domain;
/// this is assumed, not verified.
pub trait Ring: Clone + PartialEq + Debug + Display {
    /// The element of a ring. For example, the elements of [RR](type@float::RR) are [f64].
    type Element: Clone + PartialEq + Debug + Display;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element);
    /// Compute `a -= b * c`.
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    fn is_zero(a: &Self::Element) -> bool;
    fn is_one(&self, a: &Self::Element) -> bool;
}

/// A field is a ring that supports division and inversion.
pub trait Field: Ring {
    /// Divide `a` by `b`. Fails when `b` is zero.
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Result<Self::Element, DivisionByZero>;
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) -> Result<(), DivisionByZero>;
    fn inv(&self, a: &Self::Element) -> Result<Self::Element, DivisionByZero>;
    /// Embed an exact rational number into the field.
    fn from_rational(&self, r: &Rational) -> Self::Element;
}

/// A field with a total ordering that is compatible with its arithmetic.
pub trait OrderedField: Field {
    fn cmp(&self, a: &Self::Element, b: &Self::Element) -> Ordering;

    fn abs(&self, a: &Self::Element) -> Self::Element {
        if self.is_negative(a) {
            self.neg(a)
        } else {
            a.clone()
        }
    }

    fn is_negative(&self, a: &Self::Element) -> bool {
        self.cmp(a, &self.zero()) == Ordering::Less
    }

    fn is_positive(&self, a: &Self::Element) -> bool {
        self.cmp(a, &self.zero()) == Ordering::Greater
    }

    /// Return `true` if `a` is too small to be used as a pivot.
    /// Exact fields only reject zero, approximate fields may use a tolerance.
    fn is_negligible_pivot(&self, a: &Self::Element) -> bool {
        Self::is_zero(a)
    }
}
