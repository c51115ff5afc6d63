//! Matrices and linear system solving.
//!
//! [Matrix](matrix::Matrix) is a dense, row-major container over any [Ring](crate::domains::Ring).
//! Over an [OrderedField](crate::domains::OrderedField), the [elimination] module adds
//! determinants, inverses and linear solves through Gaussian elimination with scaled partial pivoting.

pub mod elimination;
pub mod matrix;
