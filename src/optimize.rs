//! Linear programming over ordered fields.
//!
//! The [simplex] module contains the tableau solver, which takes positional input:
//! an objective vector, a constraint matrix and a right-hand side.
//! The [linear_program] module builds such input from named variables.

pub mod linear_program;
pub mod simplex;
