//! Fieldsolve solves linear systems and linear programs over abstract fields.
//!
//! Every algorithm is generic over a field type, such as the floating point field [RR](domains::float::RR)
//! or the exact rational field [Q](domains::rational::Q), and performs all of its arithmetic through
//! that field. The same code therefore gives approximate results over `f64` and exact results over
//! arbitrary-precision rationals.
//!
//! For example:
//!
//! ```
//! use fieldsolve::{
//!     domains::rational::Q,
//!     optimize::{
//!         linear_program::{ConstraintFunction, ObjectiveFunction},
//!         simplex::Simplex,
//!     },
//!     tensors::matrix::Matrix,
//! };
//!
//! fn main() {
//!     let m = Matrix::from_linear(vec![2.into(), 3.into(), 4.into(), (-1).into()], 2, 2, Q).unwrap();
//!     println!("det = {}", m.det().unwrap());
//!
//!     let objective = ObjectiveFunction::parse("max 4x + y + 4z", &Q).unwrap();
//!     let constraints = ["2x + y + z <= 2", "x + 2y + 3z <= 4", "2x + 2y + z <= 2"]
//!         .iter()
//!         .map(|c| ConstraintFunction::parse(c, &Q).unwrap())
//!         .collect::<Vec<_>>();
//!
//!     let r = Simplex::new(Q).solve_named(&objective, &constraints).unwrap();
//!     println!("optimum {:?} at {:?}", r.objective, r.values);
//! }
//! ```
//!
//! The crate emits [tracing] events for singular pivots, unbounded programs and
//! the simplex pivot cap. Install a subscriber to see them.

pub mod domains;
pub mod optimize;
pub mod parser;
pub mod tensors;
