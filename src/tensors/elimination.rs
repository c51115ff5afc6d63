//! Gaussian elimination with scaled partial pivoting.
//!
//! The [GaussianElimination] engine works on a mutably borrowed matrix whose leading
//! `nrows × nrows` block is the system and whose remaining columns are augmented,
//! for example with a right-hand side or an identity block.
//! The convenience methods on [Matrix] ([Matrix::det], [Matrix::inv], [Matrix::solve]
//! and [Matrix::solve_augmented]) run the engine on a private copy of the matrix,
//! whereas [Matrix::inv_in_place] reduces the matrix it is called on.

use tracing::{debug, instrument, trace};

use crate::domains::OrderedField;

use super::matrix::{Matrix, MatrixError};

/// The result of one or more pivoting steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PivotOutcome {
    /// The pivot was already in place.
    NoSwap,
    /// Two rows were exchanged, which flips the sign of the determinant.
    Swap,
    /// No usable pivot exists.
    Singular,
}

impl PivotOutcome {
    /// Combine a cumulative outcome with the outcome of the next step.
    /// `Singular` dominates and two swaps cancel.
    pub fn then(self, next: PivotOutcome) -> PivotOutcome {
        match (self, next) {
            (PivotOutcome::Singular, _) | (_, PivotOutcome::Singular) => PivotOutcome::Singular,
            (PivotOutcome::Swap, PivotOutcome::Swap)
            | (PivotOutcome::NoSwap, PivotOutcome::NoSwap) => PivotOutcome::NoSwap,
            _ => PivotOutcome::Swap,
        }
    }
}

/// Gaussian elimination engine over an ordered field.
pub struct GaussianElimination<'a, F: OrderedField> {
    matrix: &'a mut Matrix<F>,
    outcome: Option<PivotOutcome>,
}

impl<'a, F: OrderedField> GaussianElimination<'a, F> {
    /// Create an engine for `matrix`, which needs at least as many columns as rows.
    pub fn new(matrix: &'a mut Matrix<F>) -> Result<GaussianElimination<'a, F>, MatrixError> {
        if matrix.ncols < matrix.nrows {
            return Err(MatrixError::ShapeMismatch {
                expected: (matrix.nrows, matrix.nrows),
                found: (matrix.nrows, matrix.ncols),
            });
        }

        Ok(GaussianElimination {
            matrix,
            outcome: None,
        })
    }

    /// The working matrix.
    pub fn matrix(&self) -> &Matrix<F> {
        self.matrix
    }

    /// The cumulative outcome of [Self::eliminate], if it has been run.
    pub fn outcome(&self) -> Option<PivotOutcome> {
        self.outcome
    }

    /// Find the row `r >= k` with the largest scaled ratio `|M[r,k]| / max_c |M[r,c]|`,
    /// where `c` ranges over the columns `k..nrows`. Ties keep the earliest row.
    fn select_pivot(&self, k: u32) -> Result<Option<u32>, MatrixError> {
        let m = &*self.matrix;
        let field = &m.field;

        let mut best: Option<(u32, F::Element)> = None;
        for r in k..m.nrows {
            let mut greatest = field.zero();
            for c in k..m.nrows {
                let a = field.abs(&m[(r, c)]);
                if field.cmp(&a, &greatest).is_gt() {
                    greatest = a;
                }
            }

            let ratio = if F::is_zero(&greatest) {
                field.zero()
            } else {
                field.div(&field.abs(&m[(r, k)]), &greatest)?
            };

            let better = match &best {
                Some((_, b)) => field.cmp(&ratio, b).is_gt(),
                None => true,
            };
            if better {
                best = Some((r, ratio));
            }
        }

        Ok(best.and_then(|(r, ratio)| {
            if F::is_zero(&ratio) || field.is_negligible_pivot(&m[(r, k)]) {
                None
            } else {
                Some(r)
            }
        }))
    }

    /// Bring the matrix in row echelon form, stopping at the first singular pivot.
    /// Returns the cumulative outcome, where an odd number of row swaps yields [PivotOutcome::Swap].
    #[instrument(level = "trace", skip_all, fields(nrows = self.matrix.nrows, ncols = self.matrix.ncols))]
    pub fn eliminate(&mut self) -> Result<PivotOutcome, MatrixError> {
        if let Some(o) = self.outcome {
            return Ok(o);
        }

        let (nrows, ncols) = (self.matrix.nrows, self.matrix.ncols);
        if nrows == 0 || ncols == 0 {
            self.outcome = Some(PivotOutcome::Singular);
            return Ok(PivotOutcome::Singular);
        }

        let mut outcome = PivotOutcome::NoSwap;
        for k in 0..nrows {
            let Some(p) = self.select_pivot(k)? else {
                debug!("No usable pivot in column {}", k);
                self.outcome = Some(PivotOutcome::Singular);
                return Ok(PivotOutcome::Singular);
            };

            trace!("Pivot row {} for column {}", p, k);
            let step = if p != k {
                self.matrix.swap_rows_from(k, p, 0);
                PivotOutcome::Swap
            } else {
                PivotOutcome::NoSwap
            };
            outcome = outcome.then(step);

            let m = &mut *self.matrix;
            let zero = m.field.zero();
            for row in k + 1..nrows {
                if F::is_zero(&m[(row, k)]) {
                    continue;
                }

                let s = m.field.div(&m[(row, k)], &m[(k, k)])?;
                m[(row, k)] = zero.clone();
                for l in k + 1..ncols {
                    let mut e = std::mem::replace(&mut m[(row, l)], zero.clone());
                    m.field.sub_mul_assign(&mut e, &m[(k, l)], &s);
                    m[(row, l)] = e;
                }
            }
        }

        self.outcome = Some(outcome);
        Ok(outcome)
    }

    /// Bring the matrix in reduced row echelon form: every pivot is normalized to one and
    /// eliminated from the rows above it. For an `[A | I]` matrix, the right block becomes `A^-1`.
    pub fn back_substitute(&mut self) -> Result<(), MatrixError> {
        if self.eliminate()? == PivotOutcome::Singular {
            return Err(MatrixError::Singular);
        }

        let m = &mut *self.matrix;
        let field = m.field.clone();
        let zero = field.zero();
        for i in (0..m.nrows).rev() {
            if !field.is_one(&m[(i, i)]) {
                let pivot = std::mem::replace(&mut m[(i, i)], field.one());
                for k in i + 1..m.ncols {
                    field.div_assign(&mut m[(i, k)], &pivot)?;
                }
            }

            for k in 0..i {
                if F::is_zero(&m[(k, i)]) {
                    continue;
                }

                let scale = std::mem::replace(&mut m[(k, i)], zero.clone());
                for l in i + 1..m.ncols {
                    let mut e = std::mem::replace(&mut m[(k, l)], zero.clone());
                    field.sub_mul_assign(&mut e, &m[(i, l)], &scale);
                    m[(k, l)] = e;
                }
            }
        }

        Ok(())
    }

    /// Compute the determinant of the leading square block.
    /// A singular matrix has determinant zero.
    pub fn determinant(&mut self) -> Result<F::Element, MatrixError> {
        let outcome = self.eliminate()?;

        let field = &self.matrix.field;
        if outcome == PivotOutcome::Singular {
            return Ok(field.zero());
        }

        let mut det = field.one();
        for x in 0..self.matrix.nrows {
            field.mul_assign(&mut det, &self.matrix[(x, x)]);
        }

        if outcome == PivotOutcome::Swap {
            det = field.neg(&det);
        }

        Ok(det)
    }
}

impl<F: OrderedField> Matrix<F> {
    /// Compute the determinant of a square matrix. The matrix itself is left untouched.
    pub fn det(&self) -> Result<F::Element, MatrixError> {
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }

        let mut m = self.clone();
        let mut engine = GaussianElimination::new(&mut m)?;
        engine.determinant()
    }

    /// Compute the inverse of a square matrix, if it exists.
    /// Otherwise, this function returns [MatrixError::Singular].
    pub fn inv(&self) -> Result<Matrix<F>, MatrixError> {
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }

        let mut m = self.augment(&Matrix::identity(self.nrows, self.field.clone()))?;
        m.inv_in_place()?;

        let n = self.nrows;
        Ok(Matrix::from_fn(n, n, self.field.clone(), |i, j, _| {
            m[(i, j + n)].clone()
        }))
    }

    /// Invert a matrix of the form `[A | I]` in-place, leaving `[I | A^-1]`.
    ///
    /// This overwrites `self`, also when `A` turns out to be singular.
    pub fn inv_in_place(&mut self) -> Result<(), MatrixError> {
        if self.ncols != 2 * self.nrows {
            return Err(MatrixError::ShapeMismatch {
                expected: (self.nrows, 2 * self.nrows),
                found: (self.nrows, self.ncols),
            });
        }

        GaussianElimination::new(self)?.back_substitute()
    }

    /// Solve `A * x = b` for `x`, where `A` is `self` and is square.
    pub fn solve(&self, b: &[F::Element]) -> Result<Vec<F::Element>, MatrixError> {
        if self.nrows != self.ncols {
            return Err(MatrixError::NotSquare);
        }
        if b.len() != self.nrows as usize {
            return Err(MatrixError::ShapeMismatch {
                expected: (self.nrows, 1),
                found: (b.len() as u32, 1),
            });
        }

        self.augment(&Matrix::new_vec(b.to_vec(), self.field.clone()))?
            .solve_augmented()
    }

    /// Solve the system `[A | b]`, where `A` is square and `b` is the last column of `self`.
    /// The matrix itself is left untouched.
    pub fn solve_augmented(&self) -> Result<Vec<F::Element>, MatrixError> {
        if self.ncols != self.nrows + 1 {
            return Err(MatrixError::ShapeMismatch {
                expected: (self.nrows, self.nrows + 1),
                found: (self.nrows, self.ncols),
            });
        }

        let mut m = self.clone();
        GaussianElimination::new(&mut m)?.back_substitute()?;

        Ok(m.row_iter().map(|r| r[r.len() - 1].clone()).collect())
    }
}

#[cfg(test)]
mod test {
    use rug::Rational;

    use super::{GaussianElimination, PivotOutcome};
    use crate::{
        domains::{float::RR, rational::Q},
        tensors::matrix::{Matrix, MatrixError},
    };

    fn rat(data: &[i64], nrows: u32, ncols: u32) -> Matrix<Q> {
        Matrix::from_linear(
            data.iter().map(|x| Rational::from(*x)).collect(),
            nrows,
            ncols,
            Q,
        )
        .unwrap()
    }

    #[test]
    fn combine_outcomes() {
        use PivotOutcome::*;
        assert_eq!(NoSwap.then(Swap), Swap);
        assert_eq!(Swap.then(Swap), NoSwap);
        assert_eq!(Swap.then(Singular), Singular);
        assert_eq!(Singular.then(NoSwap), Singular);
    }

    #[test]
    fn determinant() {
        let a = Matrix::from_linear(vec![2., 3., 4., -1.], 2, 2, RR).unwrap();
        assert_eq!(a.det().unwrap(), -14.);
        assert_eq!(a.data, vec![2., 3., 4., -1.]);

        assert_eq!(rat(&[2, 3, 4, -1], 2, 2).det().unwrap(), -14);
        assert_eq!(rat(&[0, 1, 1, 0], 2, 2).det().unwrap(), -1);
        assert_eq!(rat(&[1, 2, 3, 4, 5, 16, 7, 8, 9], 3, 3).det().unwrap(), 60);
    }

    #[test]
    fn eliminate_records_swaps() {
        let mut a = rat(&[1, 2, 4, -1], 2, 2);
        let mut e = GaussianElimination::new(&mut a).unwrap();
        assert_eq!(e.eliminate().unwrap(), PivotOutcome::Swap);
        assert_eq!(e.outcome(), Some(PivotOutcome::Swap));
        assert_eq!(e.matrix().row(0).unwrap(), &[Rational::from(4), Rational::from(-1)]);
        assert_eq!(e.determinant().unwrap(), -9);
    }

    #[test]
    fn singular() {
        let a = rat(&[1, 2, 2, 4], 2, 2);
        assert_eq!(a.det().unwrap(), 0);
        assert_eq!(a.inv(), Err(MatrixError::Singular));
        assert_eq!(
            a.solve(&[Rational::from(1), Rational::from(2)]),
            Err(MatrixError::Singular)
        );

        let e = Matrix::new(0, 0, Q);
        assert_eq!(e.det().unwrap(), 0);
        assert_eq!(e.inv(), Err(MatrixError::Singular));
    }

    #[test]
    fn float_tolerance() {
        // exactly singular over Q, numerically singular over RR
        let a = Matrix::from_linear(vec![1., 1., 1., 1. + 1e-12], 2, 2, RR).unwrap();
        assert_eq!(a.det().unwrap(), 0.);
        assert_eq!(a.inv(), Err(MatrixError::Singular));

        let b = Matrix::from_linear(
            vec![
                Rational::from(1),
                Rational::from(1),
                Rational::from(1),
                Rational::from(1) + Rational::from((1, 1_000_000_000_000i64)),
            ],
            2,
            2,
            Q,
        )
        .unwrap();
        assert_eq!(b.det().unwrap(), Rational::from((1, 1_000_000_000_000i64)));
    }

    #[test]
    fn inverse() {
        let a = rat(&[1, 2, 3, 4, 5, 16, 7, 8, 9], 3, 3);
        assert_eq!(
            a.inv().unwrap().data,
            vec![
                Rational::from((-83, 60)),
                Rational::from((1, 10)),
                Rational::from((17, 60)),
                Rational::from((19, 15)),
                Rational::from((-1, 5)),
                Rational::from((-1, 15)),
                Rational::from((-1, 20)),
                Rational::from((1, 10)),
                Rational::from((-1, 20))
            ]
        );

        let a = rat(&[3, 2, 15, 4, 9, 6, 7, 8, 17, 45, 23, 12, 13, 14, 15, 16], 4, 4);
        assert_eq!(&a * &a.inv().unwrap(), Matrix::identity(4, Q));
    }

    #[test]
    fn inverse_in_place() {
        let mut a = rat(&[2, 1, 1, 0, 1, 1, 0, 1], 2, 4);
        a.inv_in_place().unwrap();
        assert_eq!(a.row(0).unwrap()[..2], [Rational::from(1), Rational::from(0)]);
        assert_eq!(a.row(0).unwrap()[2..], [Rational::from(1), Rational::from(-1)]);
        assert_eq!(a.row(1).unwrap()[2..], [Rational::from(-1), Rational::from(2)]);

        let mut b = rat(&[1, 2, 3, 4], 2, 2);
        assert!(matches!(
            b.inv_in_place(),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn solve() {
        let a = rat(&[1, 2, 3, 4, 5, 16, 7, 8, 9], 3, 3);
        let b = [Rational::from(1), Rational::from(2), Rational::from(3)];
        assert_eq!(
            a.solve(&b).unwrap(),
            vec![Rational::from((-1, 3)), Rational::from((2, 3)), Rational::new()]
        );

        let aug = rat(&[2, 1, 5, 1, 3, 10], 2, 3);
        assert_eq!(
            aug.solve_augmented().unwrap(),
            vec![Rational::from(1), Rational::from(3)]
        );
        assert_eq!(aug, rat(&[2, 1, 5, 1, 3, 10], 2, 3));

        assert!(matches!(
            a.solve(&b[..2]),
            Err(MatrixError::ShapeMismatch { .. })
        ));
        assert_eq!(rat(&[1, 2, 3, 4, 5, 6], 2, 3).solve(&b[..2]), Err(MatrixError::NotSquare));
    }

    #[test]
    fn wide_matrix_required() {
        let mut a = rat(&[1, 2, 3], 3, 1);
        assert!(matches!(
            GaussianElimination::new(&mut a),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }
}
