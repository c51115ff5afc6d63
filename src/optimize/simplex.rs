//! A tableau simplex solver for `max c·x` subject to `A x <= b` and `x >= 0`.
//!
//! The tableau has one row per constraint plus the objective row and
//! `nvars + ncons + 2` columns: the original variables, one slack variable per constraint,
//! a column tracking the objective and the right-hand side.
//! The entering column is the most negative entry of the objective row and the leaving
//! row follows the minimum ratio rule. Both ties are resolved towards the lowest index.
//!
//! The number of pivots is capped by [SimplexConfig::max_iterations]. A solve that hits the cap
//! reports [Objective::IterationLimit] with the value of the last tableau, which may be
//! suboptimal for degenerate problems.

use tracing::{debug, instrument, trace};

use crate::{
    domains::{DivisionByZero, OrderedField},
    tensors::matrix::Matrix,
};

/// The default cap on the number of pivots.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Settings for the simplex solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplexConfig {
    /// The maximum number of pivots.
    pub max_iterations: usize,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Errors returned for malformed linear programs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimplexError {
    /// The objective has no variables, or is not a maximization.
    InvalidObjective(String),
    /// A constraint has no variables or is not of the form `... <= bound`.
    InvalidConstraint { index: usize, reason: String },
    NoConstraints,
    /// The constraint matrix or right-hand side does not match the objective.
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    DivisionByZero,
}

impl std::fmt::Display for SimplexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimplexError::InvalidObjective(reason) => write!(f, "Invalid objective: {}", reason),
            SimplexError::InvalidConstraint { index, reason } => {
                write!(f, "Invalid constraint {}: {}", index, reason)
            }
            SimplexError::NoConstraints => write!(f, "At least one constraint is required"),
            SimplexError::ShapeMismatch { expected, found } => write!(
                f,
                "Shape mismatch: expected ({},{}), found ({},{})",
                expected.0, expected.1, found.0, found.1
            ),
            SimplexError::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}

impl std::error::Error for SimplexError {}

impl From<DivisionByZero> for SimplexError {
    fn from(_: DivisionByZero) -> Self {
        SimplexError::DivisionByZero
    }
}

/// The objective value reached by the solver.
#[derive(Clone, Debug, PartialEq)]
pub enum Objective<T> {
    /// No entering column remains: the value is optimal.
    Optimal(T),
    /// The pivot cap was reached before optimality was established.
    IterationLimit(T),
    /// The entering column has no positive entry, so the objective can grow without bound.
    Unbounded,
}

impl<T> Objective<T> {
    /// The objective value, or `None` for an unbounded problem.
    pub fn value(&self) -> Option<&T> {
        match self {
            Objective::Optimal(v) | Objective::IterationLimit(v) => Some(v),
            Objective::Unbounded => None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, Objective::Optimal(_))
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Objective::Unbounded)
    }
}

/// The result of a simplex solve.
#[derive(Clone, Debug, PartialEq)]
pub struct SimplexSolution<T> {
    /// The value of every original variable, slack variables excluded.
    /// For an unbounded problem, these are the values at the last vertex that was visited.
    pub values: Vec<T>,
    pub objective: Objective<T>,
    /// The number of pivots that were performed.
    pub iterations: usize,
}

/// A simplex solver over the ordered field `F`.
#[derive(Clone, Debug)]
pub struct Simplex<F: OrderedField> {
    field: F,
    config: SimplexConfig,
}

impl<F: OrderedField> Simplex<F> {
    pub fn new(field: F) -> Simplex<F> {
        Simplex {
            field,
            config: SimplexConfig::default(),
        }
    }

    pub fn with_config(field: F, config: SimplexConfig) -> Simplex<F> {
        Simplex { field, config }
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn config(&self) -> &SimplexConfig {
        &self.config
    }

    /// Maximize `objective · x` subject to `constraints * x <= rhs` and `x >= 0`.
    ///
    /// Any other objective sense or constraint direction has to be rewritten by the caller,
    /// for example by negating the objective.
    #[instrument(level = "trace", skip_all, fields(nvars = objective.len(), ncons = rhs.len()))]
    pub fn solve(
        &self,
        objective: &[F::Element],
        constraints: &Matrix<F>,
        rhs: &[F::Element],
    ) -> Result<SimplexSolution<F::Element>, SimplexError> {
        if objective.is_empty() {
            return Err(SimplexError::InvalidObjective(
                "the objective has no variables".to_owned(),
            ));
        }
        if constraints.nrows() == 0 {
            return Err(SimplexError::NoConstraints);
        }
        if constraints.ncols() != objective.len() {
            return Err(SimplexError::ShapeMismatch {
                expected: (constraints.nrows(), objective.len()),
                found: (constraints.nrows(), constraints.ncols()),
            });
        }
        if rhs.len() != constraints.nrows() {
            return Err(SimplexError::ShapeMismatch {
                expected: (constraints.nrows(), 1),
                found: (rhs.len(), 1),
            });
        }

        let mut tableau = Tableau::new(&self.field, objective, constraints, rhs);

        let mut iterations = 0;
        while iterations < self.config.max_iterations {
            let Some(col) = tableau.entering_column() else {
                break;
            };

            let Some(row) = tableau.leaving_row(col)? else {
                debug!("Column {} is unbounded after {} pivots", col, iterations);
                return Ok(SimplexSolution {
                    values: tableau.values(),
                    objective: Objective::Unbounded,
                    iterations,
                });
            };

            trace!("Pivot on ({}, {})", row, col);
            tableau.pivot(row, col)?;
            iterations += 1;
        }

        let value = tableau.objective_value();
        let objective = if tableau.entering_column().is_some() {
            debug!(
                "Stopped after {} pivots without reaching optimality",
                iterations
            );
            Objective::IterationLimit(value)
        } else {
            Objective::Optimal(value)
        };

        Ok(SimplexSolution {
            values: tableau.values(),
            objective,
            iterations,
        })
    }
}

/// The working state of a single solve.
struct Tableau<F: OrderedField> {
    m: Matrix<F>,
    nvars: u32,
}

impl<F: OrderedField> Tableau<F> {
    fn new(
        field: &F,
        objective: &[F::Element],
        constraints: &Matrix<F>,
        rhs: &[F::Element],
    ) -> Tableau<F> {
        let nvars = objective.len() as u32;
        let ncons = rhs.len() as u32;
        let width = nvars + ncons + 2;

        let m = Matrix::from_fn(ncons + 1, width, field.clone(), |i, j, f| {
            if i == 0 {
                if j < nvars {
                    f.neg(&objective[j as usize])
                } else if j == width - 2 {
                    f.one()
                } else {
                    f.zero()
                }
            } else if j < nvars {
                constraints[(i - 1, j)].clone()
            } else if j == nvars + i - 1 {
                f.one()
            } else if j == width - 1 {
                rhs[i as usize - 1].clone()
            } else {
                f.zero()
            }
        });

        Tableau { m, nvars }
    }

    fn rhs_col(&self) -> u32 {
        self.m.ncols - 1
    }

    /// The column with the most negative entry in the objective row, if any.
    fn entering_column(&self) -> Option<u32> {
        let field = &self.m.field;

        let mut best: Option<u32> = None;
        for j in 0..self.rhs_col() {
            let e = &self.m[(0, j)];
            if !field.is_negative(e) {
                continue;
            }

            if best.map_or(true, |b| field.cmp(e, &self.m[(0, b)]).is_lt()) {
                best = Some(j);
            }
        }

        best
    }

    /// The row with a positive entry in `col` that minimizes `rhs / entry`, if any.
    fn leaving_row(&self, col: u32) -> Result<Option<u32>, DivisionByZero> {
        let field = &self.m.field;
        let rhs_col = self.rhs_col();

        let mut best: Option<(u32, F::Element)> = None;
        for i in 1..self.m.nrows {
            let e = &self.m[(i, col)];
            if !field.is_positive(e) {
                continue;
            }

            let ratio = field.div(&self.m[(i, rhs_col)], e)?;
            let better = match &best {
                Some((_, b)) => field.cmp(&ratio, b).is_lt(),
                None => true,
            };
            if better {
                best = Some((i, ratio));
            }
        }

        Ok(best.map(|(i, _)| i))
    }

    /// Normalize `row` by its entry in `col` and eliminate `col` from all other rows.
    fn pivot(&mut self, row: u32, col: u32) -> Result<(), DivisionByZero> {
        let m = &mut self.m;
        let field = m.field.clone();
        let zero = field.zero();
        let ncols = m.ncols;

        let pivot = std::mem::replace(&mut m[(row, col)], field.one());
        for l in 0..ncols {
            if l != col {
                field.div_assign(&mut m[(row, l)], &pivot)?;
            }
        }

        for i in 0..m.nrows {
            if i == row || F::is_zero(&m[(i, col)]) {
                continue;
            }

            let factor = std::mem::replace(&mut m[(i, col)], zero.clone());
            for l in 0..ncols {
                if l != col {
                    let mut e = std::mem::replace(&mut m[(i, l)], zero.clone());
                    field.sub_mul_assign(&mut e, &m[(row, l)], &factor);
                    m[(i, l)] = e;
                }
            }
        }

        Ok(())
    }

    fn objective_value(&self) -> F::Element {
        self.m[(0, self.rhs_col())].clone()
    }

    /// Read off the original variables: a variable whose column is a unit column
    /// is basic and takes the right-hand side of the row holding the one.
    /// The one must lie in a constraint row, since basic columns are zero in the objective row.
    fn values(&self) -> Vec<F::Element> {
        let field = &self.m.field;
        let rhs_col = self.rhs_col();

        (0..self.nvars)
            .map(|j| {
                if !F::is_zero(&self.m[(0, j)]) {
                    return field.zero();
                }

                let mut basic_row = None;
                for i in 1..self.m.nrows {
                    let e = &self.m[(i, j)];
                    if field.is_one(e) && basic_row.is_none() {
                        basic_row = Some(i);
                    } else if !F::is_zero(e) {
                        return field.zero();
                    }
                }

                match basic_row {
                    Some(i) => self.m[(i, rhs_col)].clone(),
                    None => field.zero(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use rug::Rational;

    use super::{Objective, Simplex, SimplexConfig, SimplexError};
    use crate::{
        domains::{float::RR, rational::Q},
        tensors::matrix::Matrix,
    };

    fn rats(data: &[i64]) -> Vec<Rational> {
        data.iter().map(|x| Rational::from(*x)).collect()
    }

    #[test]
    fn three_variables() {
        let a = Matrix::from_linear(rats(&[2, 1, 1, 1, 2, 3, 2, 2, 1]), 3, 3, Q).unwrap();
        let r = Simplex::new(Q)
            .solve(&rats(&[4, 1, 4]), &a, &rats(&[2, 4, 2]))
            .unwrap();

        assert_eq!(
            r.values,
            vec![Rational::from((2, 5)), Rational::new(), Rational::from((6, 5))]
        );
        assert_eq!(r.objective, Objective::Optimal(Rational::from((32, 5))));
        assert_eq!(r.iterations, 2);
    }

    #[test]
    fn float_field() {
        let a = Matrix::from_linear(vec![1., 0., 0., 2., 3., 2.], 3, 2, RR).unwrap();
        let r = Simplex::new(RR)
            .solve(&[3., 5.], &a, &[4., 12., 18.])
            .unwrap();

        assert!((r.values[0] - 2.).abs() < 1e-12);
        assert!((r.values[1] - 6.).abs() < 1e-12);
        assert!((r.objective.value().unwrap() - 36.).abs() < 1e-12);
        assert!(r.objective.is_optimal());
    }

    #[test]
    fn unbounded() {
        let a = Matrix::from_linear(rats(&[1, -1, 2, -1]), 2, 2, Q).unwrap();
        let r = Simplex::new(Q)
            .solve(&rats(&[2, 1]), &a, &rats(&[10, 40]))
            .unwrap();

        assert!(r.objective.is_unbounded());
        assert_eq!(r.objective.value(), None);
        assert_eq!(r.values, rats(&[30, 20]));
    }

    #[test]
    fn already_optimal() {
        let a = Matrix::from_linear(rats(&[1, 1]), 1, 2, Q).unwrap();
        let r = Simplex::new(Q)
            .solve(&rats(&[-1, -2]), &a, &rats(&[5]))
            .unwrap();

        assert_eq!(r.iterations, 0);
        assert_eq!(r.values, rats(&[0, 0]));
        assert_eq!(r.objective, Objective::Optimal(Rational::new()));
    }

    #[test]
    fn unconstrained_penalized_variable() {
        // max y - x subject to 0x + y <= 3
        let a = Matrix::from_linear(rats(&[0, 1]), 1, 2, Q).unwrap();
        let r = Simplex::new(Q)
            .solve(&rats(&[-1, 1]), &a, &rats(&[3]))
            .unwrap();

        assert_eq!(r.values, rats(&[0, 3]));
        assert_eq!(r.objective, Objective::Optimal(Rational::from(3)));
        assert_eq!(r.iterations, 1);
    }

    #[test]
    fn iteration_limit() {
        let a = Matrix::from_linear(rats(&[2, 1, 1, 1, 2, 3, 2, 2, 1]), 3, 3, Q).unwrap();
        let solver = Simplex::with_config(Q, SimplexConfig { max_iterations: 1 });
        let r = solver
            .solve(&rats(&[4, 1, 4]), &a, &rats(&[2, 4, 2]))
            .unwrap();

        assert_eq!(r.iterations, 1);
        assert_eq!(r.objective, Objective::IterationLimit(Rational::from(4)));
        assert_eq!(r.values, rats(&[1, 0, 0]));
    }

    #[test]
    fn malformed_input() {
        let a = Matrix::from_linear(rats(&[1, 1]), 1, 2, Q).unwrap();
        let s = Simplex::new(Q);

        assert!(matches!(
            s.solve(&[], &a, &rats(&[1])),
            Err(SimplexError::InvalidObjective(_))
        ));
        assert!(matches!(
            s.solve(&rats(&[1, 2, 3]), &a, &rats(&[1])),
            Err(SimplexError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            s.solve(&rats(&[1, 2]), &a, &rats(&[1, 2])),
            Err(SimplexError::ShapeMismatch { .. })
        ));
        assert_eq!(
            s.solve(&rats(&[1, 2]), &Matrix::new(0, 2, Q), &[]),
            Err(SimplexError::NoConstraints)
        );
    }
}
