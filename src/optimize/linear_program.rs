use std::{collections::BTreeSet, fmt::Display};

use ahash::{HashMap, HashMapExt};
use smartstring::{LazyCompact, SmartString};

use crate::{
    domains::{OrderedField, Ring},
    tensors::matrix::Matrix,
};

use super::simplex::{Objective, Simplex, SimplexError};

/// The name of a variable in a linear program.
pub type Variable = SmartString<LazyCompact>;

/// The direction of optimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sense {
    Maximize,
    Minimize,
}

impl Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sense::Maximize => f.write_str("max"),
            Sense::Minimize => f.write_str("min"),
        }
    }
}

/// The relation between the left-hand side and the bound of a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparator {
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
}

impl Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Comparator::Less => "<",
            Comparator::LessEqual => "<=",
            Comparator::Equal => "=",
            Comparator::GreaterEqual => ">=",
            Comparator::Greater => ">",
        })
    }
}

/// A linear objective `sense Σ c_i x_i`.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveFunction<F: Ring> {
    pub sense: Sense,
    pub coefficients: HashMap<Variable, F::Element>,
}

impl<F: Ring> ObjectiveFunction<F> {
    pub fn new(sense: Sense) -> ObjectiveFunction<F> {
        ObjectiveFunction {
            sense,
            coefficients: HashMap::new(),
        }
    }

    /// Add `coeff * name` to the objective, merging it with an existing term in `name`.
    pub fn add_term(&mut self, field: &F, name: &str, coeff: F::Element) {
        add_term(&mut self.coefficients, field, name, coeff);
    }
}

/// A linear constraint `Σ a_i x_i comparator bound`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintFunction<F: Ring> {
    pub comparator: Comparator,
    pub coefficients: HashMap<Variable, F::Element>,
    pub bound: F::Element,
}

impl<F: Ring> ConstraintFunction<F> {
    pub fn new(comparator: Comparator, bound: F::Element) -> ConstraintFunction<F> {
        ConstraintFunction {
            comparator,
            coefficients: HashMap::new(),
            bound,
        }
    }

    /// Add `coeff * name` to the left-hand side, merging it with an existing term in `name`.
    pub fn add_term(&mut self, field: &F, name: &str, coeff: F::Element) {
        add_term(&mut self.coefficients, field, name, coeff);
    }
}

fn add_term<F: Ring>(
    coefficients: &mut HashMap<Variable, F::Element>,
    field: &F,
    name: &str,
    coeff: F::Element,
) {
    match coefficients.get_mut(name) {
        Some(c) => field.add_assign(c, &coeff),
        None => {
            coefficients.insert(name.into(), coeff);
        }
    }
}

/// The solution of a linear program with named variables.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedSolution<F: Ring> {
    pub values: HashMap<Variable, F::Element>,
    pub objective: Objective<F::Element>,
    pub iterations: usize,
}

impl<F: OrderedField> Simplex<F> {
    /// Solve a linear program given in terms of named variables.
    ///
    /// The objective must be a maximization and every constraint must be of the form
    /// `Σ a_i x_i <= bound` with at least one variable.
    /// Variables are assigned to columns in alphabetical order.
    pub fn solve_named(
        &self,
        objective: &ObjectiveFunction<F>,
        constraints: &[ConstraintFunction<F>],
    ) -> Result<NamedSolution<F>, SimplexError> {
        if objective.sense != Sense::Maximize {
            return Err(SimplexError::InvalidObjective(format!(
                "expected a maximization, found {}",
                objective.sense
            )));
        }
        if objective.coefficients.is_empty() {
            return Err(SimplexError::InvalidObjective(
                "the objective has no variables".to_owned(),
            ));
        }
        if constraints.is_empty() {
            return Err(SimplexError::NoConstraints);
        }

        for (index, c) in constraints.iter().enumerate() {
            if c.comparator != Comparator::LessEqual {
                return Err(SimplexError::InvalidConstraint {
                    index,
                    reason: format!("expected <=, found {}", c.comparator),
                });
            }
            if c.coefficients.is_empty() {
                return Err(SimplexError::InvalidConstraint {
                    index,
                    reason: "the constraint has no variables".to_owned(),
                });
            }
        }

        let variables: Vec<&Variable> = objective
            .coefficients
            .keys()
            .chain(constraints.iter().flat_map(|c| c.coefficients.keys()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let field = self.field();
        let coeff = |map: &HashMap<Variable, F::Element>, v: &Variable| {
            map.get(v).cloned().unwrap_or_else(|| field.zero())
        };

        let c: Vec<_> = variables
            .iter()
            .map(|v| coeff(&objective.coefficients, *v))
            .collect();
        let a = Matrix::from_fn(
            constraints.len() as u32,
            variables.len() as u32,
            field.clone(),
            |i, j, _| coeff(&constraints[i as usize].coefficients, variables[j as usize]),
        );
        let b: Vec<_> = constraints.iter().map(|c| c.bound.clone()).collect();

        let r = self.solve(&c, &a, &b)?;

        Ok(NamedSolution {
            values: variables.into_iter().cloned().zip(r.values).collect(),
            objective: r.objective,
            iterations: r.iterations,
        })
    }
}

#[cfg(test)]
mod test {
    use rug::Rational;

    use super::{Comparator, ConstraintFunction, ObjectiveFunction, Sense};
    use crate::{
        domains::rational::Q,
        optimize::simplex::{Objective, Simplex, SimplexError},
    };

    fn constraint(
        terms: &[(&str, i64)],
        comparator: Comparator,
        bound: i64,
    ) -> ConstraintFunction<Q> {
        let mut c = ConstraintFunction::new(comparator, Rational::from(bound));
        for (n, v) in terms {
            c.add_term(&Q, n, Rational::from(*v));
        }
        c
    }

    #[test]
    fn named_variables() {
        let mut obj = ObjectiveFunction::new(Sense::Maximize);
        obj.add_term(&Q, "z", Rational::from(4));
        obj.add_term(&Q, "x", Rational::from(4));
        obj.add_term(&Q, "y", Rational::from(1));

        let cons = [
            constraint(&[("x", 2), ("y", 1), ("z", 1)], Comparator::LessEqual, 2),
            constraint(&[("x", 1), ("y", 2), ("z", 3)], Comparator::LessEqual, 4),
            constraint(&[("x", 2), ("y", 2), ("z", 1)], Comparator::LessEqual, 2),
        ];

        let r = Simplex::new(Q).solve_named(&obj, &cons).unwrap();
        assert_eq!(r.values["x"], Rational::from((2, 5)));
        assert_eq!(r.values["y"], 0);
        assert_eq!(r.values["z"], Rational::from((6, 5)));
        assert_eq!(r.objective, Objective::Optimal(Rational::from((32, 5))));
    }

    #[test]
    fn merged_terms_and_constraint_only_variables() {
        let mut obj = ObjectiveFunction::new(Sense::Maximize);
        obj.add_term(&Q, "a", Rational::from(1));
        obj.add_term(&Q, "a", Rational::from(1));

        let cons = [constraint(&[("a", 1), ("s", 1)], Comparator::LessEqual, 3)];

        let r = Simplex::new(Q).solve_named(&obj, &cons).unwrap();
        assert_eq!(r.values.len(), 2);
        assert_eq!(r.values["a"], 3);
        assert_eq!(r.values["s"], 0);
        assert_eq!(r.objective.value(), Some(&Rational::from(6)));
    }

    #[test]
    fn rejected_programs() {
        let s = Simplex::new(Q);
        let good = [constraint(&[("x", 1)], Comparator::LessEqual, 1)];

        let mut min = ObjectiveFunction::new(Sense::Minimize);
        min.add_term(&Q, "x", Rational::from(1));
        assert!(matches!(
            s.solve_named(&min, &good),
            Err(SimplexError::InvalidObjective(_))
        ));

        let empty = ObjectiveFunction::<Q>::new(Sense::Maximize);
        assert!(matches!(
            s.solve_named(&empty, &good),
            Err(SimplexError::InvalidObjective(_))
        ));

        let mut max = ObjectiveFunction::new(Sense::Maximize);
        max.add_term(&Q, "x", Rational::from(1));
        assert_eq!(s.solve_named(&max, &[]), Err(SimplexError::NoConstraints));

        let bad = [
            good[0].clone(),
            constraint(&[("x", 1)], Comparator::GreaterEqual, 0),
        ];
        assert!(matches!(
            s.solve_named(&max, &bad),
            Err(SimplexError::InvalidConstraint { index: 1, .. })
        ));

        let no_vars = [constraint(&[], Comparator::LessEqual, 1)];
        assert!(matches!(
            s.solve_named(&max, &no_vars),
            Err(SimplexError::InvalidConstraint { index: 0, .. })
        ));
    }
}
