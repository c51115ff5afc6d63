use ahash::HashMap;
use fieldsolve::{
    domains::{float::RR, rational::Q, OrderedField},
    optimize::{
        linear_program::{ConstraintFunction, NamedSolution, ObjectiveFunction, Variable},
        simplex::{Objective, Simplex},
    },
};
use rug::Rational;

fn parse_and_solve<F: OrderedField>(
    field: F,
    objective: &str,
    constraints: &[&str],
) -> (
    ObjectiveFunction<F>,
    Vec<ConstraintFunction<F>>,
    NamedSolution<F>,
) {
    let objective = ObjectiveFunction::parse(objective, &field).unwrap();
    let constraints: Vec<_> = constraints
        .iter()
        .map(|c| ConstraintFunction::parse(c, &field).unwrap())
        .collect();
    let r = Simplex::new(field)
        .solve_named(&objective, &constraints)
        .unwrap();
    (objective, constraints, r)
}

const THREE_VARIABLES: [&str; 3] = ["2x + y + z <= 2", "x + 2y + 3z <= 4", "2x + 2y + z <= 2"];

#[test]
fn three_variables_rational() {
    let (_, _, r) = parse_and_solve(Q, "max 4x + y + 4z", &THREE_VARIABLES);

    assert_eq!(r.values["x"], Rational::from((2, 5)));
    assert_eq!(r.values["y"], 0);
    assert_eq!(r.values["z"], Rational::from((6, 5)));
    assert_eq!(r.objective, Objective::Optimal(Rational::from((32, 5))));
}

#[test]
fn three_variables_float() {
    let (_, _, r) = parse_and_solve(RR, "max 4x + y + 4z", &THREE_VARIABLES);

    assert!((r.values["x"] - 0.4).abs() < 1e-12);
    assert!(r.values["y"].abs() < 1e-12);
    assert!((r.values["z"] - 1.2).abs() < 1e-12);
    assert!(r.objective.is_optimal());
    assert!((r.objective.value().unwrap() - 6.4).abs() < 1e-12);
}

#[test]
fn unbounded() {
    let (_, _, r) = parse_and_solve(Q, "max 2x + y", &["x - y <= 10", "2x - y <= 40"]);

    assert_eq!(r.objective, Objective::Unbounded);
    assert_eq!(r.values["x"], 30);
    assert_eq!(r.values["y"], 20);

    let (_, _, r) = parse_and_solve(RR, "max 2x + y", &["x - y <= 10", "2x - y <= 40"]);
    assert!(r.objective.is_unbounded());
}

#[test]
fn objective_only_variable() {
    let (objective, _, r) = parse_and_solve(Q, "max y - x", &["y <= 3"]);

    assert_eq!(r.values["x"], 0);
    assert_eq!(r.values["y"], 3);
    assert_eq!(r.objective, Objective::Optimal(Rational::from(3)));

    let point = [("x", r.values["x"].clone()), ("y", r.values["y"].clone())];
    assert_eq!(&eval(&objective.coefficients, &point), r.objective.value().unwrap());
}

fn eval(coefficients: &HashMap<Variable, Rational>, point: &[(&str, Rational)]) -> Rational {
    let mut sum = Rational::new();
    for (name, value) in point {
        if let Some(c) = coefficients.get(*name) {
            sum += Rational::from(c * value);
        }
    }
    sum
}

#[test]
fn solution_is_feasible_and_optimal() {
    let (objective, constraints, r) = parse_and_solve(Q, "max 4x + y + 4z", &THREE_VARIABLES);
    let optimum = r.objective.value().unwrap().clone();

    let solution: Vec<_> = ["x", "y", "z"]
        .into_iter()
        .map(|n| (n, r.values[n].clone()))
        .collect();
    for c in &constraints {
        assert!(eval(&c.coefficients, &solution) <= c.bound);
    }
    assert_eq!(eval(&objective.coefficients, &solution), optimum);

    // no feasible point on a grid with step 1/5 does better
    let grid: Vec<_> = (0..=10).map(|i| Rational::from((i, 5))).collect();
    for x in &grid {
        for y in &grid {
            for z in &grid {
                let point = [("x", x.clone()), ("y", y.clone()), ("z", z.clone())];
                if constraints
                    .iter()
                    .all(|c| eval(&c.coefficients, &point) <= c.bound)
                {
                    assert!(eval(&objective.coefficients, &point) <= optimum);
                }
            }
        }
    }
}
