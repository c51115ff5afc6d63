use fieldsolve::{
    domains::{float::RR, rational::Q, OrderedField},
    optimize::{
        linear_program::{ConstraintFunction, ObjectiveFunction},
        simplex::{Objective, Simplex},
    },
};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

fn solve<F: OrderedField>(field: F, objective: &str, constraints: &[&str]) {
    let objective = ObjectiveFunction::parse(objective, &field).unwrap();
    let constraints: Vec<_> = constraints
        .iter()
        .map(|c| ConstraintFunction::parse(c, &field).unwrap())
        .collect();

    match Simplex::new(field).solve_named(&objective, &constraints) {
        Ok(r) => {
            let mut values: Vec<_> = r.values.iter().collect();
            values.sort_by(|a, b| a.0.cmp(b.0));
            for (name, v) in values {
                println!("\t{} = {}", name, v);
            }

            match r.objective {
                Objective::Optimal(v) => println!("\toptimum = {}", v),
                Objective::IterationLimit(v) => {
                    println!("\tstopped after {} pivots at {}", r.iterations, v)
                }
                Objective::Unbounded => println!("\tunbounded"),
            }
        }
        Err(e) => println!("\terror: {}", e),
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("FIELDSOLVE_LOG"))
        .init();

    let objective = "max 4x + y + 4z";
    let constraints = ["2x + y + z <= 2", "x + 2y + 3z <= 4", "2x + 2y + z <= 2"];

    println!("> {} over Q:", objective);
    solve(Q, objective, &constraints);
    println!("> {} over RR:", objective);
    solve(RR, objective, &constraints);

    println!("> max 2x + y over Q:");
    solve(Q, "max 2x + y", &["x - y <= 10", "2x - y <= 40"]);
}
