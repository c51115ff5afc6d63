use fieldsolve::{
    domains::{float::RR, rational::Q},
    tensors::matrix::Matrix,
};
use rug::Rational;

fn main() {
    let system = [[1, 2, 3], [4, 5, 16], [7, 8, 9]];
    let rhs = [1, 2, 3];

    println!("Solve linear system in x\u{20D7}:");
    for (r, v) in system.iter().zip(&rhs) {
        println!("\t ({},{},{}).x\u{20D7} = {}", r[0], r[1], r[2], v);
    }

    let exact = Matrix::from_nested_vec(
        system
            .iter()
            .map(|r| r.iter().map(|x| Rational::from(*x)).collect())
            .collect(),
        Q,
    )
    .unwrap();
    let b: Vec<_> = rhs.iter().map(|x| Rational::from(*x)).collect();

    match exact.solve(&b) {
        Ok(x) => {
            println!("Solution over Q:");
            for (i, e) in x.iter().enumerate() {
                println!("\tx_{} = {}", i, e);
            }
        }
        Err(e) => println!("Could not solve system: {}", e),
    }

    let approx = exact.map(|x| x.to_f64(), RR);
    println!("det = {} (Q), {} (RR)", exact.det().unwrap(), approx.det().unwrap());
    println!("inverse over RR = {}", approx.inv().unwrap());
}
