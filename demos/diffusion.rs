//! Advected front with mixed edges
//!
//! ∂u/∂t = -v·∂u/∂x + D·∂²u/∂x²
//!
//! - Left (x=0): u = 1 (Dirichlet)
//! - Right (x=L): ∂u/∂x = 0 (Neumann)
//! - Initial state: u = 0 inside the domain
//!
//! Runs the same problem with several solvers and compares the front
//! position. Pass a JSON file to replace the built-in problem:
//!
//! ```bash
//! cargo run --example diffusion -- problem.json
//! ```

use advdiff_rs::prelude::*;
use nalgebra::DVector;
use std::error::Error;

fn default_input(points: usize, length: f64) -> Result<FiniteDifferenceInput1D, FdError> {
    let grid = DVector::from_fn(points, |i, _| i as f64 / (points - 1) as f64 * length);

    Ok(FiniteDifferenceInput1D::new(
        1e-3,
        grid,
        DVector::from_element(points, 0.5),
        DVector::from_element(points, 0.002),
        SolverType::ExplicitEuler,
        SpaceDiscretizerType::Upwind,
        BoundaryCondition1D::new(
            BoundaryCondition::dirichlet(1.0),
            BoundaryCondition::neumann(0.0),
        ),
    )?)
}

/// Position where the profile crosses 0.5, linearly interpolated
fn front_position(grid: &DVector<f64>, u: &DVector<f64>) -> Option<f64> {
    (0..u.len() - 1).find_map(|i| {
        if u[i] >= 0.5 && u[i + 1] < 0.5 {
            let t = (u[i] - 0.5) / (u[i] - u[i + 1]);
            Some(grid[i] + t * (grid[i + 1] - grid[i]))
        } else {
            None
        }
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Advected front: Dirichlet left, Neumann right ===\n");

    let base: FiniteDifferenceInput1D = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading problem from {}", path);
            serde_json::from_str(&std::fs::read_to_string(path)?)?
        }
        None => default_input(201, 1.0)?,
    };
    let steps = 1000;

    println!("Problem:");
    println!("  Points: {}", base.len());
    println!("  dt: {}", base.dt());
    println!("  Discretizer: {}", base.space_discretizer_type());
    println!("  Steps: {} (t = {})\n", steps, steps as f64 * base.dt());

    let initial = DVector::zeros(base.len());
    let mut finals = Vec::new();

    for solver_type in [
        SolverType::ExplicitEuler,
        SolverType::RungeKutta4,
        SolverType::CrankNicolson,
        SolverType::AdamsBashforth2,
    ] {
        let input = base.with_solver_type(solver_type)?;
        let mut stepper = Stepper1D::from_input(input)?;

        let start = std::time::Instant::now();
        let result = stepper.integrate(&initial, steps)?;
        let elapsed = start.elapsed();

        let u = &result.final_state;
        println!("{} ({:.3}s)", solver_type, elapsed.as_secs_f64());
        println!("  u(x=0) = {:.10}", u[0]);
        println!("  u(x=L) = {:.10}", u[u.len() - 1]);
        match front_position(base.grid(), u) {
            Some(x) => println!("  front (u=0.5) at x = {:.4}", x),
            None => println!("  no front inside the domain"),
        }

        finals.push((solver_type, result.final_state));
    }

    // Spread of the final profiles against the RK4 run
    println!("\nMax difference against Runge-Kutta 4:");
    let reference = finals
        .iter()
        .find(|(solver_type, _)| *solver_type == SolverType::RungeKutta4)
        .map(|(_, state)| state.clone())
        .ok_or("missing reference run")?;
    for (solver_type, state) in &finals {
        println!("  {:<20} {:.3e}", solver_type.name(), (state - &reference).amax());
    }

    println!(
        "\nExpected: front near x = v·t = {:.3}",
        0.5 * steps as f64 * base.dt()
    );

    Ok(())
}
