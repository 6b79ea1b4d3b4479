//! Integration tests: configuration + space + solver
//!
//! These tests drive complete steppers through the public API and check the
//! behaviour a caller sees: concrete step values, edge handling, startup of
//! the multistep methods, failure atomicity and input validation.

use std::f64::consts::PI;

use advdiff_rs::config::{
    BoundaryCondition, BoundaryCondition1D, BoundaryCondition2D, FiniteDifferenceInput1D,
    FiniteDifferenceInput2D, SolverType, SpaceDiscretizerType,
};
use advdiff_rs::error::{ConfigurationError, FdError};
use advdiff_rs::solver::{
    BiCgStab, DenseLu, StartupPolicy, Stepper1D, Stepper2D, TimeIntegrator,
};
use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector};

mod common;
use common::{
    AdvectedBump, HeatPulse, PeriodicDiffusionMode, all_solvers, assert_states_close,
    direct_stepper, max_error, run,
};

// =================================================================================================
// Concrete step values
// =================================================================================================

#[test]
fn test_heat_pulse_one_euler_step() {
    let mut stepper = Stepper1D::from_input(HeatPulse::input(SolverType::ExplicitEuler)).unwrap();

    let next = stepper.advance(&HeatPulse::initial()).unwrap();

    assert_states_close(
        &next,
        &HeatPulse::after_one_euler_step(),
        1e-12,
        "heat pulse after one Euler step",
    );
    assert_eq!(stepper.steps_taken(), 1);
}

#[test]
fn test_periodic_mode_one_euler_step() {
    let mode = PeriodicDiffusionMode::new(16, 0.05);
    let dt = 0.01;
    let mut stepper = Stepper1D::from_input(mode.input(SolverType::ExplicitEuler, dt)).unwrap();

    let next = stepper.advance(&mode.initial()).unwrap();

    // sin(2πx) is an eigenvector, edges included through the wrap-around
    let expected = mode.initial() * (1.0 + dt * mode.eigenvalue());
    assert_states_close(&next, &expected, 1e-12, "periodic mode");

    let n = mode.points();
    assert_eq!(next[0], next[n - 2]);
    assert_eq!(next[n - 1], next[1]);
}

#[test]
fn test_periodic_mode_matches_exact_decay() {
    // Fine steps of an accurate method track exp(λt)
    let mode = PeriodicDiffusionMode::new(16, 0.05);
    let mut stepper = direct_stepper(mode.input(SolverType::RungeKutta4, 0.01));

    let state = run(&mut stepper, &mode.initial(), 100);

    assert!(max_error(&state, &mode.analytical_solution(1.0)) < 1e-8);
}

// =================================================================================================
// Edge handling through full steps
// =================================================================================================

#[test]
fn test_dirichlet_edges_pinned_for_every_solver() {
    let n = 11;
    let grid = DVector::from_fn(n, |i, _| i as f64 / (n - 1) as f64);
    let boundaries = BoundaryCondition1D::new(
        BoundaryCondition::dirichlet(1.5),
        BoundaryCondition::dirichlet(-0.5),
    );

    for solver_type in all_solvers() {
        let input = FiniteDifferenceInput1D::new(
            1e-3,
            grid.clone(),
            DVector::from_element(n, 0.3),
            DVector::from_element(n, 0.2),
            solver_type,
            SpaceDiscretizerType::Centered,
            boundaries,
        )
        .unwrap();
        let mut stepper = direct_stepper(input);

        let state = run(&mut stepper, &grid.map(|x| x * (1.0 - x)), 10);

        assert_eq!(state[0], 1.5, "{}: left edge drifted", solver_type);
        assert_eq!(state[n - 1], -0.5, "{}: right edge drifted", solver_type);
    }
}

#[test]
fn test_neumann_edge_follows_neighbour() {
    let bump = AdvectedBump::new(21, 0.5, 0.01);
    let input = bump.input(SolverType::RungeKutta3, SpaceDiscretizerType::Upwind, 1e-3);
    let mut stepper = Stepper1D::from_input(input).unwrap();

    let state = run(&mut stepper, &bump.initial(), 20);

    // zero-gradient right edge, zero-value left edge
    assert_eq!(state[20], state[19]);
    assert_eq!(state[0], 0.0);
}

// =================================================================================================
// Multistep startup
// =================================================================================================

#[test]
fn test_adams_bashforth_first_step_is_euler() {
    let mut euler = Stepper1D::from_input(HeatPulse::input(SolverType::ExplicitEuler)).unwrap();
    let mut adams = Stepper1D::from_input(HeatPulse::input(SolverType::AdamsBashforth2)).unwrap();
    let initial = HeatPulse::initial();

    let euler_first = euler.advance(&initial).unwrap();
    let adams_first = adams.advance(&initial).unwrap();
    assert_eq!(euler_first, adams_first);
    assert_eq!(adams.history_len(), 1);

    // second step uses the retained rate
    let euler_second = euler.advance(&euler_first).unwrap();
    let adams_second = adams.advance(&adams_first).unwrap();
    assert!(max_error(&euler_second, &adams_second) > 1e-6);
}

#[test]
fn test_adams_moulton_first_step_is_crank_nicolson() {
    let initial = HeatPulse::initial();
    let mut crank = direct_stepper(HeatPulse::input(SolverType::CrankNicolson));
    let mut adams = direct_stepper(HeatPulse::input(SolverType::AdamsMoulton2));

    assert_eq!(
        crank.advance(&initial).unwrap(),
        adams.advance(&initial).unwrap()
    );
}

#[test]
fn test_strict_policy_requires_history() {
    let mut stepper = Stepper1D::from_input(HeatPulse::input(SolverType::AdamsBashforth2))
        .unwrap()
        .with_startup_policy(StartupPolicy::Strict);
    let initial = HeatPulse::initial();

    let result = stepper.advance(&initial);
    assert_eq!(
        result,
        Err(FdError::InsufficientHistory {
            required: 2,
            available: 1
        })
    );
    assert_eq!(stepper.steps_taken(), 0);

    // a seeded prior state unlocks the method
    stepper.seed_history(&[initial.clone()]).unwrap();
    let next = stepper.advance(&initial).unwrap();
    assert!(next.iter().all(|value| value.is_finite()));
    assert_eq!(stepper.steps_taken(), 1);
}

#[test]
fn test_reset_restarts_bootstrap() {
    let initial = HeatPulse::initial();
    let mut stepper = Stepper1D::from_input(HeatPulse::input(SolverType::AdamsBashforth2)).unwrap();

    let first = stepper.advance(&initial).unwrap();
    stepper.advance(&first).unwrap();
    stepper.reset();
    assert_eq!(stepper.history_len(), 0);
    assert_eq!(stepper.steps_taken(), 0);

    // bootstraps with Euler again
    assert_eq!(stepper.advance(&initial).unwrap(), first);
}

// =================================================================================================
// Linear solvers
// =================================================================================================

#[test]
fn test_iterative_and_direct_solves_agree() {
    let bump = AdvectedBump::new(31, 1.0, 0.02);

    for solver_type in [
        SolverType::ImplicitEuler,
        SolverType::CrankNicolson,
        SolverType::RungeKuttaGaussLegendre4,
        SolverType::AdamsMoulton2,
    ] {
        let input = bump.input(solver_type, SpaceDiscretizerType::Upwind, 0.01);
        let mut iterative = Stepper1D::from_input(input.clone()).unwrap();
        let mut direct = direct_stepper(input);

        let a = run(&mut iterative, &bump.initial(), 10);
        let b = run(&mut direct, &bump.initial(), 10);

        assert_states_close(&a, &b, 1e-8, solver_type.name());
    }
}

#[test]
fn test_failed_solve_leaves_state_untouched() {
    let bump = AdvectedBump::new(31, 1.0, 0.02);
    let input = bump.input(SolverType::ImplicitEuler, SpaceDiscretizerType::Upwind, 0.01);
    let mut stepper = Stepper1D::from_input(input)
        .unwrap()
        .with_linear_solver(BiCgStab::new(1e-15, 1));
    let mut state = bump.initial();

    let result = stepper.advance_in_place(&mut state);

    assert!(matches!(result, Err(FdError::SolveDidNotConverge { .. })));
    assert_eq!(state, bump.initial());
    assert_eq!(stepper.steps_taken(), 0);
    assert_eq!(stepper.history_len(), 0);
}

#[test]
fn test_explicit_instability_is_reported() {
    // dt far above the explicit limit
    let mode = PeriodicDiffusionMode::new(16, 1.0);
    let mut stepper = Stepper1D::from_input(mode.input(SolverType::ExplicitEuler, 1.0)).unwrap();
    let mut state = mode.initial();

    let error = loop {
        match stepper.advance(&state) {
            Ok(next) => state = next,
            Err(error) => break error,
        }
    };

    match error {
        FdError::NumericalInstability { step, .. } => {
            assert_eq!(step, stepper.steps_taken() + 1);
        }
        other => panic!("expected NumericalInstability, got {:?}", other),
    }
    assert!(state.iter().all(|value| value.is_finite()));
}

// =================================================================================================
// Space discretizers
// =================================================================================================

#[test]
fn test_upwind_euler_creates_no_new_extrema() {
    let bump = AdvectedBump::new(41, 1.0, 0.001);
    let initial = bump.initial();
    let input = bump.input(SolverType::ExplicitEuler, SpaceDiscretizerType::Upwind, 0.005);
    let mut stepper = Stepper1D::from_input(input).unwrap();

    let state = run(&mut stepper, &initial, 50);

    assert!(state.min() >= -1e-12, "undershoot {}", state.min());
    assert!(state.max() <= initial.max() + 1e-12, "overshoot {}", state.max());
}

#[test]
fn test_lax_wendroff_without_velocity_is_centered() {
    let bump = AdvectedBump::new(21, 0.0, 0.05);
    let initial = bump.initial();

    let mut centered = Stepper1D::from_input(bump.input(
        SolverType::RungeKutta4,
        SpaceDiscretizerType::Centered,
        1e-3,
    ))
    .unwrap();
    let mut lax_wendroff = Stepper1D::from_input(bump.input(
        SolverType::RungeKutta4,
        SpaceDiscretizerType::LaxWendroff,
        1e-3,
    ))
    .unwrap();

    assert_eq!(run(&mut centered, &initial, 5), run(&mut lax_wendroff, &initial, 5));
}

#[test]
fn test_lax_wendroff_adds_diffusion() {
    let bump = AdvectedBump::new(41, 1.0, 0.0);
    let initial = bump.initial();
    let dt = 2e-3;

    let mut centered = Stepper1D::from_input(bump.input(
        SolverType::RungeKutta4,
        SpaceDiscretizerType::Centered,
        dt,
    ))
    .unwrap();
    let mut lax_wendroff = Stepper1D::from_input(bump.input(
        SolverType::RungeKutta4,
        SpaceDiscretizerType::LaxWendroff,
        dt,
    ))
    .unwrap();

    let a = run(&mut centered, &initial, 20);
    let b = run(&mut lax_wendroff, &initial, 20);

    assert!(b.iter().all(|value| value.is_finite()));
    assert!(max_error(&a, &b) > 1e-8);
}

// =================================================================================================
// 2D
// =================================================================================================

fn unit_axis(n: usize) -> DVector<f64> {
    DVector::from_fn(n, |i, _| i as f64 / (n - 1) as f64)
}

fn diffusion_2d(
    n: usize,
    diffusion: f64,
    dt: f64,
    solver_type: SolverType,
    boundaries: BoundaryCondition2D,
) -> FiniteDifferenceInput2D {
    FiniteDifferenceInput2D::new(
        dt,
        unit_axis(n),
        unit_axis(n),
        DMatrix::zeros(n, n),
        DMatrix::zeros(n, n),
        DMatrix::from_element(n, n, diffusion),
        solver_type,
        SpaceDiscretizerType::Centered,
        boundaries,
    )
    .unwrap()
}

#[test]
fn test_2d_corners_take_y_conditions() {
    let boundaries = BoundaryCondition2D::from_axes(
        BoundaryCondition1D::uniform(BoundaryCondition::dirichlet(1.0)),
        BoundaryCondition1D::uniform(BoundaryCondition::dirichlet(2.0)),
    );
    let input = diffusion_2d(5, 0.1, 1e-3, SolverType::ExplicitEuler, boundaries);
    let mut stepper = Stepper2D::from_input(input).unwrap();

    let next = stepper.advance_field(&DMatrix::zeros(5, 5)).unwrap();

    for (i, j) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
        assert_eq!(next[(i, j)], 2.0, "corner ({}, {})", i, j);
    }
    for k in 1..4 {
        assert_eq!(next[(0, k)], 1.0);
        assert_eq!(next[(4, k)], 1.0);
        assert_eq!(next[(k, 0)], 2.0);
        assert_eq!(next[(k, 4)], 2.0);
    }
}

#[test]
fn test_2d_product_mode_one_euler_step() {
    // sin(πx)·sin(πy) is an eigenvector with λx + λy
    let n = 9;
    let h = 1.0 / (n - 1) as f64;
    let diffusion = 0.1;
    let dt = 1e-3;
    let boundaries = BoundaryCondition2D::uniform(BoundaryCondition::dirichlet(0.0));
    let mut stepper =
        Stepper2D::from_input(diffusion_2d(n, diffusion, dt, SolverType::ExplicitEuler, boundaries))
            .unwrap();

    let axis = unit_axis(n);
    let field = DMatrix::from_fn(n, n, |i, j| (PI * axis[i]).sin() * (PI * axis[j]).sin());
    let next = stepper.advance_field(&field).unwrap();

    let lambda = 2.0 * diffusion * (2.0 * (PI * h).cos() - 2.0) / (h * h);
    for j in 1..n - 1 {
        for i in 1..n - 1 {
            assert_relative_eq!(
                next[(i, j)],
                field[(i, j)] * (1.0 + dt * lambda),
                epsilon = 1e-12
            );
        }
    }
}

#[test]
fn test_2d_diffusion_stays_symmetric() {
    let n = 7;
    let boundaries = BoundaryCondition2D::uniform(BoundaryCondition::dirichlet(0.0));
    let input = diffusion_2d(n, 0.2, 0.01, SolverType::CrankNicolson, boundaries);
    let mut stepper = Stepper2D::from_input(input).unwrap().with_linear_solver(DenseLu);

    let axis = unit_axis(n);
    let tent = |t: f64| t * (1.0 - t);
    let mut field = DMatrix::from_fn(n, n, |i, j| {
        let (a, b) = (tent(axis[i]), tent(axis[j]));
        a * b + (a + b).powi(2)
    });
    for _ in 0..5 {
        field = stepper.advance_field(&field).unwrap();
    }

    assert!((&field - field.transpose()).amax() < 1e-12);
    assert!(field.max() > 0.0);
}

#[test]
fn test_2d_separable_advection_runs() {
    let (nx, ny) = (12, 8);
    let input = FiniteDifferenceInput2D::separable(
        1e-3,
        unit_axis(nx),
        unit_axis(ny),
        DVector::from_element(nx, 0.5),
        DVector::from_fn(ny, |j, _| if j < ny / 2 { -0.2 } else { 0.2 }),
        DMatrix::from_element(nx, ny, 0.01),
        SolverType::RungeKutta4,
        SpaceDiscretizerType::Upwind,
        BoundaryCondition2D::from_axes(
            BoundaryCondition1D::periodic(),
            BoundaryCondition1D::uniform(BoundaryCondition::neumann(0.0)),
        ),
    )
    .unwrap();
    let mut stepper = Stepper2D::from_input(input).unwrap();

    let mut field = DMatrix::from_fn(nx, ny, |i, j| ((i + j) % 3) as f64);
    for _ in 0..10 {
        field = stepper.advance_field(&field).unwrap();
    }

    assert!(field.iter().all(|value| value.is_finite()));
    for j in 0..ny {
        assert_eq!(field[(0, j)], field[(nx - 2, j)]);
        assert_eq!(field[(nx - 1, j)], field[(1, j)]);
    }
}

#[test]
fn test_2d_wrong_field_shape_rejected() {
    let boundaries = BoundaryCondition2D::uniform(BoundaryCondition::dirichlet(0.0));
    let input = diffusion_2d(5, 0.1, 1e-3, SolverType::ExplicitEuler, boundaries);
    let mut stepper = Stepper2D::from_input(input).unwrap();

    let result = stepper.advance_field(&DMatrix::zeros(4, 5));
    assert!(matches!(result, Err(FdError::InvalidConfiguration(_))));
}

// =================================================================================================
// Driver
// =================================================================================================

#[test]
fn test_integrate_records_trajectory() {
    let mut stepper = Stepper1D::from_input(HeatPulse::input(SolverType::RungeKutta4)).unwrap();

    let result = stepper.integrate(&HeatPulse::initial(), 10).unwrap();

    assert_eq!(result.len(), 11);
    assert_eq!(result.time_points.len(), 11);
    assert_eq!(result.time_points[0], 0.0);
    assert_relative_eq!(result.final_time(), 1.0, epsilon = 1e-12);
    assert_eq!(result.trajectory[0], HeatPulse::initial());
    assert_eq!(&result.final_state, result.trajectory.last().unwrap());
    assert_eq!(result.metadata["solver"], "Runge-Kutta 4");

    // pure diffusion with zero edges only decays
    let peaks: Vec<f64> = result.trajectory.iter().map(|state| state.amax()).collect();
    assert!(peaks.windows(2).all(|pair| pair[1] <= pair[0]));
}

// =================================================================================================
// Configuration rejections
// =================================================================================================

#[test]
fn test_raw_sentinels_rejected() {
    for raw in [0, SolverType::END, -1, 99] {
        assert!(
            matches!(SolverType::from_raw(raw), Err(FdError::UnsupportedSolver(_))),
            "raw {} accepted",
            raw
        );
    }
    for solver_type in all_solvers() {
        assert_eq!(SolverType::from_raw(solver_type.to_raw()), Ok(solver_type));
    }

    assert!(matches!(
        SpaceDiscretizerType::from_raw(0),
        Err(FdError::InvalidDiscretization(_))
    ));
}

fn input_1d(
    dt: f64,
    grid: Vec<f64>,
    velocity_len: usize,
    boundaries: BoundaryCondition1D,
) -> Result<FiniteDifferenceInput1D, ConfigurationError> {
    let n = grid.len();
    FiniteDifferenceInput1D::new(
        dt,
        DVector::from_vec(grid),
        DVector::zeros(velocity_len),
        DVector::from_element(n, 1.0),
        SolverType::ExplicitEuler,
        SpaceDiscretizerType::Centered,
        boundaries,
    )
}

#[test]
fn test_invalid_configurations_rejected() {
    let dirichlet = BoundaryCondition1D::uniform(BoundaryCondition::dirichlet(0.0));

    for len in 0..3 {
        let grid: Vec<f64> = (0..len).map(|i| i as f64).collect();
        assert_eq!(
            input_1d(0.1, grid, len, dirichlet),
            Err(ConfigurationError::GridTooShort { axis: "x", len })
        );
    }

    assert!(matches!(
        input_1d(0.1, vec![0.0, 1.0, 1.0, 2.0], 4, dirichlet),
        Err(ConfigurationError::GridNotIncreasing { axis: "x", .. })
    ));

    for dt in [0.0, -0.1] {
        assert!(matches!(
            input_1d(dt, vec![0.0, 1.0, 2.0], 3, dirichlet),
            Err(ConfigurationError::NonPositiveTimeStep(_))
        ));
    }

    assert_eq!(
        input_1d(0.1, vec![0.0, 1.0, 2.0], 2, dirichlet),
        Err(ConfigurationError::LengthMismatch {
            field: "velocity",
            expected: 3,
            actual: 2
        })
    );

    let half_periodic =
        BoundaryCondition1D::new(BoundaryCondition::periodic(), BoundaryCondition::dirichlet(0.0));
    assert_eq!(
        input_1d(0.1, vec![0.0, 1.0, 2.0], 3, half_periodic),
        Err(ConfigurationError::AsymmetricPeriodic { axis: "x" })
    );
}

#[test]
fn test_wrong_state_length_rejected() {
    let mut stepper = Stepper1D::from_input(HeatPulse::input(SolverType::ExplicitEuler)).unwrap();

    let result = stepper.advance(&DVector::zeros(4));

    assert_eq!(
        result,
        Err(FdError::InvalidConfiguration(
            ConfigurationError::StateShapeMismatch {
                expected: 5,
                actual: 4
            }
        ))
    );
    assert_eq!(stepper.steps_taken(), 0);
}

#[test]
fn test_json_input_drives_a_stepper() {
    let json = r#"{
        "dt": 0.1,
        "grid": [0.0, 1.0, 2.0, 3.0, 4.0],
        "velocity": [0.0, 0.0, 0.0, 0.0, 0.0],
        "diffusion": [1.0, 1.0, 1.0, 1.0, 1.0],
        "solver_type": "ExplicitEuler",
        "space_discretizer_type": "Centered",
        "boundary_conditions": {
            "left": { "type": "Dirichlet", "value": 0.0 },
            "right": { "type": "Dirichlet", "value": 0.0 }
        }
    }"#;
    let input: FiniteDifferenceInput1D = serde_json::from_str(json).unwrap();
    assert_eq!(input, HeatPulse::input(SolverType::ExplicitEuler));

    let mut stepper = Stepper1D::from_input(input).unwrap();
    let next = stepper.advance(&HeatPulse::initial()).unwrap();
    assert_states_close(&next, &HeatPulse::after_one_euler_step(), 1e-12, "json input");
}
