use std::time::Instant;

use crate::simulation::error::Result;
use crate::simulation::forces::{ForceModel, Softening};
use crate::simulation::integrator::rk4_step;
use crate::simulation::states::StateVector;

/// Helper to build a 3D state of size `n`
/// Deterministic positions, no rand needed
fn make_state(n: usize) -> StateVector {
    let mut state = StateVector::zeros(n, 3);
    for i in 0..n {
        let i_f = i as f64;
        state.position_mut(i).copy_from_slice(&[
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        ]);
    }
    state
}

fn make_forces(n: usize) -> Result<ForceModel> {
    ForceModel::gravity(&vec![1.0; n], 0.1, 1e-6, Softening::Floor)
}

/// Time one derivative evaluation for a range of N
pub fn bench_gravity() -> Result<()> {
    let ns = [3, 25, 50, 100, 200, 400, 800];

    for n in ns {
        let state = make_state(n);
        let forces = make_forces(n)?;

        // Warm up
        let _ = forces.derivative(&state);

        let t0 = Instant::now();
        let _ = forces.derivative(&state);
        let elapsed = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, derivative = {:10.8} s", elapsed);
    }
    Ok(())
}

/// Time full RK4 steps for a range of N
/// Paste output directly into a spreadsheet to graph
pub fn bench_rk4() -> Result<()> {
    println!("N,step_ms");

    for n in [3, 25, 50, 100, 200, 400, 800] {
        // Small n: average over more steps to smooth noise
        let steps = if n <= 100 { 100 } else { 5 };

        let forces = make_forces(n)?;
        let mut state = make_state(n);

        // Warm-up one step
        state = rk4_step(&state, &forces, 0.001);

        let t0 = Instant::now();
        for _ in 0..steps {
            state = rk4_step(&state, &forces, 0.001);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }
    Ok(())
}
