use gravsim::{ScenarioConfig, Scenario, Outcome, Framing};
use gravsim::{bench_gravity, bench_rk4, save_trajectory};
use gravsim::simulation::diagnostics::drift;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Integrate a small gravitational N-body system with fixed-step RK4")]
struct Args {
    /// Scenario file, looked up under `scenarios/` when not an existing path
    #[arg(short, default_value = "three_body.yaml")]
    file_name: String,

    /// Write the trajectory as CSV to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write positions and velocities as (r, theta) pairs (2D only)
    #[arg(long)]
    polar: bool,

    /// Time the force model and the RK4 step instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.exists() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let scenario_cfg = ScenarioConfig::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let args = Args::parse();

    if args.bench {
        bench_gravity()?;
        bench_rk4()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg)?;
    let trajectory = scenario.run()?;

    match trajectory.outcome() {
        Outcome::Completed => info!(frames = trajectory.len(), "run completed"),
        Outcome::NumericDivergence { step, time } => {
            warn!(step, time, frames = trajectory.len(), "run diverged, trajectory truncated")
        }
        Outcome::Interrupted { step, time } => info!(step, time, "run interrupted"),
    }

    let report = drift(scenario.forces(), &scenario.energy_model(), &trajectory);
    info!(
        energy = report.max_energy_error,
        momentum = report.max_momentum_error,
        angular_momentum = report.max_angular_momentum_error,
        "max conservation drift"
    );

    if let Some(path) = args.output {
        let framing = if args.polar { Framing::Polar } else { Framing::Cartesian };
        save_trajectory(&path, &trajectory, &scenario.names, framing)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "trajectory written");
    }

    Ok(())
}
