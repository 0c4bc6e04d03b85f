//! CSV export of a trajectory
//!
//! One row per frame: the time, then every body's position and velocity in
//! body order. Planar trajectories can also be written in polar framing
//! (`r, theta, dr/dt, dtheta/dt` per body).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::configuration::polar;
use crate::simulation::error::{Result, SimError};
use crate::simulation::recorder::{Frame, Trajectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    #[default]
    Cartesian,
    Polar,
}

/// Column header for `names.len()` bodies
pub fn csv_header(names: &[String], dim: usize, framing: Framing) -> String {
    let suffixes: &[&str] = match (framing, dim) {
        (Framing::Polar, _) => &["r", "theta", "vr", "vtheta"],
        (Framing::Cartesian, 2) => &["x", "y", "vx", "vy"],
        (Framing::Cartesian, _) => &["x", "y", "z", "vx", "vy", "vz"],
    };

    let mut header = String::from("time");
    for name in names {
        for s in suffixes {
            header.push_str(&format!(",{name}_{s}"));
        }
    }
    header
}

/// One CSV row for `frame`
pub fn csv_row(frame: &Frame, framing: Framing) -> String {
    let state = &frame.state;
    let mut row = format!("{}", frame.time);

    for i in 0..state.n_bodies() {
        let (x, v) = (state.position(i), state.velocity(i));
        let values: Vec<f64> = match framing {
            Framing::Cartesian => x.iter().chain(v).copied().collect(),
            Framing::Polar => {
                let [r, theta] = polar::position_to_polar(x[0], x[1]);
                let [vr, vtheta] = polar::velocity_to_polar(x[0], x[1], v[0], v[1]);
                vec![r, theta, vr, vtheta]
            }
        };
        for c in values {
            row.push_str(&format!(",{c}"));
        }
    }
    row
}

/// Write header and all frames of `trajectory`
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &Trajectory, names: &[String], framing: Framing) -> Result<()> {
    let Some(first) = trajectory.first() else {
        return Ok(());
    };
    let dim = first.state.dim();
    if framing == Framing::Polar && dim != 2 {
        return Err(SimError::config("polar output is only supported for 2D trajectories"));
    }
    if names.len() != first.state.n_bodies() {
        return Err(SimError::config(format!(
            "{} column names for {} bodies",
            names.len(),
            first.state.n_bodies()
        )));
    }

    writeln!(writer, "{}", csv_header(names, dim, framing))?;
    for frame in trajectory.frames() {
        writeln!(writer, "{}", csv_row(frame, framing))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `trajectory` to a new file at `path`
pub fn save_trajectory(path: &Path, trajectory: &Trajectory, names: &[String], framing: Framing) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_trajectory(&mut writer, trajectory, names, framing)
}
