//! Polar <-> Cartesian conversion for planar systems
//!
//! Only used at the edges: scenario loading and trajectory output. The
//! integrator itself always works in Cartesian coordinates.

/// `(r, theta)` -> `(x, y)`
pub fn position_to_cartesian(r: f64, theta: f64) -> [f64; 2] {
    [r * theta.cos(), r * theta.sin()]
}

/// Polar rates `(dr/dt, dtheta/dt)` at `(r, theta)` -> `(vx, vy)`
pub fn velocity_to_cartesian(r: f64, theta: f64, dr: f64, dtheta: f64) -> [f64; 2] {
    let (s, c) = theta.sin_cos();
    [dr * c - r * dtheta * s, dr * s + r * dtheta * c]
}

/// `(x, y)` -> `(r, theta)`, theta in (-pi, pi]
pub fn position_to_polar(x: f64, y: f64) -> [f64; 2] {
    [x.hypot(y), y.atan2(x)]
}

/// `(vx, vy)` at `(x, y)` -> `(dr/dt, dtheta/dt)`
/// Both rates are reported as zero at the origin, where they are undefined.
pub fn velocity_to_polar(x: f64, y: f64, vx: f64, vy: f64) -> [f64; 2] {
    let r2 = x * x + y * y;
    if r2 == 0.0 {
        return [0.0, 0.0];
    }
    let r = r2.sqrt();
    [(x * vx + y * vy) / r, (x * vy - y * vx) / r2]
}
