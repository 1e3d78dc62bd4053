//! The three coupled equations and their RK4 integrator
//!
//! dx/dt = y − a·x³ + b·x² − z + I   (fast, voltage-like)
//! dy/dt = c − d·x² − y              (recovery)
//! dz/dt = r·(s·(x − x_rest) − z)    (slow adaptation, r ≪ 1)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::constants::{DRIVE_CURRENT_MAX, DRIVE_CURRENT_MIN, MAX_SLOW_RATE};

/// Oscillator tuning. All constants must be finite; `input_current` is the
/// external forcing signal and may vary between steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HrParameters {
    pub input_current: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    /// Slow rate constant; the timescale separation of the model requires
    /// this to stay well below the fast variables' O(1) rates.
    pub r: f64,
    pub s: f64,
    pub x_rest: f64,
}

impl Default for HrParameters {
    fn default() -> Self {
        Self {
            input_current: 0.0,
            a: 1.0,
            b: 3.0,
            c: 1.0,
            d: 5.0,
            r: 0.006,
            s: 4.0,
            x_rest: -1.6,
        }
    }
}

impl HrParameters {
    /// Map an external scalar drive in [0, 1] onto the model through fixed
    /// linear formulas. A convenience for callers feeding a "quality" or
    /// coherence value in as forcing; not part of the dynamical law.
    pub fn from_drive(drive: f64) -> Self {
        let drive = drive.clamp(0.0, 1.0);
        Self {
            input_current: DRIVE_CURRENT_MIN + drive * (DRIVE_CURRENT_MAX - DRIVE_CURRENT_MIN),
            b: 2.8 + 0.4 * drive,
            // The slow variable must stay slow for the model's timescale
            // separation to hold, whatever the drive asks for.
            r: (0.004 + 0.004 * drive).min(MAX_SLOW_RATE),
            ..Self::default()
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.input_current,
            self.a,
            self.b,
            self.c,
            self.d,
            self.r,
            self.s,
            self.x_rest,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Post-hoc label for a trajectory; never drives the dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiringMode {
    Resting,
    Spiking,
    Bursting,
    Chaotic,
}

/// Instantaneous oscillator state. The classified mode is whatever label
/// was last attached by `spike_train::classify`; integration carries it
/// through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuralState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub classified_mode: FiringMode,
    pub timestamp: f64,
}

impl NeuralState {
    /// The model's rest point for the given parameters: x at x_rest, y at
    /// its nullcline value, z relaxed to zero.
    pub fn resting(params: &HrParameters, timestamp: f64) -> Self {
        Self {
            x: params.x_rest,
            y: params.c - params.d * params.x_rest * params.x_rest,
            z: 0.0,
            classified_mode: FiringMode::Resting,
            timestamp,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

fn derivatives(x: f64, y: f64, z: f64, p: &HrParameters) -> (f64, f64, f64) {
    let dx = y - p.a * x * x * x + p.b * x * x - z + p.input_current;
    let dy = p.c - p.d * x * x - y;
    let dz = p.r * (p.s * (x - p.x_rest) - z);
    (dx, dy, dz)
}

/// One fixed-step 4th-order Runge-Kutta step. Fails fast on non-finite
/// state, parameters, or step size so a bad value can never silently
/// corrupt a trajectory.
pub fn rk4_step(state: &NeuralState, params: &HrParameters, dt: f64) -> Result<NeuralState> {
    if !state.is_finite() {
        bail!(
            "non-finite neural state at t = {}: ({}, {}, {})",
            state.timestamp,
            state.x,
            state.y,
            state.z
        );
    }
    if !params.is_finite() {
        bail!("non-finite oscillator parameters");
    }
    if !dt.is_finite() || dt <= 0.0 {
        bail!("integration step must be finite and positive, got {dt}");
    }

    let (x, y, z) = (state.x, state.y, state.z);

    let (k1x, k1y, k1z) = derivatives(x, y, z, params);
    let (k2x, k2y, k2z) = derivatives(
        x + 0.5 * dt * k1x,
        y + 0.5 * dt * k1y,
        z + 0.5 * dt * k1z,
        params,
    );
    let (k3x, k3y, k3z) = derivatives(
        x + 0.5 * dt * k2x,
        y + 0.5 * dt * k2y,
        z + 0.5 * dt * k2z,
        params,
    );
    let (k4x, k4y, k4z) = derivatives(x + dt * k3x, y + dt * k3y, z + dt * k3z, params);

    let next = NeuralState {
        x: x + dt / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x),
        y: y + dt / 6.0 * (k1y + 2.0 * k2y + 2.0 * k3y + k4y),
        z: z + dt / 6.0 * (k1z + 2.0 * k2z + 2.0 * k3z + k4z),
        classified_mode: state.classified_mode,
        timestamp: state.timestamp + dt,
    };

    if !next.is_finite() {
        bail!(
            "integration diverged to a non-finite state at t = {}",
            next.timestamp
        );
    }
    Ok(next)
}

/// Integrate `steps` RK4 steps from `initial`, returning the full ordered
/// trajectory (initial state included). The engine retains nothing.
pub fn simulate(
    initial: NeuralState,
    params: &HrParameters,
    dt: f64,
    steps: usize,
) -> Result<Vec<NeuralState>> {
    let mut trajectory = Vec::with_capacity(steps + 1);
    trajectory.push(initial);
    let mut current = initial;
    for _ in 0..steps {
        current = rk4_step(&current, params, dt)?;
        trajectory.push(current);
    }
    Ok(trajectory)
}
