//! NeuralDynamicsEngine: three-variable oscillator integration and regime
//! classification
//!
//! A Hindmarsh–Rose style model: a fast voltage-like variable, a recovery
//! variable, and a slow adaptation current. The integrator is a plain
//! fixed-step RK4 that the caller drives one step at a time; nothing is
//! retained between calls, so trajectories thread through the caller and
//! independent neurons can run on independent threads.

pub mod hindmarsh_rose;
pub mod spike_train;

pub use hindmarsh_rose::{rk4_step, simulate, FiringMode, HrParameters, NeuralState};
pub use spike_train::{
    classify, classify_and_label, detect_spikes, firing_rate, inter_spike_intervals, SpikeStats,
};

/// Core constants for the oscillator model
pub mod constants {
    /// Slow-variable rate constant must stay well below 1 for the model's
    /// timescale separation to hold
    pub const MAX_SLOW_RATE: f64 = 0.1;

    /// Input current mapped from a zero external drive
    pub const DRIVE_CURRENT_MIN: f64 = 0.0;

    /// Input current mapped from a full external drive
    pub const DRIVE_CURRENT_MAX: f64 = 4.0;
}
