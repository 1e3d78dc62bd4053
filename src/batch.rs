//! Batch helpers for running many independent simulations in parallel
//!
//! Every engine call is pure, so fanning instances across rayon workers
//! needs no locking: each reservoir or trajectory owns its own state, and
//! callers that sample measurements bring one RNG per instance.

use anyhow::Result;
use rayon::prelude::*;

use crate::config::{NeuralKnobs, QuantumKnobs};
use crate::neural::hindmarsh_rose::{simulate, HrParameters, NeuralState};
use crate::neural::spike_train::{classify, SpikeStats};
use crate::quantum::reservoir::{step_decay, ReservoirState};

/// Advance every reservoir by one decoherence step of `dt` seconds.
pub fn decay_reservoirs(
    reservoirs: &[ReservoirState],
    dt: f64,
    knobs: &QuantumKnobs,
) -> Vec<ReservoirState> {
    reservoirs
        .par_iter()
        .map(|r| step_decay(r, dt, knobs))
        .collect()
}

/// Integrate a full trajectory per seed and classify its firing regime.
/// Any non-finite seed fails the whole batch rather than returning a
/// partially corrupted set.
pub fn simulate_population(
    seeds: &[(NeuralState, HrParameters)],
    dt: f64,
    steps: usize,
    knobs: &NeuralKnobs,
) -> Result<Vec<(Vec<NeuralState>, SpikeStats)>> {
    seeds
        .par_iter()
        .map(|(initial, params)| {
            let trajectory = simulate(*initial, params, dt, steps)?;
            let stats = classify(&trajectory, knobs);
            Ok((trajectory, stats))
        })
        .collect()
}
