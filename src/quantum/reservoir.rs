//! Reservoir construction: superposition, entanglement layers, input
//! encoding
//!
//! A reservoir is a fixed, non-trained register used as a feature
//! extractor: Hadamard everything into uniform superposition, couple
//! neighbors with CNOT chains (ring-closed past two qubits), then encode
//! each external input parameter as a rotation on its own qubit.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::gates::{apply_cnot, apply_hadamard, apply_rotation};
use super::measure::{entanglement_metrics, EntanglementMetrics};
use super::state::QuantumState;
use crate::config::QuantumKnobs;
use crate::hierarchy::ScaleRank;

/// Closed set of physical-analogy categories bucketing reservoirs by
/// typical qubit range. The ranges are a documented contract, not a
/// structural constraint: requests outside them are allowed (and logged),
/// requests above the hard cap are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Substrate {
    /// One isolated spin
    SingleSpin,
    /// A pair of coupled oscillators
    CoupledPair,
    /// A small all-to-all network
    SmallNetwork,
    /// A regular lattice patch
    Lattice,
    /// A large addressable array
    LargeArray,
}

impl Substrate {
    pub const ALL: [Substrate; 5] = [
        Substrate::SingleSpin,
        Substrate::CoupledPair,
        Substrate::SmallNetwork,
        Substrate::Lattice,
        Substrate::LargeArray,
    ];

    /// Typical (inclusive) qubit range for this substrate.
    pub fn qubit_range(self) -> (usize, usize) {
        match self {
            Substrate::SingleSpin => (1, 1),
            Substrate::CoupledPair => (2, 4),
            Substrate::SmallNetwork => (2, 10),
            Substrate::Lattice => (8, 50),
            Substrate::LargeArray => (50, 256),
        }
    }

    /// The hierarchy rung this substrate sits on.
    pub fn scale_rank(self) -> ScaleRank {
        match self {
            Substrate::SingleSpin => ScaleRank::Point,
            Substrate::CoupledPair => ScaleRank::Dyad,
            Substrate::SmallNetwork => ScaleRank::Cluster,
            Substrate::Lattice => ScaleRank::Lattice,
            Substrate::LargeArray => ScaleRank::Field,
        }
    }
}

/// What a collaborator asks for: a substrate kind, a register size, the
/// parameters to encode, and how many entanglement layers to stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirRequest {
    pub substrate: Substrate,
    pub qubit_count: usize,
    pub inputs: Vec<f64>,
    pub layers: usize,
}

/// A named quantum simulation instance: the register plus the bookkeeping
/// the rendering and telemetry boundaries consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirState {
    pub substrate: Substrate,
    pub qubit_count: usize,
    pub state: QuantumState,
    pub input_parameters: Vec<f64>,
    pub circuit_depth: usize,
    pub energy_proxy: f64,
    pub coherence: f64,
    pub entangled_pairs: Vec<(usize, usize)>,
}

/// Summary metrics at the output boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrcMetrics {
    pub circuit_depth: usize,
    pub energy_proxy: f64,
    pub coherence: f64,
    pub entanglement: EntanglementMetrics,
}

/// Build the full reservoir circuit from a ground register. Gate counts
/// become the depth and energy proxy: qubit_count Hadamards, layers ×
/// qubit_count entangling gates, one rotation per encoded input.
pub fn build_reservoir(
    request: &ReservoirRequest,
    knobs: &QuantumKnobs,
    timestamp: f64,
) -> Result<ReservoirState> {
    if !request.inputs.iter().all(|v| v.is_finite()) {
        bail!("reservoir input parameters must all be finite");
    }
    let (lo, hi) = request.substrate.qubit_range();
    if request.qubit_count < lo || request.qubit_count > hi {
        debug!(
            "{:?} reservoir with {} qubits is outside its typical range {lo}..={hi}",
            request.substrate, request.qubit_count
        );
    }

    let mut state = QuantumState::ground_state(request.qubit_count, knobs, timestamp)?;
    let q = request.qubit_count;
    let mut gates = 0usize;

    // 1. Uniform superposition.
    for qubit in 0..q {
        state = apply_hadamard(&state, qubit, knobs)?;
        gates += 1;
    }

    // 2. Entanglement layers: a linear CNOT chain, closed into a ring
    //    once there are enough qubits for the closing edge to be new.
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for _ in 0..request.layers {
        for qubit in 0..q.saturating_sub(1) {
            state = apply_cnot(&state, qubit, qubit + 1, knobs)?;
            gates += 1;
            pairs.push((qubit, qubit + 1));
        }
        if q > 2 {
            state = apply_cnot(&state, q - 1, 0, knobs)?;
            gates += 1;
            pairs.push((q - 1, 0));
        }
    }

    // 3. Rotation-encode each input onto its own qubit. Inputs beyond the
    //    register size have no qubit to land on and are dropped.
    let encoded = request.inputs.len().min(q);
    if encoded < request.inputs.len() {
        debug!(
            "encoding only {encoded} of {} inputs: register has {q} qubits",
            request.inputs.len()
        );
    }
    for (qubit, input) in request.inputs.iter().take(encoded).enumerate() {
        let theta = input.clamp(0.0, 1.0) * std::f64::consts::PI;
        state = apply_rotation(&state, qubit, theta, knobs)?;
        gates += 1;
    }

    pairs.sort_unstable();
    pairs.dedup();

    debug!(
        "built {:?} reservoir: {q} qubits, {} layers, {gates} gates",
        request.substrate, request.layers
    );

    Ok(ReservoirState {
        substrate: request.substrate,
        qubit_count: q,
        coherence: state.coherence,
        input_parameters: request.inputs.clone(),
        circuit_depth: gates,
        energy_proxy: gates as f64 * knobs.energy_per_gate,
        entangled_pairs: pairs,
        state,
    })
}

/// One explicit decoherence step over `dt` seconds, returning a fresh
/// reservoir with its coherence mirror updated.
pub fn step_decay(reservoir: &ReservoirState, dt: f64, knobs: &QuantumKnobs) -> ReservoirState {
    let state = reservoir.state.decohere(dt, knobs);
    ReservoirState {
        coherence: state.coherence,
        state,
        ..reservoir.clone()
    }
}

/// Boundary summary of a reservoir's current condition.
pub fn qrc_metrics(reservoir: &ReservoirState) -> QrcMetrics {
    QrcMetrics {
        circuit_depth: reservoir.circuit_depth,
        energy_proxy: reservoir.energy_proxy,
        coherence: reservoir.coherence,
        entanglement: entanglement_metrics(&reservoir.state, &reservoir.entangled_pairs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(qubits: usize, inputs: Vec<f64>, layers: usize) -> ReservoirRequest {
        ReservoirRequest {
            substrate: Substrate::SmallNetwork,
            qubit_count: qubits,
            inputs,
            layers,
        }
    }

    #[test]
    fn test_substrate_ranges_strictly_increase() {
        let mins: Vec<usize> = Substrate::ALL.iter().map(|s| s.qubit_range().0).collect();
        for pair in mins.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        let maxes: Vec<usize> = Substrate::ALL.iter().map(|s| s.qubit_range().1).collect();
        for pair in maxes.windows(2) {
            assert!(pair[0] < pair[1], "upper bounds must strictly increase");
        }
    }

    #[test]
    fn test_each_substrate_maps_to_a_rank() {
        // Larger substrates sit on higher rungs.
        let ranks: Vec<usize> = Substrate::ALL.iter().map(|s| s.scale_rank().index()).collect();
        for pair in ranks.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_gate_count_formula() {
        let knobs = QuantumKnobs::default();
        let req = request(4, vec![0.2, 0.9], 2);
        let reservoir = build_reservoir(&req, &knobs, 0.0).unwrap();
        // 4 hadamards + 2 layers × (3 chain + 1 ring) + 2 encodings
        assert_eq!(reservoir.circuit_depth, 4 + 2 * 4 + 2);
        assert_eq!(reservoir.energy_proxy, reservoir.circuit_depth as f64);
    }

    #[test]
    fn test_two_qubit_register_has_no_ring_edge() {
        let knobs = QuantumKnobs::default();
        let req = request(2, vec![], 1);
        let reservoir = build_reservoir(&req, &knobs, 0.0).unwrap();
        assert_eq!(reservoir.entangled_pairs, vec![(0, 1)]);
        assert_eq!(reservoir.circuit_depth, 2 + 1);
    }

    #[test]
    fn test_ring_closes_past_two_qubits() {
        let knobs = QuantumKnobs::default();
        let req = request(3, vec![], 1);
        let reservoir = build_reservoir(&req, &knobs, 0.0).unwrap();
        assert!(reservoir.entangled_pairs.contains(&(2, 0)), "ring edge expected");
    }

    #[test]
    fn test_reservoir_state_is_normalized_and_decohered() {
        let knobs = QuantumKnobs::default();
        let req = request(5, vec![0.1, 0.5, 0.9], 2);
        let reservoir = build_reservoir(&req, &knobs, 0.0).unwrap();
        assert!(reservoir.state.is_normalized());
        assert!(reservoir.coherence < 1.0, "every gate costs coherence");
        assert!(reservoir.coherence > 0.0);
        let expected = knobs.gate_decoherence.powi(reservoir.circuit_depth as i32);
        assert!((reservoir.coherence - expected).abs() < 1e-9);
    }

    #[test]
    fn test_oversized_register_rejected() {
        let knobs = QuantumKnobs::default();
        let req = request(knobs.max_qubits + 1, vec![], 1);
        assert!(build_reservoir(&req, &knobs, 0.0).is_err());
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let knobs = QuantumKnobs::default();
        let req = request(3, vec![0.5, f64::NAN], 1);
        assert!(build_reservoir(&req, &knobs, 0.0).is_err());
    }

    #[test]
    fn test_decay_steps_never_raise_coherence() {
        let knobs = QuantumKnobs::default();
        let req = request(3, vec![0.3], 1);
        let mut reservoir = build_reservoir(&req, &knobs, 0.0).unwrap();
        let mut previous = reservoir.coherence;
        for _ in 0..8 {
            reservoir = step_decay(&reservoir, 0.5, &knobs);
            assert!(reservoir.coherence <= previous + 1e-12);
            assert!(reservoir.state.is_normalized());
            previous = reservoir.coherence;
        }
    }

    #[test]
    fn test_qrc_metrics_reflect_reservoir() {
        let knobs = QuantumKnobs::default();
        let req = request(4, vec![0.7], 1);
        let reservoir = build_reservoir(&req, &knobs, 0.0).unwrap();
        let metrics = qrc_metrics(&reservoir);
        assert_eq!(metrics.circuit_depth, reservoir.circuit_depth);
        assert_eq!(metrics.coherence, reservoir.coherence);
        assert!(metrics.entanglement.strength > 0.0, "superposed register");
        assert_eq!(metrics.entanglement.correlated_pairs, reservoir.entangled_pairs);
    }

    #[test]
    fn test_excess_inputs_are_dropped_not_fatal() {
        let knobs = QuantumKnobs::default();
        let req = request(2, vec![0.1, 0.2, 0.3, 0.4], 1);
        let reservoir = build_reservoir(&req, &knobs, 0.0).unwrap();
        // 2 hadamards + 1 chain cnot + 2 encodings (two inputs dropped)
        assert_eq!(reservoir.circuit_depth, 5);
        assert_eq!(reservoir.input_parameters.len(), 4, "request echoed in full");
    }
}
