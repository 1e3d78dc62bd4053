//! QuantumReservoirEngine: discrete complex-amplitude simulation
//!
//! Small state-vector registers used as fixed feature-extraction
//! substrates: build a circuit (superposition, entanglement layers, input
//! encoding), let decoherence chew on it, sample measurements. States are
//! replaced on every operation, never mutated, so prior states stay valid
//! for history and replay.
//!
//! Basis convention: for q qubits the vector has 2^q amplitudes indexed by
//! the integer whose binary digits give each qubit's value (qubit k is
//! bit k).

pub mod complex;
pub mod gates;
pub mod measure;
pub mod reservoir;
pub mod state;

pub use complex::Complex;
pub use gates::{apply_cnot, apply_hadamard, apply_rotation};
pub use measure::{entanglement_metrics, measure, shannon_entropy, EntanglementMetrics, MeasurementResult};
pub use reservoir::{
    build_reservoir, qrc_metrics, step_decay, QrcMetrics, ReservoirRequest, ReservoirState,
    Substrate,
};
pub use state::QuantumState;

/// Tolerance for the Σ|aᵢ|² = 1 invariant
pub const NORM_TOLERANCE: f64 = 1e-9;
