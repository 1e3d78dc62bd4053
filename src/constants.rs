// src/constants.rs

/// The golden ratio φ = (1 + √5) / 2
pub const PHI: f64 = 1.618033988749895;

/// √5, shared by the Binet formula and the Fibonacci membership test
pub const SQRT_5: f64 = 2.23606797749979;

/// The golden angle in radians: π(3 − √5) ≈ 137.507°
pub const GOLDEN_ANGLE: f64 = 2.399963229728653;

/// Floor below which an aggregate coherence score never falls.
/// Purely a floor; nothing in the core interprets it further.
pub const COHERENCE_EPSILON_FLOOR: f64 = 0.001;

/// Pass/fail cutoff for an aggregate coherence score. An arbitrary
/// configurable constant; callers may override it via `CoherenceKnobs`.
pub const COHERENCE_PASS_THRESHOLD: f64 = 0.42;

/// Hard cap on simulated qubits. The state vector doubles per qubit,
/// so 12 qubits is already 4096 complex amplitudes.
pub const DEFAULT_MAX_QUBITS: usize = 12;

/// Coherence multiplier applied once per gate
pub const DEFAULT_GATE_DECOHERENCE: f64 = 0.995;

/// Default exponential decoherence rate (per second of simulated time)
pub const DEFAULT_DECOHERENCE_RATE: f64 = 0.05;

/// Default fast-variable threshold above which a local maximum counts
/// as a spike
pub const DEFAULT_SPIKE_THRESHOLD: f64 = 0.8;
