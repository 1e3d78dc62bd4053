//! resonance-core: the deterministic simulation and metrics engine
//!
//! Four numerical engines and two lookup/layout helpers, all pure at the
//! function level: every call takes prior state explicitly and returns a
//! new value, so independent instances parallelize freely and a seeded
//! RNG replays a measurement exactly.
//!
//! - `hierarchy` — the ordered Fibonacci rank table
//! - `golden` — golden-ratio arithmetic and spiral/sphere points
//! - `coherence` — curl/potential/dispersion over a relationship graph
//! - `neural` — three-variable oscillator integration and classification
//! - `quantum` — reservoir state vectors, gates, decoherence, measurement
//! - `layout` — deterministic spatial placement for the rendering layer
//! - `batch` — rayon fan-out over independent simulation instances

pub mod batch;
pub mod coherence;
pub mod config;
pub mod constants;
pub mod golden;
pub mod hierarchy;
pub mod layout;
pub mod neural;
pub mod quantum;

pub use coherence::{CoherenceMetrics, Relationship, ThreePhaseVector};
pub use config::EngineConfig;
pub use golden::SpiralPoint;
pub use hierarchy::{ScaleLevel, ScaleRank};
pub use layout::{Cluster, PlacedEntity, ScaleTransition};
pub use neural::{FiringMode, HrParameters, NeuralState, SpikeStats};
pub use quantum::{
    Complex, MeasurementResult, QrcMetrics, QuantumState, ReservoirRequest, ReservoirState,
    Substrate,
};
