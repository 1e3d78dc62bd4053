use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::*;

/// All tunable knobs for the simulation core, grouped per engine.
/// Defaults match the named constants in `constants.rs`; a JSON file
/// can override any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub coherence: CoherenceKnobs,
    pub neural: NeuralKnobs,
    pub quantum: QuantumKnobs,
    pub layout: LayoutKnobs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoherenceKnobs {
    pub curl_weight: f64,       // e.g., 0.25
    pub potential_weight: f64,  // e.g., 0.55
    pub dispersion_weight: f64, // e.g., 0.20
    pub epsilon_floor: f64,     // e.g., 0.001
    pub pass_threshold: f64,    // e.g., 0.42
    pub decay_rate: f64,        // e.g., 0.1 (per second toward the floor)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralKnobs {
    pub spike_threshold: f64, // e.g., 0.8 (fast-variable local max cutoff)
    pub cv_regular: f64,      // e.g., 0.15 (ISI CV below this = regular)
    pub cv_chaotic: f64,      // e.g., 0.5  (ISI CV above this = chaotic)
    pub burst_isi_cutoff: f64, // e.g., 0.5 (mean ISI below this = intra-burst)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantumKnobs {
    pub max_qubits: usize,        // e.g., 12 (state vector is 2^n)
    pub gate_decoherence: f64,    // e.g., 0.995 (coherence multiplier per gate)
    pub decoherence_rate: f64,    // e.g., 0.05 (exponential, per second)
    pub energy_per_gate: f64,     // e.g., 1.0 (energy proxy units per gate)
    pub coherence_floor: f64,     // e.g., 0.001 (same floor convention as graphs)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutKnobs {
    pub revolutions: f64,      // e.g., 3.0 (spiral turns across a full set)
    pub base_scale: f64,       // e.g., 1.0
    pub vertical_lift: f64,    // e.g., 0.05 (height gained per radian)
    pub cluster_scale: f64,    // e.g., 0.25 (inner spiral size vs outer)
    pub repulsion: f64,        // e.g., 0.5
    pub attraction: f64,       // e.g., 0.1
    pub damping: f64,          // e.g., 0.85
    pub iterations: usize,     // e.g., 60
    pub packing_spacing: f64,  // e.g., 1.5
    pub min_rank: usize,       // e.g., 0 (zoom-out bound)
    pub max_rank: usize,       // e.g., 9 (zoom-in bound)
}

impl Default for CoherenceKnobs {
    fn default() -> Self {
        Self {
            curl_weight: 0.25,
            potential_weight: 0.55,
            dispersion_weight: 0.20,
            epsilon_floor: COHERENCE_EPSILON_FLOOR,
            pass_threshold: COHERENCE_PASS_THRESHOLD,
            decay_rate: 0.1,
        }
    }
}

impl Default for NeuralKnobs {
    fn default() -> Self {
        Self {
            spike_threshold: DEFAULT_SPIKE_THRESHOLD,
            cv_regular: 0.15,
            cv_chaotic: 0.5,
            burst_isi_cutoff: 0.5,
        }
    }
}

impl Default for QuantumKnobs {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            gate_decoherence: DEFAULT_GATE_DECOHERENCE,
            decoherence_rate: DEFAULT_DECOHERENCE_RATE,
            energy_per_gate: 1.0,
            coherence_floor: COHERENCE_EPSILON_FLOOR,
        }
    }
}

impl Default for LayoutKnobs {
    fn default() -> Self {
        Self {
            revolutions: 3.0,
            base_scale: 1.0,
            vertical_lift: 0.05,
            cluster_scale: 0.25,
            repulsion: 0.5,
            attraction: 0.1,
            damping: 0.85,
            iterations: 60,
            packing_spacing: 1.5,
            min_rank: 0,
            max_rank: 9,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            coherence: CoherenceKnobs::default(),
            neural: NeuralKnobs::default(),
            quantum: QuantumKnobs::default(),
            layout: LayoutKnobs::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading engine config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing engine config from {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("writing engine config to {}", path.display()))?;
        Ok(())
    }

    /// Load if the file exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("engine config unreadable ({e:#}); using defaults");
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}
