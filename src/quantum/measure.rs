//! Monte Carlo measurement sampling and entanglement metrics
//!
//! Sampling consumes an injected `rand::Rng` so callers own reproducibility:
//! seed a `StdRng` for exact replay, and never share one generator across
//! concurrently running simulations without synchronization.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::state::QuantumState;

/// Tally of sampling a register. Outcome keys are bitstrings rendered
/// most-significant qubit first, so a q-qubit ground state reads "0…0".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    pub outcome_counts: BTreeMap<String, u64>,
    pub total_shots: u64,
    pub most_frequent_outcome: String,
    pub outcome_entropy: f64,
}

/// Correlation structure of a state: Shannon entropy of the full
/// distribution, the qubit pairs coupled by entangling gates, and the
/// entropy normalized against its log2(dimension) maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntanglementMetrics {
    pub entropy: f64,
    pub correlated_pairs: Vec<(usize, usize)>,
    pub strength: f64,
}

fn bitstring(index: usize, qubit_count: usize) -> String {
    (0..qubit_count)
        .rev()
        .map(|q| if index & (1 << q) != 0 { '1' } else { '0' })
        .collect()
}

/// Draw `shots` outcomes through the cumulative probability distribution.
/// Statistical variance is expected behavior here, not an error; tests
/// bound it with wide intervals or pin the seed.
pub fn measure<R: Rng + ?Sized>(
    state: &QuantumState,
    shots: u64,
    rng: &mut R,
) -> MeasurementResult {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for _ in 0..shots {
        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        let mut outcome = state.dimension() - 1;
        for (i, p) in state.probabilities.iter().enumerate() {
            cumulative += p;
            if draw < cumulative {
                outcome = i;
                break;
            }
        }
        *counts.entry(bitstring(outcome, state.qubit_count)).or_insert(0) += 1;
    }

    // BTreeMap iteration makes the max-by-count tie-break lexicographic
    // and therefore deterministic.
    let most_frequent = counts
        .iter()
        .max_by_key(|(_, c)| **c)
        .map(|(k, _)| k.clone())
        .unwrap_or_default();

    let entropy = shannon_entropy(counts.values().map(|c| *c as f64 / shots.max(1) as f64));

    MeasurementResult {
        outcome_counts: counts,
        total_shots: shots,
        most_frequent_outcome: most_frequent,
        outcome_entropy: entropy,
    }
}

/// −Σ p·log2(p) over the given distribution; zero-probability entries
/// contribute nothing.
pub fn shannon_entropy<I: Iterator<Item = f64>>(probabilities: I) -> f64 {
    probabilities
        .filter(|p| *p > 0.0)
        .map(|p| -p * p.log2())
        .sum()
}

/// Approximate entanglement from the full probability distribution: its
/// Shannon entropy, normalized by the log2(dimension) maximum, alongside
/// the pairs the circuit actually coupled.
pub fn entanglement_metrics(
    state: &QuantumState,
    correlated_pairs: &[(usize, usize)],
) -> EntanglementMetrics {
    let entropy = shannon_entropy(state.probabilities.iter().copied());
    let max_entropy = state.qubit_count as f64; // log2(2^q)
    let strength = if max_entropy > 0.0 {
        (entropy / max_entropy).clamp(0.0, 1.0)
    } else {
        0.0
    };
    EntanglementMetrics {
        entropy,
        correlated_pairs: correlated_pairs.to_vec(),
        strength,
    }
}
