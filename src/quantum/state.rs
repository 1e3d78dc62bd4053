//! The quantum register value object and its norm/decoherence maintenance

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::complex::Complex;
use super::NORM_TOLERANCE;
use crate::config::QuantumKnobs;

/// A full discrete register: 2^qubit_count amplitudes, the probabilities
/// derived from them, a coherence scalar in (0, 1], and the caller's
/// timestamp. Every operation returns a fresh state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumState {
    pub qubit_count: usize,
    pub amplitudes: Vec<Complex>,
    pub probabilities: Vec<f64>,
    pub coherence: f64,
    pub timestamp: f64,
}

impl QuantumState {
    /// |00…0⟩. Rejects a qubit count of zero or one exceeding the
    /// configured cap — the vector doubles per qubit, so the cap is a
    /// memory guard, not a style preference.
    pub fn ground_state(qubit_count: usize, knobs: &QuantumKnobs, timestamp: f64) -> Result<Self> {
        if qubit_count == 0 {
            bail!("a register needs at least one qubit");
        }
        if qubit_count > knobs.max_qubits {
            bail!(
                "{qubit_count} qubits exceeds the cap of {} (the state vector doubles per qubit)",
                knobs.max_qubits
            );
        }
        let dimension = 1usize << qubit_count;
        let mut amplitudes = vec![Complex::ZERO; dimension];
        amplitudes[0] = Complex::ONE;
        let mut probabilities = vec![0.0; dimension];
        probabilities[0] = 1.0;
        Ok(Self {
            qubit_count,
            amplitudes,
            probabilities,
            coherence: 1.0,
            timestamp,
        })
    }

    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Σ|aᵢ|²
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() < NORM_TOLERANCE
    }

    /// Rescale so Σ|aᵢ|² = 1 and rederive the probabilities. A zero-norm
    /// vector cannot be rescaled; it collapses back to the ground basis
    /// state instead of propagating NaN.
    pub fn renormalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm <= f64::EPSILON {
            tracing::warn!("zero-norm state vector; collapsing to the ground basis state");
            for a in &mut self.amplitudes {
                *a = Complex::ZERO;
            }
            self.amplitudes[0] = Complex::ONE;
        } else {
            let inv = 1.0 / norm;
            for a in &mut self.amplitudes {
                *a = a.scale(inv);
            }
        }
        self.refresh_probabilities();
    }

    pub fn refresh_probabilities(&mut self) {
        self.probabilities = self.amplitudes.iter().map(|a| a.norm_sqr()).collect();
    }

    /// |⟨ψ|φ⟩|² between two registers of the same size.
    pub fn fidelity(&self, other: &QuantumState) -> Result<f64> {
        if self.dimension() != other.dimension() {
            bail!(
                "fidelity between registers of different dimension ({} vs {})",
                self.dimension(),
                other.dimension()
            );
        }
        let overlap = self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .fold(Complex::ZERO, |acc, (a, b)| acc + a.conj() * *b);
        Ok(overlap.norm_sqr())
    }

    /// One explicit decoherence step over `dt` seconds: the coherence
    /// scalar decays exponentially, amplitudes are blended toward the
    /// classical mixture (phase information damped, magnitudes kept), and
    /// the vector is renormalized. Coherence never increases, and never
    /// falls below the configured floor — the same scalar convention the
    /// graph coherence metrics follow.
    pub fn decohere(&self, dt: f64, knobs: &QuantumKnobs) -> QuantumState {
        let factor = (-knobs.decoherence_rate * dt.max(0.0)).exp();
        let mut next = self.clone();
        next.coherence = (self.coherence * factor).max(knobs.coherence_floor);
        next.timestamp = self.timestamp + dt.max(0.0);
        for (a, p) in next.amplitudes.iter_mut().zip(&self.probabilities) {
            let classical = Complex::new(p.sqrt(), 0.0);
            *a = a.scale(factor) + classical.scale(1.0 - factor);
        }
        next.renormalize();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_state_shape() {
        let knobs = QuantumKnobs::default();
        let state = QuantumState::ground_state(3, &knobs, 0.0).unwrap();
        assert_eq!(state.dimension(), 8);
        assert_eq!(state.amplitudes[0], Complex::ONE);
        assert_eq!(state.probabilities[0], 1.0);
        assert!(state.is_normalized());
        assert_eq!(state.coherence, 1.0);
    }

    #[test]
    fn test_qubit_cap_enforced() {
        let knobs = QuantumKnobs::default();
        assert!(QuantumState::ground_state(0, &knobs, 0.0).is_err());
        assert!(QuantumState::ground_state(knobs.max_qubits, &knobs, 0.0).is_ok());
        assert!(QuantumState::ground_state(knobs.max_qubits + 1, &knobs, 0.0).is_err());
    }

    #[test]
    fn test_renormalize_restores_unit_norm() {
        let knobs = QuantumKnobs::default();
        let mut state = QuantumState::ground_state(2, &knobs, 0.0).unwrap();
        for a in &mut state.amplitudes {
            *a = Complex::new(0.3, 0.1);
        }
        state.renormalize();
        assert!(state.is_normalized());
        assert!((state.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_renormalize_zero_vector_falls_back() {
        let knobs = QuantumKnobs::default();
        let mut state = QuantumState::ground_state(2, &knobs, 0.0).unwrap();
        for a in &mut state.amplitudes {
            *a = Complex::ZERO;
        }
        state.renormalize();
        assert!(state.is_normalized(), "fallback must be a valid state");
        assert_eq!(state.amplitudes[0], Complex::ONE);
    }

    #[test]
    fn test_fidelity_of_identical_states_is_one() {
        let knobs = QuantumKnobs::default();
        let state = QuantumState::ground_state(2, &knobs, 0.0).unwrap();
        assert!((state.fidelity(&state).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fidelity_dimension_mismatch_is_an_error() {
        let knobs = QuantumKnobs::default();
        let a = QuantumState::ground_state(1, &knobs, 0.0).unwrap();
        let b = QuantumState::ground_state(2, &knobs, 0.0).unwrap();
        assert!(a.fidelity(&b).is_err());
    }

    #[test]
    fn test_decoherence_is_monotone_and_keeps_norm() {
        let knobs = QuantumKnobs::default();
        let mut state = QuantumState::ground_state(2, &knobs, 0.0).unwrap();
        // Put some phase structure in so damping has work to do.
        state.amplitudes = vec![
            Complex::new(0.5, 0.0),
            Complex::new(0.0, 0.5),
            Complex::new(-0.5, 0.0),
            Complex::new(0.0, -0.5),
        ];
        state.renormalize();
        state.coherence = 1.0;

        let mut previous = state.coherence;
        let mut current = state;
        for _ in 0..10 {
            current = current.decohere(0.5, &knobs);
            assert!(current.coherence <= previous + 1e-12, "coherence must not rise");
            assert!(current.is_normalized(), "norm must be restored after decay");
            previous = current.coherence;
        }
        assert!(current.coherence < 1.0);
    }

    #[test]
    fn test_long_decay_bottoms_out_at_coherence_floor() {
        let knobs = QuantumKnobs::default();
        let mut state = QuantumState::ground_state(2, &knobs, 0.0).unwrap();
        // 400 seconds at the default rate puts the raw exponential far
        // below the floor; the scalar must stop there instead.
        for _ in 0..400 {
            state = state.decohere(1.0, &knobs);
            assert!(
                state.coherence >= knobs.coherence_floor,
                "coherence {} fell below the floor {}",
                state.coherence,
                knobs.coherence_floor
            );
        }
        assert!((state.coherence - knobs.coherence_floor).abs() < 1e-12);
    }

    #[test]
    fn test_decoherence_advances_timestamp() {
        let knobs = QuantumKnobs::default();
        let state = QuantumState::ground_state(1, &knobs, 2.0).unwrap();
        let next = state.decohere(0.25, &knobs);
        assert!((next.timestamp - 2.25).abs() < 1e-12);
        // The original is untouched: states are replaced, never mutated.
        assert_eq!(state.timestamp, 2.0);
    }
}
