//! Single- and two-qubit gates as explicit bit-indexed amplitude updates
//!
//! Each gate returns a fresh state, multiplies the coherence scalar by the
//! per-gate decoherence factor, and renormalizes to hold the Σ|aᵢ|² = 1
//! invariant against floating drift.

use anyhow::{bail, Result};
use std::f64::consts::FRAC_1_SQRT_2;

use super::complex::Complex;
use super::state::QuantumState;
use crate::config::QuantumKnobs;

fn check_qubit(state: &QuantumState, qubit: usize, gate: &str) -> Result<()> {
    if qubit >= state.qubit_count {
        bail!(
            "{gate} on qubit {qubit} but the register has only {} qubits",
            state.qubit_count
        );
    }
    Ok(())
}

fn finish_gate(mut state: QuantumState, knobs: &QuantumKnobs) -> QuantumState {
    // Same scalar convention as graph coherence: decays but never reads
    // below the configured floor.
    state.coherence = (state.coherence * knobs.gate_decoherence).max(knobs.coherence_floor);
    state.renormalize();
    state
}

/// Hadamard on `qubit`: for every index pair differing only in that bit,
/// (a, b) → ((a+b)/√2, (a−b)/√2). Iterating only indices with the bit
/// clear visits each pair exactly once.
pub fn apply_hadamard(
    state: &QuantumState,
    qubit: usize,
    knobs: &QuantumKnobs,
) -> Result<QuantumState> {
    check_qubit(state, qubit, "hadamard")?;
    let bit = 1usize << qubit;
    let mut next = state.clone();
    for i in 0..state.dimension() {
        if i & bit == 0 {
            let j = i | bit;
            let a = state.amplitudes[i];
            let b = state.amplitudes[j];
            next.amplitudes[i] = (a + b).scale(FRAC_1_SQRT_2);
            next.amplitudes[j] = (a - b).scale(FRAC_1_SQRT_2);
        }
    }
    Ok(finish_gate(next, knobs))
}

/// Controlled-NOT: wherever the control bit is set, swap the amplitude
/// with the one at the target-bit-flipped index. Restricting the loop to
/// target-clear indices swaps each unordered pair exactly once.
pub fn apply_cnot(
    state: &QuantumState,
    control: usize,
    target: usize,
    knobs: &QuantumKnobs,
) -> Result<QuantumState> {
    check_qubit(state, control, "cnot control")?;
    check_qubit(state, target, "cnot target")?;
    if control == target {
        bail!("cnot control and target must be distinct qubits, both were {control}");
    }
    let cbit = 1usize << control;
    let tbit = 1usize << target;
    let mut next = state.clone();
    for i in 0..state.dimension() {
        if i & cbit != 0 && i & tbit == 0 {
            let j = i | tbit;
            next.amplitudes[i] = state.amplitudes[j];
            next.amplitudes[j] = state.amplitudes[i];
        }
    }
    Ok(finish_gate(next, knobs))
}

/// Z-axis rotation by `theta` on `qubit`: bit-clear amplitudes pick up
/// e^{−iθ/2}, bit-set amplitudes e^{+iθ/2}.
pub fn apply_rotation(
    state: &QuantumState,
    qubit: usize,
    theta: f64,
    knobs: &QuantumKnobs,
) -> Result<QuantumState> {
    check_qubit(state, qubit, "rotation")?;
    if !theta.is_finite() {
        bail!("rotation angle must be finite, got {theta}");
    }
    let bit = 1usize << qubit;
    let minus = Complex::from_polar(1.0, -theta / 2.0);
    let plus = Complex::from_polar(1.0, theta / 2.0);
    let mut next = state.clone();
    for i in 0..state.dimension() {
        let phase = if i & bit == 0 { minus } else { plus };
        next.amplitudes[i] = state.amplitudes[i] * phase;
    }
    Ok(finish_gate(next, knobs))
}
