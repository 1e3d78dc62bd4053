//! Spike detection and firing-regime statistics over a trajectory
//!
//! All functions take a finished trajectory; the labels they produce are
//! descriptive, never fed back into the dynamics.

use serde::{Deserialize, Serialize};

use super::hindmarsh_rose::{FiringMode, NeuralState};
use crate::config::NeuralKnobs;

/// Summary statistics of a detected spike train.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeStats {
    pub spike_count: usize,
    pub mean_isi: f64,
    pub isi_cv: f64,
    pub firing_rate: f64,
    pub mode: FiringMode,
}

/// Indices of samples where the fast variable is a strict local maximum
/// above `threshold`. Endpoints cannot qualify.
pub fn detect_spikes(trajectory: &[NeuralState], threshold: f64) -> Vec<usize> {
    let mut spikes = Vec::new();
    for i in 1..trajectory.len().saturating_sub(1) {
        let x = trajectory[i].x;
        if x > threshold && x > trajectory[i - 1].x && x > trajectory[i + 1].x {
            spikes.push(i);
        }
    }
    spikes
}

/// Inter-spike intervals in trajectory time units, from consecutive spike
/// timestamps.
pub fn inter_spike_intervals(trajectory: &[NeuralState], spikes: &[usize]) -> Vec<f64> {
    spikes
        .windows(2)
        .map(|pair| trajectory[pair[1]].timestamp - trajectory[pair[0]].timestamp)
        .collect()
}

/// Spikes per unit time over the trajectory's full span. A degenerate
/// span (fewer than two samples) reads as zero rather than dividing by it.
pub fn firing_rate(trajectory: &[NeuralState], spike_count: usize) -> f64 {
    match (trajectory.first(), trajectory.last()) {
        (Some(first), Some(last)) if last.timestamp > first.timestamp => {
            spike_count as f64 / (last.timestamp - first.timestamp)
        }
        _ => 0.0,
    }
}

/// Classify the firing regime from the ISI coefficient of variation:
/// no spikes is resting; a regular train (low CV) with intra-burst spacing
/// below the cutoff reads as bursting, otherwise tonic spiking; a highly
/// irregular train (high CV) reads as chaotic.
pub fn classify(trajectory: &[NeuralState], knobs: &NeuralKnobs) -> SpikeStats {
    let spikes = detect_spikes(trajectory, knobs.spike_threshold);
    let isis = inter_spike_intervals(trajectory, &spikes);
    let rate = firing_rate(trajectory, spikes.len());

    if spikes.is_empty() {
        return SpikeStats {
            spike_count: 0,
            mean_isi: 0.0,
            isi_cv: 0.0,
            firing_rate: rate,
            mode: FiringMode::Resting,
        };
    }

    let (mean_isi, isi_cv) = if isis.is_empty() {
        (0.0, 0.0)
    } else {
        let mean = isis.iter().sum::<f64>() / isis.len() as f64;
        let variance =
            isis.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / isis.len() as f64;
        // Zero-mean ISI would be a duplicate-timestamp artifact; read as
        // perfectly regular rather than dividing by zero.
        let cv = if mean > 0.0 { variance.sqrt() / mean } else { 0.0 };
        (mean, cv)
    };

    let mode = if isi_cv >= knobs.cv_chaotic {
        FiringMode::Chaotic
    } else if isi_cv < knobs.cv_regular && mean_isi > 0.0 && mean_isi < knobs.burst_isi_cutoff {
        FiringMode::Bursting
    } else {
        FiringMode::Spiking
    };

    SpikeStats {
        spike_count: spikes.len(),
        mean_isi,
        isi_cv,
        firing_rate: rate,
        mode,
    }
}

/// `classify`, then stamp the resulting label onto a copy of the final
/// state so callers can carry it forward.
pub fn classify_and_label(
    trajectory: &[NeuralState],
    knobs: &NeuralKnobs,
) -> Option<(SpikeStats, NeuralState)> {
    let last = *trajectory.last()?;
    let stats = classify(trajectory, knobs);
    let labeled = NeuralState {
        classified_mode: stats.mode,
        ..last
    };
    Some((stats, labeled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::hindmarsh_rose::{simulate, HrParameters};

    fn synthetic_trajectory(xs: &[f64], dt: f64) -> Vec<NeuralState> {
        xs.iter()
            .enumerate()
            .map(|(i, &x)| NeuralState {
                x,
                y: 0.0,
                z: 0.0,
                classified_mode: FiringMode::Resting,
                timestamp: i as f64 * dt,
            })
            .collect()
    }

    #[test]
    fn test_detects_strict_local_maxima_only() {
        let trajectory = synthetic_trajectory(&[0.0, 1.2, 0.0, 1.2, 1.2, 0.0, 2.0], 1.0);
        let spikes = detect_spikes(&trajectory, 0.8);
        // Index 1 is a strict maximum; the 1.2-plateau at 3..4 is not; the
        // trailing 2.0 is an endpoint.
        assert_eq!(spikes, vec![1]);
    }

    #[test]
    fn test_threshold_filters_small_bumps() {
        let trajectory = synthetic_trajectory(&[0.0, 0.5, 0.0, 0.9, 0.0], 1.0);
        assert_eq!(detect_spikes(&trajectory, 0.8), vec![3]);
        assert_eq!(detect_spikes(&trajectory, 2.0), Vec::<usize>::new());
    }

    #[test]
    fn test_isi_uses_timestamps() {
        let trajectory = synthetic_trajectory(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0], 0.5);
        let spikes = detect_spikes(&trajectory, 0.8);
        let isis = inter_spike_intervals(&trajectory, &spikes);
        assert_eq!(isis.len(), 2);
        for isi in isis {
            assert!((isi - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_firing_rate_degenerate_span() {
        assert_eq!(firing_rate(&[], 0), 0.0);
        let one = synthetic_trajectory(&[0.0], 1.0);
        assert_eq!(firing_rate(&one, 3), 0.0);
    }

    #[test]
    fn test_no_spikes_classifies_resting() {
        let trajectory = synthetic_trajectory(&[0.0, 0.1, 0.0, 0.2, 0.1], 1.0);
        let stats = classify(&trajectory, &NeuralKnobs::default());
        assert_eq!(stats.mode, FiringMode::Resting);
        assert_eq!(stats.spike_count, 0);
    }

    #[test]
    fn test_regular_train_classifies_spiking() {
        let mut xs = Vec::new();
        for _ in 0..10 {
            xs.extend_from_slice(&[0.0, 0.0, 1.5, 0.0, 0.0]); // period 5
        }
        let knobs = NeuralKnobs::default();
        let trajectory = synthetic_trajectory(&xs, 0.2); // ISI = 1.0 > cutoff
        let stats = classify(&trajectory, &knobs);
        assert_eq!(stats.mode, FiringMode::Spiking);
        assert!(stats.isi_cv < knobs.cv_regular);
    }

    #[test]
    fn test_tight_regular_train_classifies_bursting() {
        let mut xs = Vec::new();
        for _ in 0..20 {
            xs.extend_from_slice(&[0.0, 1.5]); // period 2
        }
        let knobs = NeuralKnobs::default();
        let trajectory = synthetic_trajectory(&xs, 0.1); // ISI = 0.2 < cutoff
        let stats = classify(&trajectory, &knobs);
        assert_eq!(stats.mode, FiringMode::Bursting);
    }

    #[test]
    fn test_irregular_train_classifies_chaotic() {
        // Spikes at wildly varying spacing.
        let mut xs = vec![0.0; 100];
        for i in [2usize, 4, 30, 33, 90] {
            xs[i] = 1.5;
        }
        let trajectory = synthetic_trajectory(&xs, 0.1);
        let stats = classify(&trajectory, &NeuralKnobs::default());
        assert_eq!(stats.mode, FiringMode::Chaotic);
    }

    #[test]
    fn test_subthreshold_current_rests_raised_current_spikes() {
        let knobs = NeuralKnobs::default();

        let quiet = HrParameters::default(); // input_current = 0
        let initial = NeuralState::resting(&quiet, 0.0);
        let trajectory = simulate(initial, &quiet, 0.01, 50_000).unwrap();
        let stats = classify(&trajectory, &knobs);
        assert_eq!(stats.mode, FiringMode::Resting, "unforced model must rest");

        let driven = HrParameters {
            input_current: 3.0,
            ..HrParameters::default()
        };
        let initial = NeuralState::resting(&driven, 0.0);
        let trajectory = simulate(initial, &driven, 0.01, 50_000).unwrap();
        let stats = classify(&trajectory, &knobs);
        assert!(stats.spike_count > 0, "driven model must spike");
        assert_ne!(stats.mode, FiringMode::Resting);
    }

    #[test]
    fn test_label_is_stamped_on_final_state() {
        let trajectory = synthetic_trajectory(&[0.0, 1.5, 0.0, 1.5, 0.0], 1.0);
        let (stats, labeled) = classify_and_label(&trajectory, &NeuralKnobs::default()).unwrap();
        assert_eq!(labeled.classified_mode, stats.mode);
        assert_eq!(labeled.timestamp, 4.0);
    }
}
