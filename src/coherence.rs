//! CoherenceEngine: three-phase decomposition over an entity-relationship
//! graph
//!
//! Curl measures cyclic-dependency density, potential the average connection
//! strength, dispersion its complement. The aggregate scalar is a weighted
//! combination floored at a fixed epsilon so a totally incoherent graph
//! still reads as "barely alive" rather than exactly zero.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::config::CoherenceKnobs;

/// A directed, weighted edge between two entities. Strength is expected
/// in [0, 1]; anything outside is clamped during computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub strength: f64,
}

impl Relationship {
    pub fn new(source: impl Into<String>, target: impl Into<String>, strength: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            strength,
        }
    }
}

/// Curl / potential / dispersion, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreePhaseVector {
    pub curl: f64,
    pub potential: f64,
    pub dispersion: f64,
}

impl ThreePhaseVector {
    /// Scale the components so they sum to 1. A degenerate all-zero vector
    /// is returned unchanged rather than dividing by zero.
    pub fn normalized(self) -> Self {
        let sum = self.curl + self.potential + self.dispersion;
        if sum <= f64::EPSILON {
            return self;
        }
        Self {
            curl: self.curl / sum,
            potential: self.potential / sum,
            dispersion: self.dispersion / sum,
        }
    }
}

/// Aggregate health score of a graph at an instant. `overall` never falls
/// below `epsilon_floor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoherenceMetrics {
    pub overall: f64,
    pub curl: f64,
    pub potential: f64,
    pub dispersion: f64,
    pub epsilon_floor: f64,
    pub timestamp: f64,
}

impl CoherenceMetrics {
    pub fn passes(&self, knobs: &CoherenceKnobs) -> bool {
        self.overall >= knobs.pass_threshold
    }
}

/// Decompose a relationship graph into its three phases.
///
/// Curl counts *entities* that sit on at least one detected cycle, not
/// cycles themselves: a per-node DFS would rediscover overlapping cycles
/// through shared nodes many times over, so membership is collected into a
/// set and each entity contributes once. An empty relationship list is the
/// defined default `{curl: 0, potential: 1, dispersion: 0}`.
pub fn three_phase(entities: &[String], relationships: &[Relationship]) -> ThreePhaseVector {
    if relationships.is_empty() {
        return ThreePhaseVector {
            curl: 0.0,
            potential: 1.0,
            dispersion: 0.0,
        };
    }

    let curl = if entities.is_empty() {
        0.0
    } else {
        cyclic_entities(relationships).len() as f64 / entities.len() as f64
    };

    let mean_strength = relationships
        .iter()
        .map(|r| r.strength.clamp(0.0, 1.0))
        .sum::<f64>()
        / relationships.len() as f64;

    ThreePhaseVector {
        curl: curl.clamp(0.0, 1.0),
        potential: mean_strength,
        dispersion: 1.0 - mean_strength,
    }
}

/// DFS with an explicit recursion stack; every node on the stack between a
/// back-edge target and the current node belongs to a cycle.
fn cyclic_entities(relationships: &[Relationship]) -> HashSet<String> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for r in relationships {
        adjacency.entry(&r.source).or_default().push(&r.target);
    }

    let mut cyclic: HashSet<String> = HashSet::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for start in adjacency.keys().copied() {
        if visited.contains(start) {
            continue;
        }
        let mut stack: Vec<&str> = Vec::new();
        dfs_mark_cycles(start, &adjacency, &mut visited, &mut stack, &mut cyclic);
    }
    cyclic
}

fn dfs_mark_cycles<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    stack: &mut Vec<&'a str>,
    cyclic: &mut HashSet<String>,
) {
    if let Some(pos) = stack.iter().position(|n| *n == node) {
        // Back edge: everything from the first occurrence onward is cyclic.
        for n in &stack[pos..] {
            cyclic.insert((*n).to_string());
        }
        return;
    }
    if visited.contains(node) {
        return;
    }
    visited.insert(node);
    stack.push(node);
    if let Some(neighbors) = adjacency.get(node) {
        for next in neighbors {
            dfs_mark_cycles(next, adjacency, visited, stack, cyclic);
        }
    }
    stack.pop();
}

/// Full metric computation: decompose, weight, floor.
pub fn compute(
    entities: &[String],
    relationships: &[Relationship],
    knobs: &CoherenceKnobs,
    timestamp: f64,
) -> CoherenceMetrics {
    let phases = three_phase(entities, relationships);
    let overall = (knobs.curl_weight * phases.curl
        + knobs.potential_weight * phases.potential
        + knobs.dispersion_weight * phases.dispersion)
        .max(knobs.epsilon_floor);
    CoherenceMetrics {
        overall,
        curl: phases.curl,
        potential: phases.potential,
        dispersion: phases.dispersion,
        epsilon_floor: knobs.epsilon_floor,
        timestamp,
    }
}

/// Componentwise linear interpolation between two snapshots; t is clamped
/// to [0, 1]. The result carries b's floor and an interpolated timestamp.
pub fn lerp(a: &CoherenceMetrics, b: &CoherenceMetrics, t: f64) -> CoherenceMetrics {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: f64, y: f64| x + (y - x) * t;
    CoherenceMetrics {
        overall: mix(a.overall, b.overall).max(b.epsilon_floor),
        curl: mix(a.curl, b.curl),
        potential: mix(a.potential, b.potential),
        dispersion: mix(a.dispersion, b.dispersion),
        epsilon_floor: b.epsilon_floor,
        timestamp: mix(a.timestamp, b.timestamp),
    }
}

/// Exponential decay toward the epsilon floor over `elapsed` seconds:
/// coherence drifts without maintenance. Curl and potential decay with the
/// same factor; dispersion takes up the slack.
pub fn decay(metrics: &CoherenceMetrics, elapsed: f64, knobs: &CoherenceKnobs) -> CoherenceMetrics {
    let factor = (-knobs.decay_rate * elapsed.max(0.0)).exp();
    let floor = metrics.epsilon_floor;
    let curl = metrics.curl * factor;
    let potential = metrics.potential * factor;
    CoherenceMetrics {
        overall: floor + (metrics.overall - floor) * factor,
        curl,
        potential,
        dispersion: (1.0 - curl - potential).clamp(0.0, 1.0),
        epsilon_floor: floor,
        timestamp: metrics.timestamp + elapsed.max(0.0),
    }
}

/// Arithmetic mean of snapshots from different subsystems. Empty input has
/// no defined combination.
pub fn combine(snapshots: &[CoherenceMetrics]) -> Option<CoherenceMetrics> {
    if snapshots.is_empty() {
        return None;
    }
    let n = snapshots.len() as f64;
    let mut sum = [0.0f64; 4];
    let mut latest = f64::NEG_INFINITY;
    let mut floor = 0.0f64;
    for s in snapshots {
        sum[0] += s.overall;
        sum[1] += s.curl;
        sum[2] += s.potential;
        sum[3] += s.dispersion;
        latest = latest.max(s.timestamp);
        floor = floor.max(s.epsilon_floor);
    }
    Some(CoherenceMetrics {
        overall: (sum[0] / n).max(floor),
        curl: sum[1] / n,
        potential: sum[2] / n,
        dispersion: sum[3] / n,
        epsilon_floor: floor,
        timestamp: latest,
    })
}

/// Deterministic scalar → RGB mapping for the rendering boundary: cold blue
/// at 0 through green to warm gold at 1.
pub fn coherence_color(value: f64) -> [f32; 3] {
    let v = value.clamp(0.0, 1.0) as f32;
    if v < 0.5 {
        let t = v * 2.0;
        [0.1 * t, 0.3 + 0.5 * t, 0.9 - 0.6 * t]
    } else {
        let t = (v - 0.5) * 2.0;
        [0.1 + 0.8 * t, 0.8, 0.3 - 0.2 * t]
    }
}
