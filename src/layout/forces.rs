//! Force-directed relaxation over spiral-seeded positions
//!
//! A deterministic physical simulation: pairwise repulsion, edge-based
//! attraction, velocity damping, fixed iteration count. No randomness
//! anywhere, so identical inputs relax to identical layouts.

use nalgebra::Vector3;

use super::{spiral_layout, PlacedEntity};
use crate::coherence::Relationship;
use crate::config::LayoutKnobs;

/// Normalize, or return zero for a degenerate vector instead of NaN.
pub fn safe_normalize(v: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm <= f64::EPSILON {
        Vector3::zeros()
    } else {
        v / norm
    }
}

/// Seed entities on the golden spiral, then relax them for the configured
/// number of iterations. Relationships pull their endpoints together in
/// proportion to strength; every pair pushes apart with an inverse-square
/// falloff.
pub fn force_directed_layout(
    entities: &[String],
    relationships: &[Relationship],
    knobs: &LayoutKnobs,
) -> Vec<PlacedEntity> {
    let mut placed = spiral_layout(entities, knobs);
    if placed.len() < 2 {
        return placed;
    }

    let index_of = |id: &str| placed.iter().position(|p| p.id == id);
    let edges: Vec<(usize, usize, f64)> = relationships
        .iter()
        .filter_map(|r| {
            let a = index_of(&r.source)?;
            let b = index_of(&r.target)?;
            (a != b).then_some((a, b, r.strength.clamp(0.0, 1.0)))
        })
        .collect();

    let mut velocities = vec![Vector3::zeros(); placed.len()];

    for _ in 0..knobs.iterations {
        let mut forces = vec![Vector3::zeros(); placed.len()];

        // 1. Pairwise repulsion with inverse-square falloff. Coincident
        //    points have no defined direction and simply don't repel.
        for i in 0..placed.len() {
            for j in (i + 1)..placed.len() {
                let delta = placed[i].position - placed[j].position;
                let distance_sq = delta.norm_squared().max(1e-6);
                let push = safe_normalize(delta) * (knobs.repulsion / distance_sq);
                forces[i] += push;
                forces[j] -= push;
            }
        }

        // 2. Edge attraction proportional to strength and separation.
        for (a, b, strength) in &edges {
            let delta = placed[*b].position - placed[*a].position;
            let pull = delta * (knobs.attraction * strength);
            forces[*a] += pull;
            forces[*b] -= pull;
        }

        // 3. Damped velocity integration.
        for i in 0..placed.len() {
            velocities[i] = (velocities[i] + forces[i]) * knobs.damping;
            let v = velocities[i];
            placed[i].position += v;
        }
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("e{i}")).collect()
    }

    #[test]
    fn test_safe_normalize_degenerate_input() {
        assert_eq!(safe_normalize(Vector3::zeros()), Vector3::zeros());
        let unit = safe_normalize(Vector3::new(3.0, 0.0, 4.0));
        assert!((unit.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_relaxation_is_deterministic() {
        let knobs = LayoutKnobs::default();
        let entities = ids(12);
        let rels = vec![
            Relationship::new("e0", "e5", 0.9),
            Relationship::new("e3", "e7", 0.4),
        ];
        let a = force_directed_layout(&entities, &rels, &knobs);
        let b = force_directed_layout(&entities, &rels, &knobs);
        assert_eq!(a, b);
    }

    #[test]
    fn test_connected_pair_ends_closer_than_unconnected() {
        let knobs = LayoutKnobs::default();
        let entities = ids(8);
        let rels = vec![Relationship::new("e0", "e7", 1.0)];
        let seeded = spiral_layout(&entities, &knobs);
        let relaxed = force_directed_layout(&entities, &rels, &knobs);

        let seeded_gap = (seeded[0].position - seeded[7].position).norm();
        let relaxed_gap = (relaxed[0].position - relaxed[7].position).norm();
        assert!(
            relaxed_gap < seeded_gap,
            "attraction should pull the linked pair together ({relaxed_gap} vs {seeded_gap})"
        );
    }

    #[test]
    fn test_unknown_relationship_endpoints_ignored() {
        let knobs = LayoutKnobs::default();
        let entities = ids(4);
        let rels = vec![
            Relationship::new("e0", "ghost", 1.0),
            Relationship::new("e1", "e1", 1.0), // self-loop, no direction
        ];
        let relaxed = force_directed_layout(&entities, &rels, &knobs);
        assert_eq!(relaxed.len(), 4);
        for p in &relaxed {
            assert!(p.position.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_single_entity_passes_through() {
        let knobs = LayoutKnobs::default();
        let entities = ids(1);
        let relaxed = force_directed_layout(&entities, &[], &knobs);
        assert_eq!(relaxed, spiral_layout(&entities, &knobs));
    }
}
