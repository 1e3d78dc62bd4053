//! LayoutEngine: deterministic spatial placement from the golden hierarchy
//!
//! Entities go onto golden spirals (flat, hierarchical, or packed) and can
//! optionally be relaxed by a fixed-iteration force simulation. Everything
//! is a pure function of its inputs: identical calls produce bit-identical
//! position lists. Animation is the rendering layer's concern; this module
//! only computes targets.

pub mod forces;

pub use forces::{force_directed_layout, safe_normalize};

use anyhow::{bail, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::config::LayoutKnobs;
use crate::constants::GOLDEN_ANGLE;
use crate::golden;
use crate::hierarchy::ScaleRank;

/// One placed entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedEntity {
    pub id: String,
    pub position: Vector3<f64>,
}

/// A named group whose members get their own inner spiral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub members: Vec<String>,
}

/// The i-th entity (insertion order) lands at spiral parameter t = i·step,
/// with the step chosen so the whole set spans the configured number of
/// revolutions.
pub fn spiral_layout(entities: &[String], knobs: &LayoutKnobs) -> Vec<PlacedEntity> {
    let span = knobs.revolutions * TAU;
    let step = if entities.len() > 1 {
        span / (entities.len() - 1) as f64
    } else {
        0.0
    };
    entities
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let point = golden::golden_spiral_point(i as f64 * step, knobs.base_scale, knobs.vertical_lift);
            PlacedEntity {
                id: id.clone(),
                position: point.position(),
            }
        })
        .collect()
}

/// Clusters on an outer spiral; each cluster's members on an inner spiral
/// centered at the cluster's position.
pub fn hierarchical_layout(clusters: &[Cluster], knobs: &LayoutKnobs) -> Vec<PlacedEntity> {
    let cluster_ids: Vec<String> = clusters.iter().map(|c| c.id.clone()).collect();
    let centers = spiral_layout(&cluster_ids, knobs);

    let inner_knobs = LayoutKnobs {
        base_scale: knobs.base_scale * knobs.cluster_scale,
        ..knobs.clone()
    };

    let mut placed = Vec::new();
    for (cluster, center) in clusters.iter().zip(&centers) {
        placed.push(center.clone());
        for member in spiral_layout(&cluster.members, &inner_knobs) {
            placed.push(PlacedEntity {
                id: member.id,
                position: center.position + member.position,
            });
        }
    }
    placed
}

/// Pack variably-sized items around a container: golden-angle azimuthal
/// spacing with a sunflower radial spread scaled by item size.
pub fn circular_packing(items: &[(String, f64)], knobs: &LayoutKnobs) -> Vec<PlacedEntity> {
    items
        .iter()
        .enumerate()
        .map(|(i, (id, radius))| {
            let azimuth = i as f64 * GOLDEN_ANGLE;
            let spread = knobs.packing_spacing * (i as f64).sqrt() + radius.max(0.0);
            PlacedEntity {
                id: id.clone(),
                position: Vector3::new(spread * azimuth.cos(), 0.0, spread * azimuth.sin()),
            }
        })
        .collect()
}

/// A zoom step through the hierarchy: the rank being left, the rank being
/// approached, and how far along the move is. The interpolation fraction
/// starts at zero; advancing it is the renderer's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleTransition {
    pub from: ScaleRank,
    pub to: ScaleRank,
    pub fraction: f64,
}

/// Select the next rank inward (finer). At the configured bound there is
/// nowhere to go and no transition is produced.
pub fn zoom_in(current: ScaleRank, knobs: &LayoutKnobs) -> Option<ScaleTransition> {
    let index = current.index();
    if index == 0 || index <= knobs.min_rank {
        return None;
    }
    ScaleRank::from_index(index - 1).map(|to| ScaleTransition {
        from: current,
        to,
        fraction: 0.0,
    })
}

/// Select the next rank outward (coarser), bounded by the configured max.
pub fn zoom_out(current: ScaleRank, knobs: &LayoutKnobs) -> Option<ScaleTransition> {
    let index = current.index();
    if index >= knobs.max_rank {
        return None;
    }
    ScaleRank::from_index(index + 1).map(|to| ScaleTransition {
        from: current,
        to,
        fraction: 0.0,
    })
}

/// Lorentz factor γ = 1/√(1 − β²) for the layout layer's relativistic
/// styling transforms. β at or past light speed is a validation error,
/// not a NaN.
pub fn lorentz_factor(beta: f64) -> Result<f64> {
    if !beta.is_finite() {
        bail!("velocity parameter must be finite, got {beta}");
    }
    if beta.abs() >= 1.0 {
        bail!("velocity parameter must satisfy |β| < 1, got {beta}");
    }
    Ok(1.0 / (1.0 - beta * beta).sqrt())
}
