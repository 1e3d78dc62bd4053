//! ScaleHierarchy: the ordered Fibonacci-indexed rank table
//!
//! Every rung maps a discrete rank to a Fibonacci number plus descriptive
//! metadata. Layout sizing and substrate classification both index into
//! this one table, so it lives here as a plain static.

use serde::{Deserialize, Serialize};

/// One rung of the hierarchy. The table is ordered by non-decreasing
/// Fibonacci value; the two leading 1s are deliberate (ranks 0 and 1
/// share a value). Serializes outward only: the table itself is static.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleLevel {
    pub rank: usize,
    pub fibonacci_value: u64,
    pub name: &'static str,
    pub description: &'static str,
}

/// Closed set of named ranks, smallest structure first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleRank {
    Point,
    Dyad,
    Triad,
    Motif,
    Cluster,
    Network,
    Lattice,
    Field,
    Domain,
    Cosmos,
}

pub const SCALE_TABLE: [ScaleLevel; 10] = [
    ScaleLevel { rank: 0, fibonacci_value: 1, name: "point", description: "a single isolated element" },
    ScaleLevel { rank: 1, fibonacci_value: 1, name: "dyad", description: "one coupled pair" },
    ScaleLevel { rank: 2, fibonacci_value: 2, name: "triad", description: "minimal closed structure" },
    ScaleLevel { rank: 3, fibonacci_value: 3, name: "motif", description: "smallest repeating unit" },
    ScaleLevel { rank: 4, fibonacci_value: 5, name: "cluster", description: "a handful of tightly linked elements" },
    ScaleLevel { rank: 5, fibonacci_value: 8, name: "network", description: "loosely linked clusters" },
    ScaleLevel { rank: 6, fibonacci_value: 13, name: "lattice", description: "regular repeating connectivity" },
    ScaleLevel { rank: 7, fibonacci_value: 21, name: "field", description: "a continuous extended region" },
    ScaleLevel { rank: 8, fibonacci_value: 34, name: "domain", description: "many fields under one regime" },
    ScaleLevel { rank: 9, fibonacci_value: 55, name: "cosmos", description: "the whole visible structure" },
];

impl ScaleRank {
    pub const ALL: [ScaleRank; 10] = [
        ScaleRank::Point,
        ScaleRank::Dyad,
        ScaleRank::Triad,
        ScaleRank::Motif,
        ScaleRank::Cluster,
        ScaleRank::Network,
        ScaleRank::Lattice,
        ScaleRank::Field,
        ScaleRank::Domain,
        ScaleRank::Cosmos,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<ScaleRank> {
        Self::ALL.get(index).copied()
    }

    pub fn level(self) -> &'static ScaleLevel {
        &SCALE_TABLE[self.index()]
    }

    pub fn fibonacci_value(self) -> u64 {
        self.level().fibonacci_value
    }
}

/// Full table in rank order.
pub fn levels() -> &'static [ScaleLevel] {
    &SCALE_TABLE
}
