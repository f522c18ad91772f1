use crate::model::{BoundMode, Diagnostic, Rank, SolveStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub assignment: String,
    pub rank: Rank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPlacements {
    pub person: String,
    pub placements: Vec<Placement>,
}

/// Final person -> assignments mapping, persons in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAssignments {
    pub persons: Vec<PersonPlacements>,
}

impl FinalAssignments {
    pub fn placements_for(&self, person: &str) -> Option<&[Placement]> {
        self.persons
            .iter()
            .find(|p| p.person == person)
            .map(|p| p.placements.as_slice())
    }

    /// Flattened `(person, assignment, rank)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, Rank)> {
        self.persons.iter().flat_map(|p| {
            p.placements
                .iter()
                .map(move |pl| (p.person.as_str(), pl.assignment.as_str(), pl.rank))
        })
    }

    pub fn total_placements(&self) -> usize {
        self.persons.iter().map(|p| p.placements.len()).sum()
    }

    pub fn assigned_to(&self, assignment: &str) -> usize {
        self.rows().filter(|(_, a, _)| *a == assignment).count()
    }

    pub fn rank_histogram(&self) -> BTreeMap<u8, usize> {
        let mut histogram: BTreeMap<u8, usize> =
            Rank::ALL.iter().map(|r| (r.value(), 0)).collect();
        for (_, _, rank) in self.rows() {
            *histogram.entry(rank.value()).or_insert(0) += 1;
        }
        histogram
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFill {
    pub name: String,
    pub capacity: u32,
    pub assigned: usize,
    pub within_bounds: bool,
}

/// Machine-readable summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub status: SolveStatus,
    pub solver: String,
    pub bounds: BoundMode,
    pub objective_value: f64,
    pub variables: usize,
    pub constraints: usize,
    pub placements_by_rank: BTreeMap<u8, usize>,
    pub assignments: Vec<AssignmentFill>,
    pub diagnostics: Vec<Diagnostic>,
}
