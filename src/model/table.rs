use crate::model::{Rank, WeightTable};
use serde::Serialize;

/// One cell of the preference matrix seen from either side. `target` indexes
/// into the opposite collection of the owning [`PreferenceTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preference {
    pub target: usize,
    pub rank: Rank,
    pub weight: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: String,
    /// Number of assignments this person must receive
    pub required: u32,
    /// One entry per assignment, in assignment order
    pub preferences: Vec<Preference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub name: String,
    pub capacity: u32,
    /// One entry per person, in person order
    pub preferences: Vec<Preference>,
}

/// Parsed preference matrix with both indexes kept in table order
/// (persons by column, assignments by row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceTable {
    persons: Vec<Person>,
    assignments: Vec<Assignment>,
    weights: WeightTable,
}

impl PreferenceTable {
    pub fn new(
        persons: Vec<(String, u32)>,
        assignments: Vec<(String, u32)>,
        weights: WeightTable,
    ) -> Self {
        Self {
            persons: persons
                .into_iter()
                .map(|(name, required)| Person {
                    name,
                    required,
                    preferences: Vec::new(),
                })
                .collect(),
            assignments: assignments
                .into_iter()
                .map(|(name, capacity)| Assignment {
                    name,
                    capacity,
                    preferences: Vec::new(),
                })
                .collect(),
            weights,
        }
    }

    /// Record a cell into both indexes.
    pub fn record(&mut self, person: usize, assignment: usize, rank: Rank) {
        let weight = self.weights.cost(rank);
        self.persons[person].preferences.push(Preference {
            target: assignment,
            rank,
            weight,
        });
        self.assignments[assignment].preferences.push(Preference {
            target: person,
            rank,
            weight,
        });
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn person(&self, index: usize) -> &Person {
        &self.persons[index]
    }

    pub fn assignment(&self, index: usize) -> &Assignment {
        &self.assignments[index]
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn counts_by_person(&self) -> Vec<(&str, u32)> {
        self.persons
            .iter()
            .map(|p| (p.name.as_str(), p.required))
            .collect()
    }

    pub fn counts_by_assignment(&self) -> Vec<(&str, u32)> {
        self.assignments
            .iter()
            .map(|a| (a.name.as_str(), a.capacity))
            .collect()
    }

    pub fn total_required(&self) -> u64 {
        self.persons.iter().map(|p| p.required as u64).sum()
    }

    pub fn total_capacity(&self) -> u64 {
        self.assignments.iter().map(|a| a.capacity as u64).sum()
    }

    /// Ranks present anywhere in the matrix, ascending.
    pub fn used_ranks(&self) -> Vec<Rank> {
        let mut ranks: Vec<Rank> = self
            .persons
            .iter()
            .flat_map(|p| p.preferences.iter().map(|pref| pref.rank))
            .collect();
        ranks.sort();
        ranks.dedup();
        ranks
    }

    /// Every person ranks every assignment exactly once and vice versa.
    pub fn is_dense(&self) -> bool {
        let persons_dense = self.persons.iter().all(|p| {
            p.preferences.len() == self.assignments.len()
                && p
                    .preferences
                    .iter()
                    .enumerate()
                    .all(|(i, pref)| pref.target == i)
        });
        let assignments_dense = self.assignments.iter().all(|a| {
            a.preferences.len() == self.persons.len()
                && a
                    .preferences
                    .iter()
                    .enumerate()
                    .all(|(i, pref)| pref.target == i)
        });
        persons_dense && assignments_dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> PreferenceTable {
        let mut table = PreferenceTable::new(
            vec![("Ann".to_string(), 1), ("Bo".to_string(), 2)],
            vec![("Desk".to_string(), 2), ("Lab".to_string(), 1)],
            WeightTable::default(),
        );
        table.record(0, 0, Rank::HighlyPreferred);
        table.record(1, 0, Rank::Neutral);
        table.record(0, 1, Rank::Unwilling);
        table.record(1, 1, Rank::Preferred);
        table
    }

    #[test]
    fn test_record_fills_both_indexes() {
        let table = two_by_two();

        let bo = table.person(1);
        assert_eq!(bo.preferences.len(), 2);
        assert_eq!(bo.preferences[0].target, 0);
        assert_eq!(bo.preferences[0].weight, 100);
        assert_eq!(bo.preferences[1].rank, Rank::Preferred);

        let lab = table.assignment(1);
        assert_eq!(lab.preferences[0].target, 0);
        assert_eq!(lab.preferences[0].weight, 10000);

        assert!(table.is_dense());
    }

    #[test]
    fn test_totals_and_ranks() {
        let table = two_by_two();
        assert_eq!(table.total_required(), 3);
        assert_eq!(table.total_capacity(), 3);
        assert_eq!(table.counts_by_person(), vec![("Ann", 1), ("Bo", 2)]);
        assert_eq!(table.counts_by_assignment(), vec![("Desk", 2), ("Lab", 1)]);
        assert_eq!(table.used_ranks(), Rank::ALL.to_vec());
    }

    #[test]
    fn test_sparse_table_is_not_dense() {
        let mut table = PreferenceTable::new(
            vec![("Ann".to_string(), 1)],
            vec![("Desk".to_string(), 1), ("Lab".to_string(), 1)],
            WeightTable::default(),
        );
        table.record(0, 0, Rank::Preferred);
        assert!(!table.is_dense());
    }
}
