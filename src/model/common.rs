use crate::error::AssignError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal preference of a person for an assignment, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    HighlyPreferred = 1,
    Preferred = 2,
    Neutral = 3,
    Unwilling = 4,
}

impl Rank {
    pub const ALL: [Rank; 4] = [
        Rank::HighlyPreferred,
        Rank::Preferred,
        Rank::Neutral,
        Rank::Unwilling,
    ];

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Rank::HighlyPreferred),
            2 => Some(Rank::Preferred),
            3 => Some(Rank::Neutral),
            4 => Some(Rank::Unwilling),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// How an assignment's capacity bounds the number of persons placed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundMode {
    /// Assigned count == capacity
    #[default]
    Equal,
    /// Assigned count >= capacity
    Lower,
    /// Assigned count <= capacity
    Upper,
}

impl BoundMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundMode::Equal => "equal",
            BoundMode::Lower => "lower",
            BoundMode::Upper => "upper",
        }
    }

    /// Whether `assigned` persons respect `capacity` under this mode.
    pub fn admits(&self, assigned: u64, capacity: u64) -> bool {
        match self {
            BoundMode::Equal => assigned == capacity,
            BoundMode::Lower => assigned >= capacity,
            BoundMode::Upper => assigned <= capacity,
        }
    }
}

impl FromStr for BoundMode {
    type Err = AssignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(BoundMode::Equal),
            "lower" => Ok(BoundMode::Lower),
            "upper" => Ok(BoundMode::Upper),
            other => Err(AssignError::UnsupportedBoundMode(other.to_string())),
        }
    }
}

impl fmt::Display for BoundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_WEIGHTS: [u64; 4] = [1, 4, 100, 10000];

/// Objective cost of each rank. Costs are positive and strictly increasing
/// so that the mapping can be inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable {
    costs: [u64; 4],
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            costs: DEFAULT_WEIGHTS,
        }
    }
}

/// Two adjacent used tiers where the higher cost does not exceed the
/// largest achievable sum of the lower one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominanceViolation {
    pub lower: Rank,
    pub higher: Rank,
    pub higher_cost: u64,
    pub lower_total: u64,
}

impl WeightTable {
    pub fn new(costs: [u64; 4]) -> Result<Self, AssignError> {
        if costs.iter().any(|&c| c == 0) {
            return Err(AssignError::InvalidWeights(format!(
                "costs must be positive, got {:?}",
                costs
            )));
        }
        if costs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AssignError::InvalidWeights(format!(
                "costs must be strictly increasing, got {:?}",
                costs
            )));
        }
        Ok(Self { costs })
    }

    pub fn costs(&self) -> [u64; 4] {
        self.costs
    }

    pub fn cost(&self, rank: Rank) -> u64 {
        self.costs[rank.index()]
    }

    pub fn rank_for(&self, cost: u64) -> Option<Rank> {
        Rank::ALL.into_iter().find(|rank| self.cost(*rank) == cost)
    }

    /// Check `cost(higher) > max_count * cost(lower)` for each pair of
    /// adjacent tiers among `used`.
    pub fn dominance_violations(&self, max_count: u64, used: &[Rank]) -> Vec<DominanceViolation> {
        let mut tiers: Vec<Rank> = used.to_vec();
        tiers.sort();
        tiers.dedup();

        tiers
            .windows(2)
            .filter_map(|pair| {
                let (lower, higher) = (pair[0], pair[1]);
                let lower_total = max_count.saturating_mul(self.cost(lower));
                let higher_cost = self.cost(higher);
                (higher_cost <= lower_total).then_some(DominanceViolation {
                    lower,
                    higher,
                    higher_cost,
                    lower_total,
                })
            })
            .collect()
    }
}
