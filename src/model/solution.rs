use serde::{Deserialize, Serialize};
use std::fmt;

/// Termination status reported by a solve oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Other(String),
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => f.write_str("optimal"),
            SolveStatus::Infeasible => f.write_str("infeasible"),
            SolveStatus::Other(status) => f.write_str(status),
        }
    }
}

/// Result of a single oracle invocation. `values` is indexed by
/// [`VariableId`](crate::model::VariableId); it may be empty when the
/// oracle produced no assignment at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleOutcome {
    pub status: SolveStatus,
    pub values: Vec<f64>,
}

impl OracleOutcome {
    pub fn optimal(values: Vec<f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
        }
    }

    pub fn infeasible() -> Self {
        Self {
            status: SolveStatus::Infeasible,
            values: Vec::new(),
        }
    }

    /// Neither optimal nor known to be infeasible; carries no values.
    pub fn unsolved(status: impl Into<String>) -> Self {
        Self {
            status: SolveStatus::Other(status.into()),
            values: Vec::new(),
        }
    }

    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }
}
