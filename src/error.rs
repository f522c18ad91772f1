use std::fmt;
use thiserror::Error;

/// Errors raised while turning a preference table into a final assignment.
#[derive(Error, Debug)]
pub enum AssignError {
    #[error("line {line}: expected {expected} cells, found {found}")]
    TableShape {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column {column}: invalid preference value '{value}' (expected 1, 2, 3 or 4)")]
    InvalidPreferenceValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}, column {column}: invalid count '{value}'")]
    InvalidCount {
        line: usize,
        column: String,
        value: String,
    },

    #[error("preference table is empty: {0}")]
    EmptyTable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported bound mode '{0}' (expected equal, lower or upper)")]
    UnsupportedBoundMode(String),

    #[error("invalid weight table: {0}")]
    InvalidWeights(String),

    #[error("invalid capacity override: {0}")]
    InvalidCapacityOverride(String),

    #[error("model is infeasible by construction: {0}")]
    InfeasibleByConstruction(String),

    #[error("person '{person}' received {found} assignments but requires {expected}")]
    InternalConsistency {
        person: String,
        expected: u32,
        found: usize,
    },

    #[error("solver failure: {0}")]
    Oracle(String),
}

/// Coarse grouping of [`AssignError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Configuration,
    Infeasible,
    Consistency,
    Oracle,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Parse => "parse",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Infeasible => "infeasible",
            ErrorCategory::Consistency => "consistency",
            ErrorCategory::Oracle => "oracle",
        };
        f.write_str(name)
    }
}

impl AssignError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AssignError::TableShape { .. }
            | AssignError::InvalidPreferenceValue { .. }
            | AssignError::InvalidCount { .. }
            | AssignError::EmptyTable(_)
            | AssignError::Csv(_)
            | AssignError::Io(_) => ErrorCategory::Parse,
            AssignError::UnsupportedBoundMode(_)
            | AssignError::InvalidWeights(_)
            | AssignError::InvalidCapacityOverride(_) => ErrorCategory::Configuration,
            AssignError::InfeasibleByConstruction(_) => ErrorCategory::Infeasible,
            AssignError::InternalConsistency { .. } => ErrorCategory::Consistency,
            AssignError::Oracle(_) => ErrorCategory::Oracle,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssignError>;
