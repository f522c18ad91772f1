pub mod config;
pub mod error;
pub mod logic;
pub mod model;

pub use error::{AssignError, ErrorCategory};

pub use logic::{
    build_program, disambiguate, extract_assignments, parse_table, AssignmentPipeline,
    PipelineOptions, PipelineOutcome, PldagOracle, SolveOracle,
};

// Export all model types
pub use model::*;
