pub mod disambiguate;
pub mod extract;
pub mod feasibility;
pub mod form_import;
pub mod model_builder;
pub mod oracle;
pub mod parse;
pub mod pipeline;
pub mod writer;

pub use disambiguate::disambiguate;
pub use extract::extract_assignments;
pub use feasibility::{check_totals, infeasibility_reasons};
pub use form_import::{import_form, write_canonical, CanonicalTable, FormImportOptions};
pub use model_builder::{build_program, variable_name};
pub use oracle::{PldagOracle, SolveOracle};
pub use parse::{parse_table, parse_table_from_path, ParseOptions};
pub use pipeline::{AssignmentPipeline, PipelineOptions, PipelineOutcome};
pub use writer::{write_assignments, write_assignments_to_path, write_report_to_path};
