use crate::error::Result;
use crate::logic::{
    build_program, check_totals, extract_assignments, parse_table, ParseOptions, SolveOracle,
};
use crate::model::{
    AssignmentFill, BoundMode, DiagnosticKind, Diagnostics, FinalAssignments, IntegerProgram,
    OracleOutcome, PreferenceTable, Rank, SolveReport, SolveStatus, WeightTable,
};
use std::io::Read;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub bounds: BoundMode,
    pub no_custom_counts: bool,
    pub weights: WeightTable,
    /// Fail before solving when totals make the program infeasible
    pub precheck_totals: bool,
}

/// Everything a run produced, kept for reporting.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub table: PreferenceTable,
    pub program: IntegerProgram,
    pub oracle: OracleOutcome,
    pub assignments: FinalAssignments,
    pub diagnostics: Diagnostics,
}

impl PipelineOutcome {
    pub fn status(&self) -> &SolveStatus {
        &self.oracle.status
    }

    pub fn is_optimal(&self) -> bool {
        self.oracle.status.is_optimal()
    }

    pub fn objective_value(&self) -> f64 {
        self.program.objective_value(&self.oracle.values)
    }

    pub fn report(&self, solver: &str, bounds: BoundMode) -> SolveReport {
        let assignments = self
            .table
            .assignments()
            .iter()
            .map(|a| {
                let assigned = self.assignments.assigned_to(&a.name);
                AssignmentFill {
                    name: a.name.clone(),
                    capacity: a.capacity,
                    assigned,
                    within_bounds: bounds.admits(assigned as u64, a.capacity as u64),
                }
            })
            .collect();

        SolveReport {
            status: self.oracle.status.clone(),
            solver: solver.to_string(),
            bounds,
            objective_value: self.objective_value(),
            variables: self.program.variables().len(),
            constraints: self.program.constraints().len(),
            placements_by_rank: self.assignments.rank_histogram(),
            assignments,
            diagnostics: self.diagnostics.entries().to_vec(),
        }
    }
}

/// Drives parse -> build -> solve -> extract with a single oracle call.
pub struct AssignmentPipeline<'a, O: SolveOracle + ?Sized> {
    oracle: &'a O,
    options: PipelineOptions,
}

impl<'a, O: SolveOracle + ?Sized> AssignmentPipeline<'a, O> {
    pub fn new(oracle: &'a O, options: PipelineOptions) -> Self {
        Self { oracle, options }
    }

    /// Run the whole pipeline over a canonical CSV table.
    pub fn run<R: Read>(&self, reader: R) -> Result<PipelineOutcome> {
        let mut diagnostics = Diagnostics::new();
        let parse_options = ParseOptions {
            no_custom_counts: self.options.no_custom_counts,
            weights: self.options.weights,
        };

        // Step 1: Parse the preference table
        let table = parse_table(reader, &parse_options, &mut diagnostics)?;
        self.run_table(table, diagnostics)
    }

    /// Run the pipeline over an already parsed table.
    pub fn run_table(
        &self,
        table: PreferenceTable,
        mut diagnostics: Diagnostics,
    ) -> Result<PipelineOutcome> {
        let start_time = Instant::now();

        // Step 2: Totals check, strict or advisory
        check_totals(
            &table,
            self.options.bounds,
            self.options.precheck_totals,
            &mut diagnostics,
        )?;

        // Step 3: Build the integer program
        let program = build_program(&table, self.options.bounds, &mut diagnostics);
        log::info!(
            "Built program with {} variables and {} constraints ({} bounds)",
            program.variables().len(),
            program.constraints().len(),
            self.options.bounds
        );

        // Step 4: Single oracle invocation
        let solve_start = Instant::now();
        let oracle = self.oracle.solve(&program)?;
        log::debug!(
            "{} finished in {} ms",
            self.oracle.name(),
            solve_start.elapsed().as_millis()
        );
        log::info!("Problem Value {}", program.objective_value(&oracle.values));
        if !oracle.status.is_optimal() {
            diagnostics.warn(
                DiagnosticKind::NonOptimalStatus,
                format!(
                    "Problem status is not optimal but is instead {}",
                    oracle.status
                ),
            );
        }

        // Step 5: Extract placements
        let assignments = extract_assignments(&table, &program, &oracle, &mut diagnostics)?;
        for (person, assignment, rank) in assignments.rows() {
            if rank == Rank::Unwilling {
                log::warn!("{} was placed in {} despite ranking it unwilling", person, assignment);
            }
        }

        log::debug!(
            "Pipeline finished in {} ms",
            start_time.elapsed().as_millis()
        );

        Ok(PipelineOutcome {
            table,
            program,
            oracle,
            assignments,
            diagnostics,
        })
    }
}
