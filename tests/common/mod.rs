use pref_assign::error::Result;
use pref_assign::{IntegerProgram, OracleOutcome, SolveOracle};
use std::cell::RefCell;

/// Deterministic oracle that enumerates every 0/1 vector. The first vector
/// (in increasing bitmask order) with the lowest cost wins. It keeps a copy
/// of the last program it was asked to solve.
#[derive(Default)]
pub struct ExhaustiveOracle {
    pub last_program: RefCell<Option<IntegerProgram>>,
}

impl ExhaustiveOracle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SolveOracle for ExhaustiveOracle {
    fn name(&self) -> &str {
        "exhaustive"
    }

    fn solve(&self, program: &IntegerProgram) -> Result<OracleOutcome> {
        *self.last_program.borrow_mut() = Some(program.clone());

        let n = program.variables().len();
        assert!(n <= 20, "exhaustive oracle is meant for tiny programs");

        let mut best: Option<(f64, Vec<f64>)> = None;
        for mask in 0u32..(1u32 << n) {
            let values: Vec<f64> = (0..n)
                .map(|i| if mask & (1 << i) != 0 { 1.0 } else { 0.0 })
                .collect();
            if !program.is_feasible(&values) {
                continue;
            }
            let cost = program.objective_value(&values);
            if best.as_ref().map_or(true, |(best_cost, _)| cost < *best_cost) {
                best = Some((cost, values));
            }
        }

        Ok(match best {
            Some((_, values)) => OracleOutcome::optimal(values),
            None => OracleOutcome::infeasible(),
        })
    }
}
