use crate::error::{AssignError, Result};
use crate::model::{IntegerProgram, OracleOutcome, Relation};
use pldag::{Assignment, Pldag};
use std::collections::HashMap;

/// Status reported when pldag finds no optimal solution.
pub const NO_OPTIMAL_SOLUTION: &str = "no optimal solution (infeasible or undefined)";

/// Black-box integer program solver. Implementations minimise the program's
/// objective subject to all of its constraints and report one value per
/// decision variable, in variable order.
pub trait SolveOracle {
    fn name(&self) -> &str;

    fn solve(&self, program: &IntegerProgram) -> Result<OracleOutcome>;
}

/// Solver backed by a Pldag model and its GLPK backend.
#[derive(Debug, Default, Clone)]
pub struct PldagOracle;

impl PldagOracle {
    pub fn new() -> Self {
        Self
    }

    /// Encode the program: each variable becomes a 0/1 primitive, each
    /// constraint a composite node, and the returned root is the conjunction
    /// of all constraints.
    fn build_model(program: &IntegerProgram) -> Result<(Pldag, String)> {
        let mut model = Pldag::new();

        for variable in program.variables() {
            model.set_primitive(&variable.name, (0, 1));
        }

        let mut constraint_ids = Vec::with_capacity(program.constraints().len());
        for constraint in program.constraints() {
            if constraint.variables.is_empty() {
                return Err(AssignError::Oracle(format!(
                    "constraint {} has no variables",
                    constraint.name
                )));
            }

            let vars: Vec<&str> = constraint
                .variables
                .iter()
                .map(|id| program.variable(*id).name.as_str())
                .collect();

            let constraint_id = match constraint.relation {
                Relation::Equal => model.set_equal(vars, constraint.rhs),
                Relation::AtLeast => model.set_atleast(vars, constraint.rhs),
                Relation::AtMost => model.set_atmost(vars, constraint.rhs),
            };
            constraint_ids.push(constraint_id);
        }

        let root = model.set_and(constraint_ids);
        Ok((model, root))
    }
}

impl SolveOracle for PldagOracle {
    fn name(&self) -> &str {
        "pldag"
    }

    fn solve(&self, program: &IntegerProgram) -> Result<OracleOutcome> {
        let (model, root) = Self::build_model(program)?;

        let objective: HashMap<&str, f64> = program
            .variables()
            .iter()
            .map(|v| (v.name.as_str(), v.cost as f64))
            .collect();

        log::debug!("Using pldag to solve");
        let solutions = model.solve(
            vec![objective],
            HashMap::from_iter(vec![(root.as_str(), (1, 1))]),
            false,
        );

        translate_solutions(program, solutions)
    }
}

/// Map pldag's answer for the single objective onto an [`OracleOutcome`].
///
/// pldag only hands back an assignment for an optimal GLPK status and `None`
/// for everything else, so infeasible and undefined outcomes cannot be told
/// apart here. They are reported as [`NO_OPTIMAL_SOLUTION`].
fn translate_solutions(
    program: &IntegerProgram,
    solutions: std::result::Result<Vec<Option<Assignment>>, String>,
) -> Result<OracleOutcome> {
    let solutions = solutions.map_err(AssignError::Oracle)?;

    match solutions.into_iter().next() {
        Some(Some(solution)) => {
            let index_by_name: HashMap<&str, usize> = program
                .variables()
                .iter()
                .map(|v| (v.name.as_str(), v.id.0))
                .collect();

            let mut values = vec![0.0; program.variables().len()];
            for (pldag_id, (value, _)) in solution {
                if let Some(&index) = index_by_name.get(pldag_id.as_str()) {
                    values[index] = value as f64;
                }
            }
            Ok(OracleOutcome::optimal(values))
        }
        Some(None) => Ok(OracleOutcome::unsolved(NO_OPTIMAL_SOLUTION)),
        None => Err(AssignError::Oracle(
            "pldag returned no result for the objective".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundMode, Diagnostics, PreferenceTable, Rank, SolveStatus, WeightTable};

    fn two_by_two() -> IntegerProgram {
        let mut table = PreferenceTable::new(
            vec![("A".to_string(), 1), ("B".to_string(), 1)],
            vec![("X".to_string(), 1), ("Y".to_string(), 1)],
            WeightTable::default(),
        );
        table.record(0, 0, Rank::HighlyPreferred);
        table.record(0, 1, Rank::Neutral);
        table.record(1, 0, Rank::Preferred);
        table.record(1, 1, Rank::HighlyPreferred);
        crate::logic::build_program(&table, BoundMode::Equal, &mut Diagnostics::new())
    }

    #[test]
    fn test_solution_values_follow_variable_order() {
        let program = two_by_two();
        let solution: Assignment = vec![
            ("x_p1_a1".to_string(), (1, 1)),
            ("x_p0_a0".to_string(), (1, 1)),
            ("x_p0_a1".to_string(), (0, 0)),
            ("x_p1_a0".to_string(), (0, 0)),
            ("composite".to_string(), (1, 1)),
        ]
        .into_iter()
        .collect();

        let outcome = translate_solutions(&program, Ok(vec![Some(solution)])).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.values, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_solution_is_not_called_infeasible() {
        let program = two_by_two();
        let outcome = translate_solutions(&program, Ok(vec![None])).unwrap();
        assert!(!outcome.status.is_optimal());
        assert_eq!(
            outcome.status,
            SolveStatus::Other(NO_OPTIMAL_SOLUTION.to_string())
        );
        assert!(outcome.values.is_empty());
    }

    #[test]
    fn test_solver_errors_become_oracle_errors() {
        let program = two_by_two();
        match translate_solutions(&program, Err("glpk failed".to_string())) {
            Err(AssignError::Oracle(message)) => assert_eq!(message, "glpk failed"),
            other => panic!("expected an oracle error, got {:?}", other),
        }
        assert!(matches!(
            translate_solutions(&program, Ok(Vec::new())),
            Err(AssignError::Oracle(_))
        ));
    }
}
