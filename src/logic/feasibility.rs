use crate::error::{AssignError, Result};
use crate::model::{BoundMode, DiagnosticKind, Diagnostics, PreferenceTable};

/// Conditions under which the program cannot have a solution, whatever the
/// preferences are.
pub fn infeasibility_reasons(table: &PreferenceTable, bounds: BoundMode) -> Vec<String> {
    let mut reasons = Vec::new();
    let required = table.total_required();
    let capacity = table.total_capacity();

    if !bounds.admits(required, capacity) {
        let relation = match bounds {
            BoundMode::Equal => "equal",
            BoundMode::Lower => "be at least",
            BoundMode::Upper => "be at most",
        };
        reasons.push(format!(
            "persons require {} placements in total, which must {} the total capacity {} under '{}' bounds",
            required, relation, capacity, bounds
        ));
    }

    let assignment_count = table.assignments().len();
    for person in table.persons() {
        if person.required as usize > assignment_count {
            reasons.push(format!(
                "person '{}' requires {} assignments but only {} exist",
                person.name, person.required, assignment_count
            ));
        }
    }

    reasons
}

/// Report totals that cannot be satisfied. With `strict` the first problem
/// is an error; otherwise problems become warnings and solving proceeds.
pub fn check_totals(
    table: &PreferenceTable,
    bounds: BoundMode,
    strict: bool,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let reasons = infeasibility_reasons(table, bounds);
    if strict {
        if let Some(reason) = reasons.into_iter().next() {
            return Err(AssignError::InfeasibleByConstruction(reason));
        }
        return Ok(());
    }

    for reason in reasons {
        diagnostics.warn(DiagnosticKind::CapacityMismatch, reason);
    }
    Ok(())
}
