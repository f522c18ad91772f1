use crate::error::{AssignError, Result};
use crate::model::{
    is_one, DiagnosticKind, Diagnostics, FinalAssignments, IntegerProgram, OracleOutcome,
    PersonPlacements, Placement, PreferenceTable,
};

/// Read solved variables back into per-person placements.
///
/// A variable counts as chosen when its value is within tolerance of 1. Ranks
/// are recovered from each variable's cost through the table's weights. For an
/// optimal outcome, a person whose placement count differs from their quota is
/// an [`AssignError::InternalConsistency`]; for any other status the mismatch
/// is only recorded, since the values are best-effort.
pub fn extract_assignments(
    table: &PreferenceTable,
    program: &IntegerProgram,
    outcome: &OracleOutcome,
    diagnostics: &mut Diagnostics,
) -> Result<FinalAssignments> {
    let weights = table.weights();
    let mut persons = Vec::with_capacity(table.persons().len());

    for (person_index, person) in table.persons().iter().enumerate() {
        let mut placements = Vec::new();
        for id in program.variables_of_person(person_index) {
            if !is_one(outcome.value(id.0)) {
                continue;
            }
            let variable = program.variable(*id);
            let rank = weights.rank_for(variable.cost).ok_or_else(|| {
                AssignError::Oracle(format!(
                    "variable {} has cost {} with no matching rank",
                    variable.name, variable.cost
                ))
            })?;
            placements.push(Placement {
                assignment: table.assignment(variable.assignment).name.clone(),
                rank,
            });
        }

        if placements.len() != person.required as usize {
            if outcome.status.is_optimal() {
                return Err(AssignError::InternalConsistency {
                    person: person.name.clone(),
                    expected: person.required,
                    found: placements.len(),
                });
            }
            diagnostics.warn(
                DiagnosticKind::AssignmentCountMismatch,
                format!(
                    "Person {} received {} assignments instead of {} ({} solve)",
                    person.name,
                    placements.len(),
                    person.required,
                    outcome.status
                ),
            );
        }

        persons.push(PersonPlacements {
            person: person.name.clone(),
            placements,
        });
    }

    Ok(FinalAssignments { persons })
}
