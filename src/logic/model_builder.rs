use crate::model::{
    BoundMode, ConstraintFamily, DiagnosticKind, Diagnostics, IntegerProgram, LinearConstraint,
    PreferenceTable, Rank, Relation, VariableId,
};

pub fn variable_name(person: usize, assignment: usize) -> String {
    format!("x_p{}_a{}", person, assignment)
}

/// Build the assignment program for a parsed table.
///
/// Variables are created person by person, each in assignment order, one per
/// recorded preference. Constraints follow the same order: one saturation
/// equality per person, then one capacity constraint per assignment whose
/// relation is chosen by `bounds`.
pub fn build_program(
    table: &PreferenceTable,
    bounds: BoundMode,
    diagnostics: &mut Diagnostics,
) -> IntegerProgram {
    check_weight_dominance(table, diagnostics);

    let mut program = IntegerProgram::new();
    let mut by_assignment: Vec<Vec<VariableId>> = vec![Vec::new(); table.assignments().len()];

    log::debug!("Creating variables");
    for (person_index, person) in table.persons().iter().enumerate() {
        for preference in &person.preferences {
            let id = program.add_variable(
                variable_name(person_index, preference.target),
                person_index,
                preference.target,
                preference.weight,
            );
            by_assignment[preference.target].push(id);
        }
    }

    for (person_index, person) in table.persons().iter().enumerate() {
        program.add_constraint(LinearConstraint {
            name: format!("person[{}]", person.name),
            family: ConstraintFamily::PersonSaturation,
            owner: person_index,
            variables: program.variables_of_person(person_index).to_vec(),
            relation: Relation::Equal,
            rhs: person.required as i64,
        });
    }

    let relation = Relation::from(bounds);
    for ((assignment_index, assignment), variables) in
        table.assignments().iter().enumerate().zip(by_assignment)
    {
        program.add_constraint(LinearConstraint {
            name: format!("assignment[{}]", assignment.name),
            family: ConstraintFamily::AssignmentCapacity,
            owner: assignment_index,
            variables,
            relation,
            rhs: assignment.capacity as i64,
        });
    }

    log::debug!(
        "Created {} variables and {} constraints",
        program.variables().len(),
        program.constraints().len()
    );
    program
}

/// Warn when the unwilling tier no longer outweighs every combination of
/// neutral placements.
fn check_weight_dominance(table: &PreferenceTable, diagnostics: &mut Diagnostics) {
    let used = table.used_ranks();
    let max_count = table.total_required();

    for violation in table.weights().dominance_violations(max_count, &used) {
        let message = format!(
            "Cost {} of rank {} does not exceed {} placements at rank {} (total {})",
            violation.higher_cost, violation.higher, max_count, violation.lower, violation.lower_total
        );
        if violation.higher == Rank::Unwilling {
            diagnostics.warn(DiagnosticKind::WeightDominance, message);
        } else {
            log::debug!("{}", message);
        }
    }
}
