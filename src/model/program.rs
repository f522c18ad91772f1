use crate::model::BoundMode;
use serde::Serialize;
use std::fmt;

/// Tolerance used when comparing solver values against integers.
pub const VALUE_TOLERANCE: f64 = 1e-6;

pub fn is_one(value: f64) -> bool {
    (value - 1.0).abs() <= VALUE_TOLERANCE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VariableId(pub usize);

/// Boolean variable meaning "person is placed in assignment".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionVariable {
    pub id: VariableId,
    pub name: String,
    pub person: usize,
    pub assignment: usize,
    /// Objective coefficient
    pub cost: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Equal,
    AtLeast,
    AtMost,
}

impl Relation {
    pub fn holds(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Relation::Equal => (lhs - rhs).abs() <= VALUE_TOLERANCE,
            Relation::AtLeast => lhs >= rhs - VALUE_TOLERANCE,
            Relation::AtMost => lhs <= rhs + VALUE_TOLERANCE,
        }
    }
}

impl From<BoundMode> for Relation {
    fn from(mode: BoundMode) -> Self {
        match mode {
            BoundMode::Equal => Relation::Equal,
            BoundMode::Lower => Relation::AtLeast,
            BoundMode::Upper => Relation::AtMost,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Equal => "==",
            Relation::AtLeast => ">=",
            Relation::AtMost => "<=",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintFamily {
    /// Sum of a person's variables equals their required count
    PersonSaturation,
    /// Sum of an assignment's variables relates to its capacity
    AssignmentCapacity,
}

/// `sum(variables) <relation> rhs`, every coefficient being 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinearConstraint {
    pub name: String,
    pub family: ConstraintFamily,
    /// Person or assignment index, depending on `family`
    pub owner: usize,
    pub variables: Vec<VariableId>,
    pub relation: Relation,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .map(|id| values.get(id.0).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn is_satisfied(&self, values: &[f64]) -> bool {
        self.relation.holds(self.lhs(values), self.rhs as f64)
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: sum({} vars) {} {}",
            self.name,
            self.variables.len(),
            self.relation,
            self.rhs
        )
    }
}

/// Minimisation program over boolean variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegerProgram {
    variables: Vec<DecisionVariable>,
    constraints: Vec<LinearConstraint>,
    #[serde(skip)]
    by_person: Vec<Vec<VariableId>>,
}

impl IntegerProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        person: usize,
        assignment: usize,
        cost: u64,
    ) -> VariableId {
        let id = VariableId(self.variables.len());
        self.variables.push(DecisionVariable {
            id,
            name: name.into(),
            person,
            assignment,
            cost,
        });
        if self.by_person.len() <= person {
            self.by_person.resize_with(person + 1, Vec::new);
        }
        self.by_person[person].push(id);
        id
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn variables(&self) -> &[DecisionVariable] {
        &self.variables
    }

    pub fn variable(&self, id: VariableId) -> &DecisionVariable {
        &self.variables[id.0]
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraints_of(
        &self,
        family: ConstraintFamily,
    ) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter().filter(move |c| c.family == family)
    }

    /// Variables of a person, in assignment order.
    pub fn variables_of_person(&self, person: usize) -> &[VariableId] {
        self.by_person
            .get(person)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .map(|v| v.cost as f64 * values.get(v.id.0).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn is_feasible(&self, values: &[f64]) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_program() -> IntegerProgram {
        let mut program = IntegerProgram::new();
        let a = program.add_variable("x_p0_a0", 0, 0, 1);
        let b = program.add_variable("x_p0_a1", 0, 1, 4);
        program.add_constraint(LinearConstraint {
            name: "person_0".to_string(),
            family: ConstraintFamily::PersonSaturation,
            owner: 0,
            variables: vec![a, b],
            relation: Relation::Equal,
            rhs: 1,
        });
        program.add_constraint(LinearConstraint {
            name: "assignment_1".to_string(),
            family: ConstraintFamily::AssignmentCapacity,
            owner: 1,
            variables: vec![b],
            relation: Relation::AtMost,
            rhs: 0,
        });
        program
    }

    #[test]
    fn test_objective_and_feasibility() {
        let program = tiny_program();
        assert_eq!(program.variables_of_person(0), &[VariableId(0), VariableId(1)]);
        assert!(program.variables_of_person(3).is_empty());

        assert!(program.is_feasible(&[1.0, 0.0]));
        assert!(!program.is_feasible(&[0.0, 1.0]));
        assert!(!program.is_feasible(&[1.0, 1.0]));
        assert_eq!(program.objective_value(&[1.0, 0.0]), 1.0);
        assert_eq!(program.objective_value(&[0.0, 1.0]), 4.0);
    }

    #[test]
    fn test_tolerance() {
        assert!(is_one(0.9999999));
        assert!(is_one(1.0000004));
        assert!(!is_one(0.99));
        assert!(Relation::Equal.holds(2.0000001, 2.0));
        assert!(Relation::AtLeast.holds(1.9999999, 2.0));
        assert!(!Relation::AtMost.holds(2.1, 2.0));
    }

    #[test]
    fn test_relation_from_bound_mode() {
        assert_eq!(Relation::from(BoundMode::Equal), Relation::Equal);
        assert_eq!(Relation::from(BoundMode::Lower), Relation::AtLeast);
        assert_eq!(Relation::from(BoundMode::Upper), Relation::AtMost);
        assert_eq!(Relation::AtLeast.to_string(), ">=");
    }
}
