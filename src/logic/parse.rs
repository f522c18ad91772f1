use crate::error::{AssignError, Result};
use crate::logic::disambiguate;
use crate::model::{Diagnostics, PreferenceTable, Rank, WeightTable};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Label of the optional per-person count row and per-assignment count column.
pub const COUNTS_LABEL: &str = "Counts";

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// The table has no `Counts` row/column; every count is 1
    pub no_custom_counts: bool,
    pub weights: WeightTable,
}

impl ParseOptions {
    /// Index of the first person column.
    fn offset(&self) -> usize {
        if self.no_custom_counts {
            1
        } else {
            2
        }
    }
}

/// A data row together with its 1-based line in the source.
struct Row {
    line: usize,
    record: StringRecord,
}

impl Row {
    fn cell(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or("")
    }
}

pub fn parse_table_from_path(
    path: impl AsRef<Path>,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) -> Result<PreferenceTable> {
    let file = File::open(path.as_ref())?;
    parse_table(file, options, diagnostics)
}

/// Parse the canonical preference table.
///
/// Layout with counts:
///
/// ```text
/// Assignment,Counts,Ann,Bo
/// Counts,,1,2
/// Desk,2,1,3
/// Lab,1,4,2
/// ```
///
/// Without counts the `Counts` column and row are absent. Person and
/// assignment labels are disambiguated independently.
pub fn parse_table<R: Read>(
    reader: R,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) -> Result<PreferenceTable> {
    let mut rows = read_rows(reader)?.into_iter();
    let offset = options.offset();

    let header = rows
        .next()
        .ok_or_else(|| AssignError::EmptyTable("missing header row".to_string()))?;
    if header.record.len() <= offset {
        return Err(AssignError::EmptyTable("no person columns".to_string()));
    }
    let width = header.record.len();
    let raw_persons: Vec<&str> = header.record.iter().skip(offset).collect();

    let rows: Vec<Row> = rows.collect();
    for row in &rows {
        if row.record.len() != width {
            return Err(AssignError::TableShape {
                line: row.line,
                expected: width,
                found: row.record.len(),
            });
        }
    }

    let (person_counts, assignment_rows) = if options.no_custom_counts {
        (vec![1; raw_persons.len()], &rows[..])
    } else {
        let counts_row = rows
            .first()
            .ok_or_else(|| AssignError::EmptyTable("missing counts row".to_string()))?;
        let counts = raw_persons
            .iter()
            .enumerate()
            .map(|(i, person)| {
                let column = offset + i;
                parse_count(counts_row, column, &column_label(column, person), 1)
            })
            .collect::<Result<Vec<u32>>>()?;
        (counts, &rows[1..])
    };

    if assignment_rows.is_empty() {
        return Err(AssignError::EmptyTable("no assignment rows".to_string()));
    }

    let raw_assignments: Vec<&str> = assignment_rows.iter().map(|row| row.cell(0)).collect();
    let assignments = disambiguate(&raw_assignments, "assignment", diagnostics);
    let persons = disambiguate(&raw_persons, "person", diagnostics);

    let capacities = assignment_rows
        .iter()
        .map(|row| {
            if options.no_custom_counts {
                Ok(1)
            } else {
                parse_count(row, 1, &column_label(1, COUNTS_LABEL), 0)
            }
        })
        .collect::<Result<Vec<u32>>>()?;

    let mut table = PreferenceTable::new(
        persons.into_iter().zip(person_counts).collect(),
        assignments.into_iter().zip(capacities).collect(),
        options.weights,
    );

    for (assignment, row) in assignment_rows.iter().enumerate() {
        log::debug!("Working on line {}: {:?}", row.line, row.record);
        for person in 0..table.persons().len() {
            let column = offset + person;
            let rank = parse_rank(row, column, &column_label(column, raw_persons[person]))?;
            table.record(person, assignment, rank);
        }
    }

    log::info!("Number of persons {}", table.persons().len());
    log::info!("Number of assignments {}", table.assignments().len());
    Ok(table)
}

fn read_rows<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);
        rows.push(Row { line, record });
    }
    Ok(rows)
}

fn column_label(index: usize, name: &str) -> String {
    format!("{} ({})", index + 1, name)
}

fn parse_count(row: &Row, column: usize, label: &str, minimum: u32) -> Result<u32> {
    let cell = row.cell(column);
    cell.parse::<u32>()
        .ok()
        .filter(|count| *count >= minimum)
        .ok_or_else(|| AssignError::InvalidCount {
            line: row.line,
            column: label.to_string(),
            value: cell.to_string(),
        })
}

fn parse_rank(row: &Row, column: usize, label: &str) -> Result<Rank> {
    let cell = row.cell(column);
    cell.parse::<i64>()
        .ok()
        .and_then(Rank::from_value)
        .ok_or_else(|| AssignError::InvalidPreferenceValue {
            line: row.line,
            column: label.to_string(),
            value: cell.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiagnosticKind;

    const WITH_COUNTS: &str = "\
Assignment,Counts,Ann,Bo,Cy
Counts,,1,2,1
Desk,2,1,3,4
Lab,1,4,2,1
Field,1,2,1,3
";

    const WITHOUT_COUNTS: &str = "\
Assignment,A,B
X,1,2
Y,3,4
";

    fn parse(input: &str, no_custom_counts: bool) -> Result<(PreferenceTable, Diagnostics)> {
        let mut diagnostics = Diagnostics::new();
        let options = ParseOptions {
            no_custom_counts,
            ..Default::default()
        };
        parse_table(input.as_bytes(), &options, &mut diagnostics).map(|t| (t, diagnostics))
    }

    #[test]
    fn test_parse_with_counts() {
        let (table, diagnostics) = parse(WITH_COUNTS, false).unwrap();
        assert!(diagnostics.is_empty());

        assert_eq!(table.counts_by_person(), vec![("Ann", 1), ("Bo", 2), ("Cy", 1)]);
        assert_eq!(
            table.counts_by_assignment(),
            vec![("Desk", 2), ("Lab", 1), ("Field", 1)]
        );

        let bo = table.person(1);
        let ranks: Vec<u8> = bo.preferences.iter().map(|p| p.rank.value()).collect();
        assert_eq!(ranks, vec![3, 2, 1]);
        let weights: Vec<u64> = bo.preferences.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![100, 4, 1]);

        let desk = table.assignment(0);
        let weights: Vec<u64> = desk.preferences.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![1, 100, 10000]);
    }

    #[test]
    fn test_parse_without_counts() {
        let (table, _) = parse(WITHOUT_COUNTS, true).unwrap();
        assert_eq!(table.counts_by_person(), vec![("A", 1), ("B", 1)]);
        assert_eq!(table.counts_by_assignment(), vec![("X", 1), ("Y", 1)]);
        assert_eq!(table.person(1).preferences[1].rank, Rank::Unwilling);
    }

    #[test]
    fn test_density_invariant() {
        let (table, _) = parse(WITH_COUNTS, false).unwrap();
        assert!(table.is_dense());
        for person in table.persons() {
            assert_eq!(person.preferences.len(), table.assignments().len());
        }
        for assignment in table.assignments() {
            assert_eq!(assignment.preferences.len(), table.persons().len());
        }
    }

    #[test]
    fn test_duplicate_names_are_disambiguated() {
        let input = "\
Assignment,Counts,Sam,Sam
Counts,,1,1
Desk,1,1,2
Desk,1,2,1
";
        let (table, diagnostics) = parse(input, false).unwrap();
        let persons: Vec<&str> = table.persons().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(persons, vec!["Sam_2", "Sam"]);
        let assignments: Vec<&str> = table.assignments().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(assignments, vec!["Desk_2", "Desk"]);
        assert_eq!(
            diagnostics.of_kind(DiagnosticKind::DuplicateLabel).count(),
            2
        );
    }

    #[test]
    fn test_invalid_rank() {
        let input = "Assignment,A,B\nX,1,5\n";
        match parse(input, true) {
            Err(AssignError::InvalidPreferenceValue { line, column, value }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "3 (B)");
                assert_eq!(value, "5");
            }
            other => panic!("expected InvalidPreferenceValue, got {:?}", other.map(|_| ())),
        }

        let input = "Assignment,A\nX,\n";
        assert!(matches!(
            parse(input, true),
            Err(AssignError::InvalidPreferenceValue { .. })
        ));

        let input = "Assignment,A\nX,1.5\n";
        assert!(matches!(
            parse(input, true),
            Err(AssignError::InvalidPreferenceValue { .. })
        ));
    }

    #[test]
    fn test_invalid_counts() {
        let input = "Assignment,Counts,A\nCounts,,two\nX,1,1\n";
        match parse(input, false) {
            Err(AssignError::InvalidCount { line, value, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "two");
            }
            other => panic!("expected InvalidCount, got {:?}", other.map(|_| ())),
        }

        // Person counts are positive
        let input = "Assignment,Counts,A\nCounts,,0\nX,1,1\n";
        assert!(matches!(parse(input, false), Err(AssignError::InvalidCount { .. })));

        // Capacities may be zero but not negative
        let input = "Assignment,Counts,A\nCounts,,1\nX,0,1\nY,1,1\n";
        assert!(parse(input, false).is_ok());
        let input = "Assignment,Counts,A\nCounts,,1\nX,-1,1\n";
        assert!(matches!(parse(input, false), Err(AssignError::InvalidCount { .. })));
    }

    #[test]
    fn test_empty_tables() {
        assert!(matches!(parse("", true), Err(AssignError::EmptyTable(_))));
        assert!(matches!(
            parse("Assignment\nX\n", true),
            Err(AssignError::EmptyTable(_))
        ));
        assert!(matches!(
            parse("Assignment,A,B\n", true),
            Err(AssignError::EmptyTable(_))
        ));
        assert!(matches!(
            parse("Assignment,Counts,A\nCounts,,1\n", false),
            Err(AssignError::EmptyTable(_))
        ));
    }

    #[test]
    fn test_ragged_row() {
        let input = "Assignment,A,B\nX,1,2\nY,1\n";
        match parse(input, true) {
            Err(AssignError::TableShape { line, expected, found }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected TableShape, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_whitespace_and_blank_lines() {
        let input = "Assignment, A , B\n X , 1 , 2 \n\n,,\nY,2,1\n";
        let (table, _) = parse(input, true).unwrap();
        assert_eq!(table.person(0).name, "A");
        assert_eq!(table.assignment(0).name, "X");
        assert_eq!(table.assignments().len(), 2);
    }
}
