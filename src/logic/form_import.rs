use crate::error::{AssignError, Result};
use crate::logic::parse::COUNTS_LABEL;
use crate::model::Rank;
use std::collections::HashMap;
use std::io::{Read, Write};

/// Answer labels used by the survey form. Bare digits are accepted as well.
const ANSWER_LABELS: [(&str, Rank); 4] = [
    ("very much preferred", Rank::HighlyPreferred),
    ("preferred", Rank::Preferred),
    ("neutral", Rank::Neutral),
    ("do not prefer", Rank::Unwilling),
];

#[derive(Debug, Clone)]
pub struct FormImportOptions {
    /// Columns dropped before the respondent name (e.g. timestamp, email)
    pub skip_leading: usize,
    /// Columns dropped at the end of each response
    pub skip_trailing: usize,
    pub default_capacity: u32,
    pub capacities: Vec<(String, u32)>,
}

impl Default for FormImportOptions {
    fn default() -> Self {
        Self {
            skip_leading: 2,
            skip_trailing: 2,
            default_capacity: 1,
            capacities: Vec::new(),
        }
    }
}

/// Preference table in canonical orientation: one row per assignment, one
/// rank per person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTable {
    pub persons: Vec<String>,
    pub assignments: Vec<(String, u32)>,
    /// `ranks[assignment][person]`
    pub ranks: Vec<Vec<Rank>>,
}

pub fn parse_answer(answer: &str) -> Option<Rank> {
    let answer = answer.trim();
    if let Ok(value) = answer.parse::<i64>() {
        return Rank::from_value(value);
    }
    let lowered = answer.to_lowercase();
    ANSWER_LABELS
        .iter()
        .find(|(label, _)| *label == lowered)
        .map(|(_, rank)| *rank)
}

/// Assignment name from a question header: the text inside the last
/// `[...]` if present, otherwise the whole header.
pub fn assignment_name(header: &str) -> String {
    let header = header.trim();
    if let (Some(open), Some(close)) = (header.rfind('['), header.rfind(']')) {
        if open < close {
            let inner = header[open + 1..close].trim();
            if !inner.is_empty() {
                return inner.to_string();
            }
        }
    }
    header.to_string()
}

/// Parse `Name=N,Other=M` capacity overrides.
pub fn parse_capacities(spec: &str) -> Result<Vec<(String, u32)>> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<(String, u32)> {
            let (name, count) = entry.rsplit_once('=').ok_or_else(|| {
                AssignError::InvalidCapacityOverride(format!("'{}' is not Name=N", entry))
            })?;
            let count = count.trim().parse::<u32>().map_err(|_| {
                AssignError::InvalidCapacityOverride(format!(
                    "'{}' has a non-integer capacity",
                    entry
                ))
            })?;
            Ok((name.trim().to_string(), count))
        })
        .collect()
}

/// Transpose a survey export into the canonical table.
pub fn import_form<R: Read>(reader: R, options: &FormImportOptions) -> Result<CanonicalTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let end = headers.len().saturating_sub(options.skip_trailing);
    if end <= options.skip_leading + 1 {
        return Err(AssignError::EmptyTable(format!(
            "export has {} columns, leaving no assignment questions",
            headers.len()
        )));
    }
    let name_column = options.skip_leading;
    let question_columns = name_column + 1..end;

    let assignment_names: Vec<String> = question_columns
        .clone()
        .map(|i| assignment_name(&headers[i]))
        .collect();

    let mut persons = Vec::new();
    let mut ranks: Vec<Vec<Rank>> = vec![Vec::new(); assignment_names.len()];

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        // +2: 1-based and the header line
        let line = row_idx + 2;
        if record.len() < end {
            return Err(AssignError::TableShape {
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }

        persons.push(record[name_column].to_string());
        for (question, column) in question_columns.clone().enumerate() {
            let answer = &record[column];
            let rank = parse_answer(answer).ok_or_else(|| AssignError::InvalidPreferenceValue {
                line,
                column: assignment_names[question].clone(),
                value: answer.to_string(),
            })?;
            ranks[question].push(rank);
        }
    }

    if persons.is_empty() {
        return Err(AssignError::EmptyTable("export has no responses".to_string()));
    }

    let overrides: HashMap<&str, u32> = options
        .capacities
        .iter()
        .map(|(name, count)| (name.as_str(), *count))
        .collect();
    if let Some((unknown, _)) = options
        .capacities
        .iter()
        .find(|(name, _)| !assignment_names.contains(name))
    {
        return Err(AssignError::InvalidCapacityOverride(format!(
            "no assignment named '{}'",
            unknown
        )));
    }

    let assignments = assignment_names
        .into_iter()
        .map(|name| {
            let capacity = overrides
                .get(name.as_str())
                .copied()
                .unwrap_or(options.default_capacity);
            (name, capacity)
        })
        .collect();

    log::info!("Imported {} responses", persons.len());
    Ok(CanonicalTable {
        persons,
        assignments,
        ranks,
    })
}

/// Write the table with its `Counts` row and column. Every person count is 1.
pub fn write_canonical<W: Write>(writer: W, table: &CanonicalTable) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["Assignment".to_string(), COUNTS_LABEL.to_string()];
    header.extend(table.persons.iter().cloned());
    csv_writer.write_record(&header)?;

    let mut counts = vec![COUNTS_LABEL.to_string(), String::new()];
    counts.extend(table.persons.iter().map(|_| "1".to_string()));
    csv_writer.write_record(&counts)?;

    for ((name, capacity), ranks) in table.assignments.iter().zip(&table.ranks) {
        let mut row = vec![name.clone(), capacity.to_string()];
        row.extend(ranks.iter().map(|rank| rank.to_string()));
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{parse_table, ParseOptions};
    use crate::model::Diagnostics;

    const EXPORT: &str = "\
Timestamp,Email,Name,Preference [Act],Preference [Bridge],Comments,Score
1/1,a@x,Ann,Very much preferred,Do not prefer,,
1/1,b@x,Bo,neutral,Preferred,hi,
";

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("Very much preferred"), Some(Rank::HighlyPreferred));
        assert_eq!(parse_answer(" preferred "), Some(Rank::Preferred));
        assert_eq!(parse_answer("NEUTRAL"), Some(Rank::Neutral));
        assert_eq!(parse_answer("Do not prefer"), Some(Rank::Unwilling));
        assert_eq!(parse_answer("3"), Some(Rank::Neutral));
        assert_eq!(parse_answer("7"), None);
        assert_eq!(parse_answer("Maybe"), None);
    }

    #[test]
    fn test_assignment_name() {
        assert_eq!(assignment_name("Preference [Act]"), "Act");
        assert_eq!(assignment_name("Rank [a] [ Tutoring ]"), "Tutoring");
        assert_eq!(assignment_name("Studrel"), "Studrel");
        assert_eq!(assignment_name("Empty []"), "Empty []");
    }

    #[test]
    fn test_parse_capacities() {
        assert_eq!(
            parse_capacities("Act=10, Bridge = 7").unwrap(),
            vec![("Act".to_string(), 10), ("Bridge".to_string(), 7)]
        );
        assert!(parse_capacities("").unwrap().is_empty());
        assert!(matches!(
            parse_capacities("Act"),
            Err(AssignError::InvalidCapacityOverride(_))
        ));
        assert!(matches!(
            parse_capacities("Act=many"),
            Err(AssignError::InvalidCapacityOverride(_))
        ));
    }

    #[test]
    fn test_import_transposes_responses() {
        let options = FormImportOptions {
            capacities: vec![("Bridge".to_string(), 2)],
            ..Default::default()
        };
        let table = import_form(EXPORT.as_bytes(), &options).unwrap();
        assert_eq!(table.persons, vec!["Ann", "Bo"]);
        assert_eq!(
            table.assignments,
            vec![("Act".to_string(), 1), ("Bridge".to_string(), 2)]
        );
        assert_eq!(table.ranks[0], vec![Rank::HighlyPreferred, Rank::Neutral]);
        assert_eq!(table.ranks[1], vec![Rank::Unwilling, Rank::Preferred]);
    }

    #[test]
    fn test_converted_table_parses() {
        let table = import_form(EXPORT.as_bytes(), &FormImportOptions::default()).unwrap();
        let mut buffer = Vec::new();
        write_canonical(&mut buffer, &table).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        assert_eq!(
            csv,
            "Assignment,Counts,Ann,Bo\nCounts,,1,1\nAct,1,1,3\nBridge,1,4,2\n"
        );

        let parsed =
            parse_table(csv.as_bytes(), &ParseOptions::default(), &mut Diagnostics::new()).unwrap();
        assert_eq!(parsed.persons().len(), 2);
        assert_eq!(parsed.assignments().len(), 2);
    }

    #[test]
    fn test_import_errors() {
        let bad_answer = "\
Timestamp,Email,Name,Preference [Act],Comments,Score
1/1,a@x,Ann,Sometimes,,
";
        match import_form(bad_answer.as_bytes(), &FormImportOptions::default()) {
            Err(AssignError::InvalidPreferenceValue { line, column, value }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "Act");
                assert_eq!(value, "Sometimes");
            }
            other => panic!("expected InvalidPreferenceValue, got {:?}", other),
        }

        let options = FormImportOptions {
            capacities: vec![("Nope".to_string(), 3)],
            ..Default::default()
        };
        assert!(matches!(
            import_form(EXPORT.as_bytes(), &options),
            Err(AssignError::InvalidCapacityOverride(_))
        ));

        let header_only = "Timestamp,Email,Name,Preference [Act],Comments,Score\n";
        assert!(matches!(
            import_form(header_only.as_bytes(), &FormImportOptions::default()),
            Err(AssignError::EmptyTable(_))
        ));

        let too_narrow = "Timestamp,Email,Name,Comments\n";
        assert!(matches!(
            import_form(too_narrow.as_bytes(), &FormImportOptions::default()),
            Err(AssignError::EmptyTable(_))
        ));
    }
}
