use crate::error::Result;
use crate::model::{FinalAssignments, SolveReport};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const OUTPUT_HEADER: [&str; 3] = ["Person", "Assignment", "Preference"];

/// Write `Person,Assignment,Preference` rows, the preference being the rank.
pub fn write_assignments<W: Write>(writer: W, assignments: &FinalAssignments) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    log::debug!("Writing final assignments");
    csv_writer.write_record(OUTPUT_HEADER)?;
    for (person, assignment, rank) in assignments.rows() {
        let preference = rank.to_string();
        csv_writer.write_record([person, assignment, preference.as_str()])?;
        log::info!("Made assignment: {}, {}, {}", person, assignment, rank);
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_assignments_to_path(
    path: impl AsRef<Path>,
    assignments: &FinalAssignments,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_assignments(file, assignments)
}

pub fn write_report_to_path(path: impl AsRef<Path>, report: &SolveReport) -> anyhow::Result<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
