use anyhow::{Context, Result};
use clap::Parser;
use pref_assign::logic::form_import::parse_capacities;
use pref_assign::logic::{import_form, write_canonical, FormImportOptions};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// Convert a survey export into the table read by pref-assign.
#[derive(Parser, Debug)]
#[command(name = "convert-form")]
struct Args {
    /// Survey export CSV, one row per respondent
    input: PathBuf,

    /// Output CSV in pref-assign format
    output: PathBuf,

    /// Columns before the respondent name column
    #[arg(long, default_value_t = 2)]
    skip_leading: usize,

    /// Columns after the last preference question
    #[arg(long, default_value_t = 2)]
    skip_trailing: usize,

    /// Capacity of every assignment without an override
    #[arg(long, default_value_t = 1)]
    capacity: u32,

    /// Per-assignment capacities, e.g. "Act=10,Bridge=7"
    #[arg(long, default_value = "")]
    capacities: String,
}

fn init_logging() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let args = Args::parse();
    let options = FormImportOptions {
        skip_leading: args.skip_leading,
        skip_trailing: args.skip_trailing,
        default_capacity: args.capacity,
        capacities: parse_capacities(&args.capacities)?,
    };

    let input = File::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let table = import_form(BufReader::new(input), &options)
        .with_context(|| format!("cannot convert {}", args.input.display()))?;

    let output = File::create(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    write_canonical(BufWriter::new(output), &table)?;

    log::info!(
        "Wrote {} assignments for {} persons to {}",
        table.assignments.len(),
        table.persons.len(),
        args.output.display()
    );
    Ok(())
}
