use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use matriarch_session::{DirectiveOutcome, ParamValue};
use matriarch_transport::PortInfo;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    direction: &'static str,
    index: usize,
    name: &'a str,
}

pub fn print_values(values: &[ParamValue], format: OutputFormat) {
    match format {
        OutputFormat::Json => values.iter().for_each(print_json),
        OutputFormat::Table => {
            let mut table = new_table(vec!["ID", "VALUE"]);
            for pv in values {
                table.add_row(vec![pv.id.to_string(), pv.value.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for pv in values {
                println!("ID {} is: {}", pv.id, pv.value);
            }
        }
        OutputFormat::Raw => {
            for pv in values {
                println!("{}={}", pv.id, pv.value);
            }
        }
    }
}

pub fn print_outcomes(outcomes: &[DirectiveOutcome], format: OutputFormat) {
    match format {
        OutputFormat::Json => outcomes.iter().for_each(print_json),
        OutputFormat::Table => {
            let mut table = new_table(vec!["ID", "PREVIOUS", "VALUE", "RESULT"]);
            for outcome in outcomes {
                table.add_row(vec![
                    outcome.id().to_string(),
                    previous_value(outcome).to_string(),
                    current_value(outcome),
                    outcome_label(outcome).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for outcome in outcomes {
                println!("{}", describe(outcome));
            }
        }
        OutputFormat::Raw => {
            for outcome in outcomes {
                println!(
                    "{}={} {}",
                    outcome.id(),
                    current_value(outcome),
                    outcome_label(outcome)
                );
            }
        }
    }
}

pub fn print_ports(inputs: &[PortInfo], outputs: &[PortInfo], format: OutputFormat) {
    let rows: Vec<PortOutput<'_>> = inputs
        .iter()
        .map(|info| ("input", info))
        .chain(outputs.iter().map(|info| ("output", info)))
        .map(|(direction, info)| PortOutput {
            direction,
            index: info.index,
            name: &info.name,
        })
        .collect();

    match format {
        OutputFormat::Json => rows.iter().for_each(print_json),
        OutputFormat::Table => {
            let mut table = new_table(vec!["DIRECTION", "INDEX", "NAME"]);
            for row in &rows {
                table.add_row(vec![
                    row.direction.to_string(),
                    row.index.to_string(),
                    row.name.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!("{:<6} {:>3}  {}", row.direction, row.index, row.name);
            }
        }
        OutputFormat::Raw => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn outcome_label(outcome: &DirectiveOutcome) -> &'static str {
    match outcome {
        DirectiveOutcome::Unchanged { .. } => "unchanged",
        DirectiveOutcome::Applied { .. } => "applied",
        DirectiveOutcome::VerificationMismatch { .. } => "mismatch",
        DirectiveOutcome::VerifyReadFailed { .. } => "unverified",
    }
}

fn previous_value(outcome: &DirectiveOutcome) -> u16 {
    match *outcome {
        DirectiveOutcome::Unchanged { value, .. } => value,
        DirectiveOutcome::Applied { previous, .. }
        | DirectiveOutcome::VerificationMismatch { previous, .. }
        | DirectiveOutcome::VerifyReadFailed { previous, .. } => previous,
    }
}

// Value last seen on the device after the directive ran.
fn current_value(outcome: &DirectiveOutcome) -> String {
    match *outcome {
        DirectiveOutcome::Unchanged { value, .. } | DirectiveOutcome::Applied { value, .. } => {
            value.to_string()
        }
        DirectiveOutcome::VerificationMismatch { actual, .. } => actual.to_string(),
        DirectiveOutcome::VerifyReadFailed { .. } => "?".to_string(),
    }
}

fn describe(outcome: &DirectiveOutcome) -> String {
    match outcome {
        DirectiveOutcome::Unchanged { id, value } => {
            format!("ID {id} unchanged: already {value}")
        }
        DirectiveOutcome::Applied {
            id,
            previous,
            value,
        } => format!("ID {id} set: {previous} -> {value} (verified)"),
        DirectiveOutcome::VerificationMismatch {
            id,
            previous,
            expected,
            actual,
        } => format!("ID {id} set: {previous} -> {expected}, read back {actual}"),
        DirectiveOutcome::VerifyReadFailed {
            id,
            previous,
            expected,
            error,
        } => format!("ID {id} set: {previous} -> {expected}, read back failed: {error}"),
    }
}
