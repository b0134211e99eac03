use std::fs;
use std::path::Path;

use anyhow::Result;
use colored::{ColoredString, Colorize};

use crate::classifier::CheckOutcome;

const HEADERS: [&str; 4] = ["Subdomain", "CNAME", "Provider", "Status"];

pub fn print_table(results: &[CheckOutcome]) {
    print!("{}", render_table(results));
}

/// Aligned table, one row per outcome. Column widths are computed on plain
/// cells; color is applied to the status cell afterwards so escape codes
/// never skew the layout.
pub fn render_table(results: &[CheckOutcome]) -> String {
    let rows: Vec<[String; 4]> = results.iter().map(row_cells).collect();

    let mut widths: [usize; 4] = [0; 4];
    for (width, header) in widths.iter_mut().zip(HEADERS) {
        *width = header.len();
    }
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {}\n",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        HEADERS[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    ));
    out.push_str(&format!(
        "{}  {}  {}  {}\n",
        "-".repeat(widths[0]),
        "-".repeat(widths[1]),
        "-".repeat(widths[2]),
        "-".repeat(widths[3]),
    ));
    for (outcome, row) in results.iter().zip(&rows) {
        out.push_str(&format!(
            "{:<w0$}  {:<w1$}  {:<w2$}  {}\n",
            row[0],
            row[1],
            row[2],
            colorize_status(&row[3], outcome),
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        ));
    }
    out
}

/// One comma-joined line per outcome: subdomain, CNAME or "-", provider or
/// "-", status label. Embedded commas in the error text are not escaped;
/// the flat format is comma-joined as-is.
pub fn delimited_line(outcome: &CheckOutcome) -> String {
    row_cells(outcome).join(",")
}

/// Single write once the full run has completed.
pub fn write_delimited(path: &Path, results: &[CheckOutcome]) -> Result<()> {
    let mut contents = String::new();
    for outcome in results {
        contents.push_str(&delimited_line(outcome));
        contents.push('\n');
    }
    fs::write(path, contents)?;
    Ok(())
}

fn row_cells(outcome: &CheckOutcome) -> [String; 4] {
    [
        outcome.subdomain().to_string(),
        outcome.cname().unwrap_or("-").to_string(),
        outcome.provider().unwrap_or("-").to_string(),
        outcome.status_label(),
    ]
}

fn colorize_status(label: &str, outcome: &CheckOutcome) -> ColoredString {
    match outcome {
        CheckOutcome::Matched { .. } => label.yellow(),
        CheckOutcome::Safe { .. } => label.green(),
        CheckOutcome::NoRecord { .. } => label.blue(),
        CheckOutcome::NotFound { .. } => label.red(),
        CheckOutcome::LookupFailed { .. } => label.magenta(),
    }
}
