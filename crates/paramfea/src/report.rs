//! Plain-text rendering of sweep results for the terminal

use std::fmt::Write as _;

use paramfea_core::model::{ResultsTable, SweepSummary};

use crate::util::format::{format_duration, format_percentage, format_value};

/// Render the parameter matrix as an aligned text table.
///
/// Output columns are left out of dry runs since they are never populated.
/// At most `max_rows` rows are shown.
pub fn format_matrix(table: &ResultsTable, max_rows: Option<usize>) -> String {
    let show_outputs = !table.is_dry_run();

    let mut header = vec!["#".to_string()];
    header.extend(table.parameter_labels().iter().cloned());
    if show_outputs {
        header.extend(table.output_labels().iter().cloned());
    }
    header.push("status".to_string());

    let shown = max_rows.unwrap_or(usize::MAX).min(table.len());
    let rows: Vec<Vec<String>> = table
        .iter()
        .take(shown)
        .map(|row| {
            let mut cells = vec![row.index().to_string()];
            cells.extend(row.combination().values.iter().map(ToString::to_string));
            if show_outputs {
                cells.extend(
                    table
                        .output_labels()
                        .iter()
                        .map(|label| row.output(label).map(format_value).unwrap_or_default()),
                );
            }
            cells.push(row.status().to_string());
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &rule, &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    if shown < table.len() {
        let _ = writeln!(out, "... {} more rows", table.len() - shown);
    }
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// One-paragraph summary of a finished sweep
pub fn format_summary(summary: &SweepSummary) -> String {
    let mut out = format!("{summary}\n");
    if summary.failed > 0 {
        let _ = writeln!(out, "failure rate: {}", format_percentage(summary.failure_rate()));
    }
    let _ = writeln!(out, "elapsed: {}", format_duration(summary.elapsed_seconds));
    out
}

/// Failure messages, one line per failed run
pub fn format_failures(table: &ResultsTable) -> String {
    let mut out = String::new();
    for row in table.failed() {
        let _ = writeln!(
            out,
            "#{}: {}",
            row.index(),
            row.error_detail().unwrap_or("unknown error")
        );
    }
    out
}
