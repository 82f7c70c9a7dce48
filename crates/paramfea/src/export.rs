//! Results table export
//!
//! Serializes a finished `ResultsTable` to CSV, JSON lines or JSON. Every
//! format carries the same columns: parameters, outputs, `status`,
//! `error_detail` and `solve_seconds`.

use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use paramfea_core::error::ExportError;
use paramfea_core::model::{Cell, ResultsTable, RunStatus, TabularData};
use serde_json::{Map, Value};

use crate::util::io::atomic_write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// One JSON object per row
    JsonLines,
    /// A single JSON array of row objects
    Json,
}

impl ExportFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::JsonLines => "jsonl",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "jsonl" | "ndjson" | "json_lines" | "jsonlines" => Ok(ExportFormat::JsonLines),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Which rows to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowFilter {
    #[default]
    All,
    Only(RunStatus),
}

/// Render a table in the given format
pub fn render(
    table: &ResultsTable,
    format: ExportFormat,
    filter: RowFilter,
) -> Result<String, ExportError> {
    let data = match filter {
        RowFilter::All => table.to_tabular(),
        RowFilter::Only(status) => table.to_tabular_with_status(status),
    };
    match format {
        ExportFormat::Csv => Ok(to_csv(&data)),
        ExportFormat::JsonLines => to_json_lines(&data),
        ExportFormat::Json => to_json(&data),
    }
}

/// Write a table to `path`. The format defaults to the one implied by the extension.
pub fn export_table(
    table: &ResultsTable,
    path: &Path,
    format: Option<ExportFormat>,
    filter: RowFilter,
) -> Result<(), ExportError> {
    let format = match format {
        Some(format) => format,
        None => ExportFormat::from_path(path)?,
    };
    let content = render(table, format, filter)?;
    atomic_write(path, &content).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        format = format.extension(),
        "Exported results table"
    );
    Ok(())
}

fn to_csv(data: &TabularData) -> String {
    let mut out = String::new();
    write_csv_record(&mut out, data.columns.iter().map(String::as_str));
    for row in &data.rows {
        let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
        write_csv_record(&mut out, cells.iter().map(String::as_str));
    }
    out
}

fn write_csv_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

fn record_object(record: Vec<(&str, &Cell)>) -> Result<Value, ExportError> {
    let mut object = Map::with_capacity(record.len());
    for (column, cell) in record {
        let value = serde_json::to_value(cell).map_err(|e| ExportError::Serialize(e.to_string()))?;
        object.insert(column.to_string(), value);
    }
    Ok(Value::Object(object))
}

fn to_json_lines(data: &TabularData) -> Result<String, ExportError> {
    let mut out = String::new();
    for record in data.records() {
        let line = serde_json::to_string(&record_object(record)?)
            .map_err(|e| ExportError::Serialize(e.to_string()))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

fn to_json(data: &TabularData) -> Result<String, ExportError> {
    let records = data
        .records()
        .map(record_object)
        .collect::<Result<Vec<_>, _>>()?;
    serde_json::to_string_pretty(&Value::Array(records))
        .map_err(|e| ExportError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_table;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_name_and_path() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            ExportFormat::from_path(Path::new("out/results.jsonl")).unwrap(),
            ExportFormat::JsonLines
        );
        assert!(matches!(
            "pickle".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(name)) if name == "pickle"
        ));
        assert!(matches!(
            ExportFormat::from_path(Path::new("results")),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let table = sample_table();
        let csv = render(&table, ExportFormat::Csv, RowFilter::All).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "A.x,B.y,max(vonMises),max(DisplacementLengths),status,error_detail,solve_seconds"
        );
        assert_eq!(lines.len(), 1 + 6);
        assert!(lines[1].starts_with("1,10,22,0.11,ok,,"));
        // Failed row: empty outputs, message kept
        assert!(lines[3].starts_with("1,30,,,failed,\"B.y out of range, max 25\","));
    }

    #[test]
    fn test_json_lines_one_object_per_row() {
        let table = sample_table();
        let jsonl = render(&table, ExportFormat::JsonLines, RowFilter::All).unwrap();

        let rows: Vec<Value> = jsonl
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["A.x"], Value::from(1.0));
        assert_eq!(rows[0]["status"], Value::from("ok"));
        assert_eq!(rows[2]["max(vonMises)"], Value::Null);
        assert_eq!(rows[2]["error_detail"], Value::from("B.y out of range, max 25"));
    }

    #[test]
    fn test_json_filtered_to_failures() {
        let table = sample_table();
        let json =
            render(&table, ExportFormat::Json, RowFilter::Only(RunStatus::Failed)).unwrap();

        let rows: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r["status"] == "failed"));
    }

    #[test]
    fn test_export_table_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let table = sample_table();

        export_table(&table, &path, None, RowFilter::All).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, render(&table, ExportFormat::Csv, RowFilter::All).unwrap());
    }

    #[test]
    fn test_export_unknown_extension_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.pkl");

        let err = export_table(&sample_table(), &path, None, RowFilter::All).unwrap_err();

        assert!(matches!(err, ExportError::UnknownFormat(_)));
        assert!(!path.exists());
    }
}
