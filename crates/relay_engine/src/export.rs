use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::persist::{AtomicFileWriter, PersistError};

/// One table row flattened for export. `primary` is the row's first
/// extraction entry; the configured columns are looked up in it by key.
#[derive(Debug, Clone)]
pub struct ExportRow {
    pub display_name: String,
    pub status: String,
    pub error: Option<String>,
    pub primary: Option<Value>,
    pub line_item_count: usize,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_filename: String,
    /// (column header, key looked up in the row's primary entry)
    pub field_columns: Vec<(String, String)>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        // The default columns mirror the invoice table.
        let field_columns = [
            ("Vendor", "Vendor Account"),
            ("Category", "Debit_Account"),
            ("Amount", "Total"),
            ("Date", "Invoice Date"),
        ]
        .iter()
        .map(|(header, key)| ((*header).to_string(), (*key).to_string()))
        .collect();
        Self {
            output_filename: "export.csv".to_string(),
            field_columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub row_count: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Renders the rows as CSV and writes them atomically into `output_dir`.
pub fn build_csv_export(
    output_dir: &Path,
    rows: &[ExportRow],
    options: ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let mut buffer = String::new();
    buffer.push_str("File Name");
    for (header, _) in &options.field_columns {
        buffer.push(',');
        buffer.push_str(&csv_escape(header));
    }
    buffer.push_str(",Line Items,Status,Error\n");

    for row in rows {
        buffer.push_str(&csv_escape(&row.display_name));
        for (_, key) in &options.field_columns {
            buffer.push(',');
            let value = row
                .primary
                .as_ref()
                .and_then(|primary| primary.get(key))
                .map(display_value)
                .unwrap_or_default();
            buffer.push_str(&csv_escape(&value));
        }
        buffer.push(',');
        buffer.push_str(&row.line_item_count.to_string());
        buffer.push(',');
        buffer.push_str(&csv_escape(&row.status));
        buffer.push(',');
        buffer.push_str(&csv_escape(row.error.as_deref().unwrap_or_default()));
        buffer.push('\n');
    }

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let output_path = writer.write(&options.output_filename, &buffer)?;
    Ok(ExportSummary {
        row_count: rows.len(),
        output_path,
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
