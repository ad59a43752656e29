//! CSV, JSON and console renderings of extraction records.

use std::fmt::Write as _;
use std::fs::File;
use std::io;
use std::path::Path;

use ccparse_core::{ExtractionResult, Field};

/// Write records as CSV. Absent values become empty cells.
pub fn write_csv<W: io::Write>(writer: W, records: &[ExtractionResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    if records.is_empty() {
        wtr.write_record(Field::ALL.iter().map(|f| f.as_str()))?;
    }
    for record in records {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, records: &[ExtractionResult]) -> anyhow::Result<()> {
    write_csv(File::create(path)?, records)
}

/// Write records as a pretty-printed JSON array. Absent values become `null`.
pub fn write_json_file(path: &Path, records: &[ExtractionResult]) -> anyhow::Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(records)?)?;
    Ok(())
}

/// Human readable block for one statement.
pub fn format_text(name: &str, result: &ExtractionResult) -> String {
    let mut out = format!("=== {} ===\n", name);

    for field in Field::ALL {
        let value = result.get(field).unwrap_or("not found");
        let _ = write!(out, "{:<26} {}", format!("{}:", field.label()), value);

        if field == Field::PaymentDueDate {
            if let Some(date) = result.payment_due_on() {
                let _ = write!(out, " ({})", date.format("%Y-%m-%d"));
            }
        }
        out.push('\n');
    }

    out
}
