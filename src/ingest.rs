//! Reads uploaded operational data files into record batches.

use std::fs::File;
use std::path::Path;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::record::{FieldValue, RawRecord};

pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Csv,
    Json,
}

impl UploadKind {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(UploadKind::Csv),
            Some("json") => Ok(UploadKind::Json),
            _ => Err(AppError::validation_with_details(
                format!(
                    "unsupported file type for {}; upload a .csv or .json file",
                    source_name(path)
                ),
                serde_json::json!({ "accepted": ACCEPTED_EXTENSIONS }),
            )),
        }
    }
}

/// File name used in titles and error messages.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads every data row of a `.csv` or `.json` upload.
pub fn read_batch(path: &Path) -> AppResult<Vec<RawRecord>> {
    let kind = UploadKind::from_path(path)?;
    let name = source_name(path);
    let file = File::open(path)
        .map_err(|err| AppError::ingest(name.clone(), format!("cannot open file: {err}")))?;

    let batch = match kind {
        UploadKind::Csv => read_csv(file, &name)?,
        UploadKind::Json => read_json(file, &name)?,
    };

    info!(target: "app::ingest", source = %name, rows = batch.len(), "upload parsed");
    Ok(batch)
}

pub fn read_csv<R: std::io::Read>(reader: R, name: &str) -> AppResult<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|err| AppError::ingest(name, format!("unreadable header row: {err}")))?
        .clone();

    let mut batch = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let row = result.map_err(|err| {
            let line = err
                .position()
                .map(|position| position.line())
                .unwrap_or(index as u64 + 2);
            AppError::ingest(name, format!("row {line} is malformed: {err}"))
        })?;

        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(label, cell)| !label.is_empty() && !cell.is_empty())
            .map(|(label, cell)| (label.to_string(), cell_value(cell)))
            .collect();

        if record.is_empty() {
            debug!(target: "app::ingest", source = %name, row = index + 2, "skipping blank row");
            continue;
        }
        batch.push(record);
    }

    Ok(batch)
}

pub fn read_json<R: std::io::Read>(reader: R, name: &str) -> AppResult<Vec<RawRecord>> {
    let value: JsonValue = serde_json::from_reader(reader)
        .map_err(|err| AppError::ingest(name, format!("invalid JSON: {err}")))?;

    let rows = match value {
        JsonValue::Array(rows) => rows,
        JsonValue::Object(_) => vec![value],
        _ => {
            return Err(AppError::ingest(
                name,
                "expected an array of objects or a single object",
            ))
        }
    };

    let mut batch = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let JsonValue::Object(map) = row else {
            return Err(AppError::ingest(
                name,
                format!("entry {} is not an object", index + 1),
            ));
        };

        let record: RawRecord = map
            .into_iter()
            .filter_map(|(label, value)| {
                let value = match value {
                    JsonValue::Number(number) => FieldValue::Number(number.as_f64()?),
                    JsonValue::String(text) => FieldValue::Text(text),
                    _ => return None,
                };
                Some((label, value))
            })
            .collect();

        if !record.is_empty() {
            batch.push(record);
        }
    }

    Ok(batch)
}

fn cell_value(cell: &str) -> FieldValue {
    match cell.parse::<f64>() {
        Ok(number) if number.is_finite() => FieldValue::Number(number),
        _ => FieldValue::Text(cell.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn csv_rows_become_records() {
        let data = "Electricity usage, Diesel usage ,Notes\n18000,1200,first shift\n20000,,\n,,\n";
        let batch = read_csv(data.as_bytes(), "march.csv").expect("parse csv");

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch[0],
            RawRecord::new()
                .with("Electricity usage", 18_000.0)
                .with("Diesel usage", 1_200.0)
                .with("Notes", "first shift")
        );
        assert_eq!(batch[1], RawRecord::new().with("Electricity usage", 20_000.0));
    }

    #[test]
    fn short_csv_rows_are_accepted() {
        let data = "Electricity usage,Coal usage\n15000\n";
        let batch = read_csv(data.as_bytes(), "short.csv").expect("parse csv");
        assert_eq!(batch, vec![RawRecord::new().with("Electricity usage", 15_000.0)]);
    }

    #[test]
    fn json_accepts_arrays_and_single_objects() {
        let array = r#"[{"Electricity usage": 18000, "Coal usage": "2.5", "audited": true}]"#;
        let batch = read_json(array.as_bytes(), "data.json").expect("parse array");
        assert_eq!(
            batch,
            vec![RawRecord::new()
                .with("Electricity usage", 18_000.0)
                .with("Coal usage", "2.5")]
        );

        let single = r#"{"Water usage": 250000}"#;
        let batch = read_json(single.as_bytes(), "data.json").expect("parse object");
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn json_scalars_are_rejected() {
        let err = read_json("42".as_bytes(), "data.json").expect_err("scalar input");
        assert!(matches!(err, AppError::Ingest { ref source_name, .. } if source_name == "data.json"));
    }

    #[test]
    fn unsupported_extensions_are_validation_errors() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("data.xlsx");
        fs::write(&path, b"not parsed").expect("write file");

        let err = read_batch(&path).expect_err("xlsx rejected");
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains(".csv or .json"));
    }

    #[test]
    fn read_batch_dispatches_on_extension_case_insensitively() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("MAY.CSV");
        fs::write(&path, "Electricity usage\n12000\n").expect("write file");

        let batch = read_batch(&path).expect("read csv");
        assert_eq!(batch, vec![RawRecord::new().with("Electricity usage", 12_000.0)]);
    }
}
