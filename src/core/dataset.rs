use crate::domain::model::{EncodedDataset, LabelEncoder, Record};
use crate::utils::error::{CropError, Result};
use std::collections::HashMap;

/// Reads every row of a headered CSV file into header-keyed records.
pub fn read_csv_records(path: &str) -> Result<Vec<Record>> {
    tracing::debug!("Reading dataset from: {}", path);

    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut fields = HashMap::with_capacity(headers.len());
        for (header, value) in headers.iter().zip(row.iter()) {
            fields.insert(header.clone(), value.trim().to_string());
        }
        records.push(Record { fields });
    }

    tracing::debug!("Read {} records", records.len());
    Ok(records)
}

/// Pulls a column out of a record, failing with the row number on absence.
pub fn require_field<'a>(record: &'a Record, column: &str, row: usize) -> Result<&'a str> {
    record.get(column).ok_or_else(|| {
        CropError::training(format!("row {}: dataset is missing column '{}'", row + 1, column))
    })
}

/// Parses a numeric column value, failing with row and column on bad input.
pub fn require_numeric(record: &Record, column: &str, row: usize) -> Result<f64> {
    let raw = require_field(record, column, row)?;
    raw.parse().map_err(|_| {
        CropError::training(format!(
            "row {}: column '{}' is not numeric ('{}')",
            row + 1,
            column,
            raw
        ))
    })
}

/// Looks up a fitted feature encoder by column name.
pub fn encoder_for<'a>(dataset: &'a EncodedDataset, column: &str) -> Result<&'a LabelEncoder> {
    dataset
        .feature_encoders
        .iter()
        .find(|(name, _)| name == column)
        .map(|(_, encoder)| encoder)
        .ok_or_else(|| CropError::training(format!("no encoder fitted for column '{}'", column)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_headered_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Location,Time,Soil Condition,pH,Crop").unwrap();
        writeln!(file, "Ratnapura,Yala,Sandy loam,6.3,Rice").unwrap();
        writeln!(file, "Kandy,Maha,Clay, 5.9 ,Tea").unwrap();
        file.flush().unwrap();

        let records = read_csv_records(file.path().to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Location"), Some("Ratnapura"));
        assert_eq!(records[1].get("pH"), Some("5.9"));
        assert_eq!(records[1].get("Crop"), Some("Tea"));
    }

    #[test]
    fn missing_column_names_row_and_column() {
        let record = Record {
            fields: HashMap::new(),
        };
        let err = require_field(&record, "Location", 4).unwrap_err();
        assert!(err.to_string().contains("row 5"));
        assert!(err.to_string().contains("'Location'"));
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let mut fields = HashMap::new();
        fields.insert("pH".to_string(), "acidic".to_string());
        let record = Record { fields };
        assert!(require_numeric(&record, "pH", 0).is_err());
    }
}
