//! CSV export of the result table.
//!
//! The exported table is the one bit-exact external contract of the
//! pipeline: a fixed header row and one data row per sample in table order,
//! with numeric fields in plain decimal form that round-trips through
//! standard float parsing.

use crate::aggregate::{VolumeSample, VolumeTable};
use std::path::Path;
use thiserror::Error;

/// Header row of the exported table.
pub const CSV_HEADER: [&str; 4] = [
    "Level (m)",
    "Fill Volume (km³)",
    "Cut Volume (km³)",
    "Net Volume (km³)",
];

/// Errors from reading or writing a volume table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error on the destination file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the expected header row.
    #[error("unexpected header row: {0}")]
    Header(String),
}

/// Write the table to `path` with the standard header.
///
/// The header is written even for an empty table, so a completed run never
/// leaves a silent empty file behind.
pub fn write_table<P: AsRef<Path>>(table: &VolumeTable, path: P) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(CSV_HEADER)?;
    for sample in table {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a table previously written by [`write_table`].
///
/// Fails with [`ExportError::Header`] if the header row does not match
/// [`CSV_HEADER`] exactly.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<VolumeTable, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?;
    let expected: csv::StringRecord = CSV_HEADER.iter().collect();
    if headers != &expected {
        return Err(ExportError::Header(
            headers.iter().collect::<Vec<_>>().join(","),
        ));
    }

    let mut table = VolumeTable::new();
    for record in reader.deserialize() {
        let sample: VolumeSample = record?;
        table.push(sample);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::VolumeSample;

    fn sample_table() -> VolumeTable {
        let mut table = VolumeTable::new();
        table.push(VolumeSample::classify(0.0, 1e9));
        table.push(VolumeSample::classify(50.0, -2e9));
        table.push(VolumeSample::classify(100.0, 0.0));
        table
    }

    #[test]
    fn test_header_row_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume_data.csv");
        write_table(&sample_table(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let first_line = contents.lines().next().unwrap();
        assert_eq!(
            first_line,
            "Level (m),Fill Volume (km³),Cut Volume (km³),Net Volume (km³)"
        );
        // Header plus three data rows.
        assert_eq!(contents.lines().count(), 4);
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume_data.csv");
        let table = sample_table();

        write_table(&table, &path).unwrap();
        let read_back = read_table(&path).unwrap();
        assert_eq!(read_back, table);
    }

    #[test]
    fn test_round_trip_awkward_floats() {
        // Values with no short decimal form must still round-trip exactly.
        let mut table = VolumeTable::new();
        table.push(VolumeSample::classify(123.456_789, 1.0));
        table.push(VolumeSample::classify(0.1 + 0.2, -987_654_321.0));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume_data.csv");
        write_table(&table, &path).unwrap();
        assert_eq!(read_table(&path).unwrap(), table);
    }

    #[test]
    fn test_empty_table_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume_data.csv");
        write_table(&VolumeTable::new(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(read_table(&path).unwrap().is_empty());
    }

    #[test]
    fn test_unwritable_destination_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("volume_data.csv");
        assert!(write_table(&sample_table(), &path).is_err());
    }

    #[test]
    fn test_wrong_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "a,b,c,d\n1,2,3,4\n").unwrap();

        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, ExportError::Header(_)));
    }
}
