//! History table rows and CSV export.
//!
//! Rows use the display formatting of the history table: day-only date,
//! weight to 1 decimal, height to 0 decimals, BMI to 2 decimals.

use crate::{HistoryEntry, Result};
use std::fs::File;
use std::path::Path;

/// A formatted row of the history table
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HistoryRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Weight (kg)")]
    pub weight_kg: String,
    #[serde(rename = "Height (cm)")]
    pub height_cm: String,
    #[serde(rename = "BMI")]
    pub bmi: String,
    #[serde(rename = "Category")]
    pub category: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        HistoryRow {
            date: entry.date.format("%Y-%m-%d").to_string(),
            name: entry.name.clone(),
            weight_kg: format!("{:.1}", entry.weight_kg),
            height_cm: format!("{:.0}", entry.height_cm),
            bmi: format!("{:.2}", entry.bmi),
            category: entry.category.to_string(),
        }
    }
}

/// Write the history table to a CSV file, replacing any existing file
///
/// Returns the number of rows written.
pub fn export_csv(entries: &[HistoryEntry], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    for entry in entries {
        writer.serialize(HistoryRow::from(entry))?;
    }

    // An empty history still gets a header line
    if entries.is_empty() {
        writer.write_record(["Date", "Name", "Weight (kg)", "Height (cm)", "BMI", "Category"])?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} history rows to {:?}", entries.len(), csv_path);
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BmiCategory;
    use chrono::NaiveDate;

    fn entry(name: &str, bmi: f64) -> HistoryEntry {
        HistoryEntry {
            name: name.into(),
            date: NaiveDate::from_ymd_opt(2024, 4, 9)
                .unwrap()
                .and_hms_opt(21, 5, 0)
                .unwrap(),
            weight_kg: 68.24,
            height_cm: 172.6,
            bmi,
            category: BmiCategory::Normal,
        }
    }

    #[test]
    fn test_row_formatting() {
        let row = HistoryRow::from(&entry("Ann", 22.9));
        assert_eq!(row.date, "2024-04-09");
        assert_eq!(row.weight_kg, "68.2");
        assert_eq!(row.height_cm, "173");
        assert_eq!(row.bmi, "22.90");
        assert_eq!(row.category, "Normal Weight");
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out").join("history.csv");

        let count = export_csv(&[entry("Ann", 22.9), entry("Bo", 23.4)], &csv_path).unwrap();
        assert_eq!(count, 2);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "Date");
        assert_eq!(&headers[2], "Weight (kg)");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][1], "Bo");
        assert_eq!(&rows[1][4], "23.40");
    }

    #[test]
    fn test_export_empty_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        assert_eq!(export_csv(&[], &csv_path).unwrap(), 0);
        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents.trim(), "Date,Name,Weight (kg),Height (cm),BMI,Category");
    }

    #[test]
    fn test_export_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        export_csv(&[entry("Ann", 22.9), entry("Bo", 23.4)], &csv_path).unwrap();
        export_csv(&[entry("Cy", 21.0)], &csv_path).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 1);
    }
}
