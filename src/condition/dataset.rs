// Medicine/condition dataset loading.
//
// The training CSV has one row per prescription pattern: a `Condition`
// column and a `Medicine Names` column holding a comma-separated list.
// Before training, rows are aggregated so each condition is represented by
// its single longest medicine list.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// One parsed dataset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineRecord {
    pub condition: String,
    /// Trimmed, non-empty medicine names in their CSV order
    pub medicines: Vec<String>,
    /// Comma-separated entries in the raw cell, blanks included
    pub listed: usize,
}

/// The training document for one condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionDocument {
    pub condition: String,
    /// Medicine names joined with ", "
    pub medicines: String,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Condition")]
    condition: String,
    #[serde(rename = "Medicine Names")]
    medicine_names: String,
}

/// Read and parse a dataset file.
///
/// Files are read as UTF-8 when valid, otherwise as Latin-1 (exports from
/// spreadsheet tools frequently are).
pub fn load_dataset(path: &Path) -> Result<Vec<MedicineRecord>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Error loading CSV data from {}", path.display()))?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };

    let records = parse_dataset(&text)
        .with_context(|| format!("Error loading CSV data from {}", path.display()))?;

    info!(path = %path.display(), rows = records.len(), "Loaded medicine dataset");
    Ok(records)
}

/// Parse dataset CSV text. Columns other than `Condition` and
/// `Medicine Names` are ignored.
pub fn parse_dataset(csv_text: &str) -> Result<Vec<MedicineRecord>> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut records = Vec::new();

    for (i, row) in reader.deserialize::<RawRow>().enumerate() {
        // +2: one for the header line, one for 1-based numbering
        let row = row.with_context(|| format!("Malformed dataset row {}", i + 2))?;
        records.push(MedicineRecord {
            condition: row.condition.trim().to_string(),
            medicines: split_medicines(&row.medicine_names),
            listed: row.medicine_names.split(',').count(),
        });
    }

    Ok(records)
}

/// Split a comma-separated medicine list, trimming and dropping blanks.
pub fn split_medicines(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep, per condition, the row listing the most medicines.
///
/// Rows are ranked by their raw entry count, so "A,,B" counts as three.
/// The first such row wins on ties. Output is ordered by condition name.
pub fn aggregate(records: &[MedicineRecord]) -> Vec<ConditionDocument> {
    let mut best: BTreeMap<&str, &MedicineRecord> = BTreeMap::new();

    for record in records {
        best.entry(record.condition.as_str())
            .and_modify(|current| {
                if record.listed > current.listed {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    best.into_iter()
        .map(|(condition, record)| ConditionDocument {
            condition: condition.to_string(),
            medicines: record.medicines.join(", "),
        })
        .collect()
}
