//! Dataset file: the persistent CSV of harvested listings
//!
//! One row per listing, fixed column order, header row required. The file is
//! the single source of truth between runs: read fully at run start, and
//! fully rewritten (atomic write-then-rename, never in-place truncation) at
//! run end once the merge has been computed.

use crate::storage::ListingRecord;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Fixed column order of the raw dataset file.
///
/// This is the collaborator contract with the downstream ETL: column
/// parsing, type coercion and derived columns all happen there.
pub const CSV_HEADERS: [&str; 7] = [
    "segment",
    "title",
    "detail_link",
    "description",
    "price_text",
    "location_text",
    "detail_fields",
];

/// Separator used to join `detail_fields` into its single CSV column
const DETAIL_FIELDS_SEPARATOR: &str = ", ";

/// Errors that can occur reading or writing the dataset file
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed dataset file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset row {row} has {got} columns, expected {expected}")]
    ColumnCount {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("Failed to replace dataset file: {0}")]
    Replace(String),
}

/// Reads and writes the listing dataset at a fixed path
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full dataset.
    ///
    /// A missing file is the normal first-run case and yields an empty set.
    pub fn load(&self) -> Result<Vec<ListingRecord>, DatasetError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::Reader::from_reader(file);
        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            let row = row?;
            records.push(row_to_record(&row, i + 1)?);
        }
        Ok(records)
    }

    /// Persists the full dataset, replacing the file atomically.
    ///
    /// The merged content is written to a temp file in the destination
    /// directory first; only a successful write renames over the previous
    /// file, so a failure leaves the old dataset intact.
    pub fn save(&self, records: &[ListingRecord]) -> Result<(), DatasetError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir)?;

        {
            let mut writer = csv::Writer::from_writer(&tmp);
            writer.write_record(CSV_HEADERS)?;
            for record in records {
                writer.write_record(record_to_row(record))?;
            }
            writer.flush()?;
        }

        tmp.persist(&self.path)
            .map_err(|e| DatasetError::Replace(e.to_string()))?;
        tracing::debug!("Dataset saved: {} records", records.len());
        Ok(())
    }
}

fn record_to_row(record: &ListingRecord) -> [String; 7] {
    [
        record.segment.clone(),
        record.title.clone(),
        record.detail_link.clone(),
        record.description.clone(),
        record.price_text.clone(),
        record.location_text.clone(),
        record.detail_fields.join(DETAIL_FIELDS_SEPARATOR),
    ]
}

fn row_to_record(row: &csv::StringRecord, row_number: usize) -> Result<ListingRecord, DatasetError> {
    if row.len() != CSV_HEADERS.len() {
        return Err(DatasetError::ColumnCount {
            row: row_number,
            got: row.len(),
            expected: CSV_HEADERS.len(),
        });
    }

    let detail_fields = if row[6].is_empty() {
        Vec::new()
    } else {
        row[6]
            .split(DETAIL_FIELDS_SEPARATOR)
            .map(str::to_string)
            .collect()
    };

    Ok(ListingRecord {
        segment: row[0].to_string(),
        title: row[1].to_string(),
        detail_link: row[2].to_string(),
        description: row[3].to_string(),
        price_text: row[4].to_string(),
        location_text: row[5].to_string(),
        detail_fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(link: &str, title: &str) -> ListingRecord {
        ListingRecord {
            segment: "lyon".to_string(),
            title: title.to_string(),
            detail_link: link.to_string(),
            description: "Proche métro".to_string(),
            price_text: "250 000 €".to_string(),
            location_text: "Lyon 3e".to_string(),
            detail_fields: vec!["3 pièces".to_string(), "62 m²".to_string()],
        }
    }

    #[test]
    fn test_missing_file_yields_empty() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("annonces_raw.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("annonces_raw.csv"));

        let records = vec![record("/a", "T3 centre"), record("/b", "Maison jardin")];
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn test_header_row_is_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("annonces_raw.csv");
        let store = DatasetStore::new(&path);

        store.save(&[record("/a", "T3")]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let first_line = content.lines().next().unwrap();
        assert_eq!(
            first_line,
            "segment,title,detail_link,description,price_text,location_text,detail_fields"
        );
    }

    #[test]
    fn test_empty_dataset_still_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("annonces_raw.csv");
        let store = DatasetStore::new(&path);

        store.save(&[]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_detail_fields_joined_and_split() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("annonces_raw.csv"));

        let mut r = record("/a", "T3");
        r.detail_fields = vec!["4 pièces".to_string(), "2 chambres".to_string()];
        store.save(&[r.clone()]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].detail_fields, r.detail_fields);
    }

    #[test]
    fn test_empty_detail_fields_roundtrip() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("annonces_raw.csv"));

        let mut r = record("/a", "T3");
        r.detail_fields = vec![];
        store.save(&[r]).unwrap();

        assert!(store.load().unwrap()[0].detail_fields.is_empty());
    }

    #[test]
    fn test_save_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("annonces_raw.csv"));

        store.save(&[record("/a", "T3"), record("/b", "T4")]).unwrap();
        store.save(&[record("/c", "Studio")]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].detail_link, "/c");
    }

    #[test]
    fn test_fields_with_commas_survive() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("annonces_raw.csv"));

        let mut r = record("/a", "T3, refait à neuf");
        r.description = "Séjour, cuisine équipée, balcon".to_string();
        store.save(&[r.clone()]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].title, r.title);
        assert_eq!(loaded[0].description, r.description);
    }

    #[test]
    fn test_wrong_column_count_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("annonces_raw.csv");
        std::fs::write(&path, "segment,title\nlyon,T3\n").unwrap();

        let store = DatasetStore::new(path);
        assert!(matches!(
            store.load(),
            Err(DatasetError::ColumnCount { row: 1, got: 2, .. })
        ));
    }
}
