use crate::core::EncodedImage;
use crate::error::StoreError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub const HISTORY_FILE: &str = ".seed-history.jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStatus {
    Written,
    DryRun,
    NoCandidates,
    NothingSelected,
    Failed,
}

/// One processed product, appended to the history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub timestamp: String,
    pub category: String,
    pub index: String,
    pub product_name: String,
    pub candidates: usize,
    pub written: usize,
    pub rejected: usize,
    pub status: SeedStatus,
}

impl SeedRecord {
    pub fn now(
        category: &str,
        index: &str,
        product_name: &str,
        status: SeedStatus,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            category: category.to_string(),
            index: index.to_string(),
            product_name: product_name.to_string(),
            candidates: 0,
            written: 0,
            rejected: 0,
            status,
        }
    }
}

/// Writes curated photos under `{root}/{category}/{index}/{k}.jpg`.
#[derive(Debug, Clone)]
pub struct ProductStore {
    root: PathBuf,
}

impl ProductStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn product_dir(&self, category: &str, index: &str) -> PathBuf {
        self.root.join(category).join(index)
    }

    /// Write the selection as `1.jpg`, `2.jpg`, ... in order.
    pub fn write_selection(
        &self,
        category: &str,
        index: &str,
        images: &[EncodedImage],
    ) -> Result<Vec<PathBuf>, StoreError> {
        write_numbered(&self.product_dir(category, index), images)
    }

    pub fn history_path(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    pub fn append_history(&self, record: &SeedRecord) -> Result<(), StoreError> {
        let path = self.history_path();
        create_dir(&self.root)?;
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        let line = serde_json::to_string(record)?;
        writeln!(out, "{}", line).map_err(|source| StoreError::Io { path, source })
    }

    /// Every readable history record; malformed lines are skipped.
    pub fn read_history(&self) -> Result<Vec<SeedRecord>, StoreError> {
        let path = self.history_path();
        let file = File::open(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        let mut records = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SeedRecord>(&line) {
                Ok(record) => records.push(record),
                Err(err) => log::warn!("Skipping malformed history entry {}: {}", i, err),
            }
        }
        Ok(records)
    }
}

/// Write images into `dir` as `1.jpg..K.jpg`, creating `dir` if needed.
pub fn write_numbered(dir: &Path, images: &[EncodedImage]) -> Result<Vec<PathBuf>, StoreError> {
    create_dir(dir)?;
    images
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let path = dir.join(format!("{}.jpg", i + 1));
            fs::write(&path, &image.bytes).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(path)
        })
        .collect()
}

fn create_dir(dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn encoded(source_index: usize, bytes: &[u8]) -> EncodedImage {
        EncodedImage {
            source_index,
            width: 800,
            height: 600,
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_write_selection_numbers_from_one() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProductStore::new(temp_dir.path());

        let images = vec![encoded(4, b"best"), encoded(0, b"second")];
        let paths = store.write_selection("LAPTOPS", "1", &images).unwrap();

        let dir = temp_dir.path().join("LAPTOPS").join("1");
        assert_eq!(paths, vec![dir.join("1.jpg"), dir.join("2.jpg")]);
        assert_eq!(fs::read(dir.join("1.jpg")).unwrap(), b"best");
        assert_eq!(fs::read(dir.join("2.jpg")).unwrap(), b"second");
    }

    #[test]
    fn test_empty_selection_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProductStore::new(temp_dir.path());

        let paths = store.write_selection("AUDIO", "3", &[]).unwrap();
        assert!(paths.is_empty());
        assert_eq!(fs::read_dir(store.product_dir("AUDIO", "3")).unwrap().count(), 0);
    }

    #[test]
    fn test_history_roundtrip_skips_malformed_lines() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProductStore::new(temp_dir.path().join("seed"));

        let mut record = SeedRecord::now("LAPTOPS", "1", "Acer Swift 3", SeedStatus::Written);
        record.candidates = 6;
        record.written = 4;
        record.rejected = 2;
        store.append_history(&record).unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(store.history_path())
            .unwrap();
        writeln!(file, "{{ not json").unwrap();

        store
            .append_history(&SeedRecord::now("AUDIO", "2", "Buds", SeedStatus::NothingSelected))
            .unwrap();

        let records = store.read_history().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], record);
        assert_eq!(records[1].status, SeedStatus::NothingSelected);
    }

    #[test]
    fn test_missing_history_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = ProductStore::new(temp_dir.path());
        assert!(store.read_history().is_err());
    }
}
