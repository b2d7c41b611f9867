//! Flat-file persistence for record collections.
//!
//! Each collection is one JSON array file under the data directory, created
//! empty on first run. There is no indexing and no transaction log: every
//! write rewrites the whole file, and a per-collection async mutex serializes
//! the read-modify-write cycles.

use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;

use tokio::sync::Mutex;
use waypost_core::{RecordId, SyncRecord};

use crate::error::AppError;

pub struct JsonCollection<R> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<R>,
}

impl<R: SyncRecord> JsonCollection<R> {
    /// Open (or initialize) the collection file for this record type.
    pub fn open(data_dir: &std::path::Path) -> Result<Self, AppError> {
        fs::create_dir_all(data_dir).map_err(|error| {
            AppError::Config(format!("create {}: {error}", data_dir.display()))
        })?;

        let path = data_dir.join(format!("{}.json", R::COLLECTION.remote_path()));
        if !path.exists() {
            fs::write(&path, "[]").map_err(|error| {
                AppError::Config(format!("initialize {}: {error}", path.display()))
            })?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            _record: PhantomData,
        })
    }

    /// Read the full collection; any read or parse failure is a 500.
    pub fn read_all(&self) -> Result<Vec<R>, AppError> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|error| AppError::internal(format!("read {}: {error}", self.path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|error| AppError::internal(format!("parse {}: {error}", self.path.display())))
    }

    /// Append one record. No server-side id-collision check: the client's
    /// dedup pass owns that concern.
    pub async fn append(&self, record: R) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all()?;
        records.push(record);
        self.write(&records)
    }

    /// Replace the whole collection with the client's ("client wins").
    pub async fn replace_all(&self, records: Vec<R>) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;
        let count = records.len();
        self.write(&records)?;
        Ok(count)
    }

    /// Remove a record by id; absent ids are a no-op returning `false`.
    pub async fn remove(&self, id: &RecordId) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;
        let records = self.read_all()?;
        let before = records.len();
        let remaining: Vec<R> = records
            .into_iter()
            .filter(|record| record.id() != id)
            .collect();

        let removed = remaining.len() != before;
        if removed {
            self.write(&remaining)?;
        }
        Ok(removed)
    }

    fn write(&self, records: &[R]) -> Result<(), AppError> {
        let serialized = serde_json::to_string_pretty(records)
            .map_err(|error| AppError::internal(format!("serialize collection: {error}")))?;
        fs::write(&self.path, serialized)
            .map_err(|error| AppError::internal(format!("write {}: {error}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use waypost_core::Marker;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn open_creates_empty_collection_file() {
        let dir = tempfile::tempdir().unwrap();
        let collection: JsonCollection<Marker> = JsonCollection::open(dir.path()).unwrap();
        assert!(dir.path().join("markers.json").exists());
        assert!(collection.read_all().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn append_and_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let collection: JsonCollection<Marker> = JsonCollection::open(dir.path()).unwrap();

        let marker = Marker::new("Pin", [1.0, 2.0]);
        let id = marker.id;
        collection.append(marker).await.unwrap();
        assert_eq!(collection.read_all().unwrap().len(), 1);

        assert!(collection.remove(&id).await.unwrap());
        assert!(collection.read_all().unwrap().is_empty());

        // Removing again is a silent no-op.
        assert!(!collection.remove(&id).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn replace_all_overwrites_everything() {
        let dir = tempfile::tempdir().unwrap();
        let collection: JsonCollection<Marker> = JsonCollection::open(dir.path()).unwrap();
        collection.append(Marker::new("Old", [0.0, 0.0])).await.unwrap();

        let replacement = vec![
            Marker::new("New A", [1.0, 1.0]),
            Marker::new("New B", [2.0, 2.0]),
        ];
        let count = collection.replace_all(replacement).await.unwrap();
        assert_eq!(count, 2);

        let names: Vec<String> = collection
            .read_all()
            .unwrap()
            .into_iter()
            .map(|marker| marker.name)
            .collect();
        assert_eq!(names, vec!["New A", "New B"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn corrupt_file_reads_as_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let collection: JsonCollection<Marker> = JsonCollection::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("markers.json"), "{broken").unwrap();
        assert!(collection.read_all().is_err());
    }
}
