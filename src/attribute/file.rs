//! Append-only file attribute store
//!
//! Every attribute write appends one checksummed record and is fsynced before
//! it becomes visible. Records are never rewritten; when a name is written
//! twice the latest record wins.
//!
//! On open the whole file is replayed. Any truncated or checksum-failing
//! record aborts the open with `MESH_STORE_DATA_CORRUPTION`.
//!
//! A failed append is truncated back to the end of the last acknowledged
//! record so later writes never land behind torn bytes. If the truncation
//! itself fails the handle refuses further writes.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::field::EntityType;
use crate::observability::{log_event_with_fields, Event};

use super::errors::{StoreError, StoreResult};
use super::record::AttributeRecord;
use super::store::AttributeStore;
use super::value::AttributeValue;

type AttributeKey = (EntityType, i64, String);

/// Attribute store persisted to a single append-only file.
pub struct FileAttributeStore {
    path: PathBuf,
    file: File,
    current_offset: u64,
    attributes: BTreeMap<AttributeKey, AttributeValue>,
    read_only: bool,
    poisoned: bool,
    /// Bytes to write before failing the next append
    #[cfg(test)]
    short_write: Option<usize>,
}

impl FileAttributeStore {
    /// Opens or creates the store file, replaying any existing records.
    ///
    /// Parent directories are created if missing.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::write_failed(
                        format!("Failed to create store directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                StoreError::write_failed(
                    format!("Failed to open attribute store: {}", path.display()),
                    e,
                )
            })?;

        Self::load(path, file, false)
    }

    /// Opens an existing store file for reading only.
    ///
    /// Nothing is created: a missing file fails with `MESH_STORE_READ_FAILED`,
    /// and every put on the returned store is rejected.
    pub fn open_read_only(path: &Path) -> StoreResult<Self> {
        let file = OpenOptions::new().read(true).open(path).map_err(|e| {
            let message = if e.kind() == io::ErrorKind::NotFound {
                format!("Attribute store does not exist: {}", path.display())
            } else {
                format!("Failed to open attribute store: {}", path.display())
            };
            StoreError::read_failed(message, e)
        })?;

        Self::load(path, file, true)
    }

    fn load(path: &Path, file: File, read_only: bool) -> StoreResult<Self> {
        let attributes = Self::replay(path)?;

        let current_offset = file
            .metadata()
            .map_err(|e| StoreError::read_failed("Failed to read store metadata", e))?
            .len();

        let records = attributes.len().to_string();
        let location = path.display().to_string();
        let mode = if read_only { "read_only" } else { "read_write" };
        log_event_with_fields(
            Event::StoreOpened,
            &[
                ("attributes", records.as_str()),
                ("mode", mode),
                ("path", location.as_str()),
            ],
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            current_offset,
            attributes,
            read_only,
            poisoned: false,
            #[cfg(test)]
            short_write: None,
        })
    }

    /// Rebuilds the attribute map by scanning every record in file order.
    fn replay(path: &Path) -> StoreResult<BTreeMap<AttributeKey, AttributeValue>> {
        let data = fs::read(path).map_err(|e| {
            StoreError::read_failed(format!("Failed to read attribute store: {}", path.display()), e)
        })?;

        let mut attributes = BTreeMap::new();
        let mut offset = 0usize;

        while offset < data.len() {
            let (record, consumed) = AttributeRecord::deserialize(&data[offset..]).map_err(|e| {
                let location = path.display().to_string();
                let at = offset.to_string();
                log_event_with_fields(
                    Event::StoreCorruption,
                    &[("offset", at.as_str()), ("path", location.as_str())],
                );
                StoreError::corruption_at_offset(offset as u64, e.to_string())
            })?;

            attributes.insert(
                (record.entity_type, record.entity_id, record.name),
                record.value,
            );
            offset += consumed;
        }

        Ok(attributes)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the store file in bytes.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Number of distinct attributes (latest record per name).
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn append(&mut self, record: AttributeRecord) -> StoreResult<()> {
        if record.name.is_empty() {
            return Err(StoreError::bad_param(format!(
                "attribute name must not be empty ({} {})",
                record.entity_type, record.entity_id
            )));
        }

        if self.read_only {
            return Err(StoreError::write_rejected(format!(
                "attribute store is open read-only: {}",
                self.path.display()
            )));
        }
        if self.poisoned {
            return Err(StoreError::write_rejected(format!(
                "attribute store holds an unrecovered partial write: {}",
                self.path.display()
            )));
        }

        let serialized = record.serialize();

        if let Err(e) = self.write_record(&serialized) {
            self.roll_back();
            return Err(StoreError::write_failed(
                format!("Failed to write attribute: {}", record.name),
                e,
            ));
        }

        self.current_offset += serialized.len() as u64;
        self.attributes.insert(
            (record.entity_type, record.entity_id, record.name),
            record.value,
        );

        Ok(())
    }

    /// Writes and fsyncs one serialized record.
    fn write_record(&mut self, bytes: &[u8]) -> io::Result<()> {
        #[cfg(test)]
        {
            if let Some(keep) = self.short_write.take() {
                self.file.write_all(&bytes[..keep.min(bytes.len())])?;
                return Err(io::Error::new(io::ErrorKind::WriteZero, "short write"));
            }
        }

        self.file.write_all(bytes)?;
        self.file.sync_all()
    }

    /// Truncates the file to the end of the last acknowledged record.
    fn roll_back(&mut self) {
        let offset = self.current_offset;
        let at = offset.to_string();
        let location = self.path.display().to_string();

        match self.file.set_len(offset).and_then(|()| self.file.sync_all()) {
            Ok(()) => log_event_with_fields(
                Event::StoreWriteRolledBack,
                &[("offset", at.as_str()), ("path", location.as_str())],
            ),
            Err(e) => {
                self.poisoned = true;
                let reason = e.to_string();
                log_event_with_fields(
                    Event::StoreRollbackFailed,
                    &[
                        ("error", reason.as_str()),
                        ("offset", at.as_str()),
                        ("path", location.as_str()),
                    ],
                );
            }
        }
    }
}

impl AttributeStore for FileAttributeStore {
    fn put_integer_attribute(
        &mut self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
        values: &[i64],
    ) -> StoreResult<()> {
        self.append(AttributeRecord::new(
            entity_type,
            entity_id,
            name,
            AttributeValue::Integer(values.to_vec()),
        ))
    }

    fn put_text_attribute(
        &mut self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
        value: &str,
    ) -> StoreResult<()> {
        self.append(AttributeRecord::new(
            entity_type,
            entity_id,
            name,
            AttributeValue::Text(value.to_string()),
        ))
    }

    fn get_attribute(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
    ) -> StoreResult<Option<AttributeValue>> {
        Ok(self
            .attributes
            .get(&(entity_type, entity_id, name.to_string()))
            .cloned())
    }

    fn attribute_names(&self, entity_type: EntityType, entity_id: i64) -> StoreResult<Vec<String>> {
        Ok(self
            .attributes
            .keys()
            .filter(|(t, id, _)| *t == entity_type && *id == entity_id)
            .map(|(_, _, name)| name.clone())
            .collect())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::StoreErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_reopen_replays_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mesh.attr");

        {
            let mut store = FileAttributeStore::open(&path).unwrap();
            store
                .put_integer_attribute(EntityType::EdgeBlock, 1, "Field@f@type", &[8])
                .unwrap();
            store
                .put_text_attribute(EntityType::EdgeBlock, 1, "Field@f@separator", "")
                .unwrap();
        }

        let store = FileAttributeStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store
                .get_attribute(EntityType::EdgeBlock, 1, "Field@f@type")
                .unwrap(),
            Some(AttributeValue::Integer(vec![8]))
        );
    }

    #[test]
    fn test_latest_record_wins_after_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mesh.attr");

        {
            let mut store = FileAttributeStore::open(&path).unwrap();
            store
                .put_text_attribute(EntityType::Global, 0, "title", "first")
                .unwrap();
            store
                .put_text_attribute(EntityType::Global, 0, "title", "second")
                .unwrap();
        }

        let store = FileAttributeStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_attribute(EntityType::Global, 0, "title").unwrap(),
            Some(AttributeValue::Text("second".into()))
        );
    }

    #[test]
    fn test_offset_tracks_file_size() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("mesh.attr");

        let mut store = FileAttributeStore::open(&path).unwrap();
        assert_eq!(store.current_offset(), 0);
        store
            .put_integer_attribute(EntityType::NodeSet, 3, "ids", &[1, 2, 3])
            .unwrap();
        assert_eq!(store.current_offset(), fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn test_corruption_detected_on_open() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mesh.attr");

        {
            let mut store = FileAttributeStore::open(&path).unwrap();
            store
                .put_text_attribute(EntityType::EdgeBlock, 1, "Field@f@separator", "_")
                .unwrap();
        }

        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 6;
        bytes[last] ^= 0xFF;
        fs::write(&path, &bytes).unwrap();

        let err = FileAttributeStore::open(&path).err().unwrap();
        assert_eq!(err.code(), StoreErrorCode::DataCorruption);
        assert!(err.is_fatal());
        assert_eq!(err.details(), Some("byte_offset: 0"));
    }

    #[test]
    fn test_truncated_tail_detected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mesh.attr");

        {
            let mut store = FileAttributeStore::open(&path).unwrap();
            store
                .put_integer_attribute(EntityType::EdgeBlock, 1, "a", &[1])
                .unwrap();
            store
                .put_integer_attribute(EntityType::EdgeBlock, 1, "b", &[2])
                .unwrap();
        }

        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        let err = FileAttributeStore::open(&path).err().unwrap();
        assert_eq!(err.code(), StoreErrorCode::DataCorruption);
    }

    #[test]
    fn test_empty_name_rejected_without_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mesh.attr");

        let mut store = FileAttributeStore::open(&path).unwrap();
        let err = store
            .put_text_attribute(EntityType::Global, 0, "", "x")
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::BadParam);
        assert_eq!(store.current_offset(), 0);
    }

    #[test]
    fn test_failed_append_truncated_to_last_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mesh.attr");

        {
            let mut store = FileAttributeStore::open(&path).unwrap();
            store
                .put_integer_attribute(EntityType::EdgeBlock, 1, "Field@f@type", &[8])
                .unwrap();
            let good = store.current_offset();

            store.short_write = Some(7);
            let err = store
                .put_text_attribute(EntityType::EdgeBlock, 1, "Field@f@separator", "_")
                .unwrap_err();
            assert_eq!(err.code(), StoreErrorCode::WriteFailed);
            assert_eq!(store.current_offset(), good);
            assert_eq!(fs::metadata(&path).unwrap().len(), good);
            assert_eq!(
                store
                    .get_attribute(EntityType::EdgeBlock, 1, "Field@f@separator")
                    .unwrap(),
                None
            );

            store
                .put_text_attribute(EntityType::EdgeBlock, 1, "Field@f@separator", ".")
                .unwrap();
        }

        let store = FileAttributeStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store
                .get_attribute(EntityType::EdgeBlock, 1, "Field@f@separator")
                .unwrap(),
            Some(AttributeValue::Text(".".into()))
        );
    }

    #[test]
    fn test_poisoned_store_refuses_writes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mesh.attr");

        let mut store = FileAttributeStore::open(&path).unwrap();
        store.poisoned = true;
        let err = store
            .put_integer_attribute(EntityType::Global, 0, "ids", &[1])
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::WriteFailed);
        assert_eq!(store.current_offset(), 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_read_only_open_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("typo").join("mesh.attr");

        let err = FileAttributeStore::open_read_only(&path).err().unwrap();
        assert_eq!(err.code(), StoreErrorCode::ReadFailed);
        assert!(err.message().contains("does not exist"));
        assert!(!path.exists());
        assert!(!tmp.path().join("typo").exists());
    }

    #[test]
    fn test_read_only_store_replays_and_rejects_puts() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mesh.attr");

        {
            let mut store = FileAttributeStore::open(&path).unwrap();
            store
                .put_text_attribute(EntityType::Global, 0, "title", "mesh")
                .unwrap();
        }
        let size = fs::metadata(&path).unwrap().len();

        let mut store = FileAttributeStore::open_read_only(&path).unwrap();
        assert_eq!(
            store.get_attribute(EntityType::Global, 0, "title").unwrap(),
            Some(AttributeValue::Text("mesh".into()))
        );
        let err = store
            .put_text_attribute(EntityType::Global, 0, "title", "other")
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::WriteFailed);
        assert_eq!(fs::metadata(&path).unwrap().len(), size);
    }
}
