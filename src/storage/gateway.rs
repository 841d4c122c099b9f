//! Whole-inventory save and load

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::SystemTime,
};

use log::{debug, info, warn};

use crate::{
    domain::record::Record,
    storage::{
        error::StorageError,
        format::{FORMAT_VERSION, InventoryFile, i64_seconds_to_local_time, system_time_to_i64},
    },
};

/// Reads and writes the inventory file at a fixed path
#[derive(Debug, Clone)]
pub struct PersistenceGateway {
    path: PathBuf,
}

impl PersistenceGateway {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, records: &[Record]) -> Result<(), StorageError> {
        save(records, &self.path)
    }

    pub fn load(&self) -> Result<Vec<Record>, StorageError> {
        load(&self.path)
    }
}

/// Writes all records to `path`, replacing its previous content.
///
/// The file is either fully written or left as it was.
pub fn save(records: &[Record], path: &Path) -> Result<(), StorageError> {
    let saved_at = system_time_to_i64(SystemTime::now())?;
    let bytes = serde_json::to_vec_pretty(&InventoryFile::new(records, saved_at))?;
    write_atomic(path, &bytes)?;
    info!("saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads all records from `path`.
pub fn load(path: &Path) -> Result<Vec<Record>, StorageError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StorageError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => StorageError::Fs(e),
    })?;

    let corrupt = |reason: String| StorageError::EmptyOrCorrupt {
        path: path.to_path_buf(),
        reason,
    };

    if bytes.is_empty() {
        return Err(corrupt("file is empty".to_string()));
    }

    let file: InventoryFile =
        serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;

    if file.version != FORMAT_VERSION {
        return Err(corrupt(format!(
            "unsupported format version {}",
            file.version
        )));
    }

    match i64_seconds_to_local_time(file.saved_at) {
        Ok(saved_at) => info!(
            "loaded {} records from {}, saved {}",
            file.records.len(),
            path.display(),
            saved_at
        ),
        Err(e) => debug!("inventory file has unreadable save time: {e:#}"),
    }

    Ok(file.records.into_owned())
}

fn tmp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    Ok(path.with_file_name(format!("{}.tmp", file_name.to_string_lossy())))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp_path = tmp_path(path)?;
    let written = (|| {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()
    })();

    let result = written.and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = &result {
        warn!("failed to write {}: {e}", path.display());
        if tmp_path.is_file() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                warn!("failed to remove {}: {e}", tmp_path.display());
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::{
        domain::record::Record,
        storage::{
            error::StorageError,
            gateway::{PersistenceGateway, load, save},
            store::RecordStore,
        },
    };

    #[test]
    fn test_round_trip_empty_inventory() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("inventory.json");

        save(&[], &path)?;

        assert_eq!(load(&path)?, Vec::<Record>::new());
        Ok(())
    }

    #[test]
    fn test_round_trip_special_characters() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("inventory.json");
        let records = vec![
            Record::new(1, "Tab\there \"quoted\"", "Björk / Sigur Rós"),
            Record::new(-3, "Line\nbreak \\ backslash", "{ \"json\": true }"),
            Record::new(1, "", "日本語 🎵"),
        ];

        save(&records, &path)?;

        assert_eq!(load(&path)?, records);
        Ok(())
    }

    #[test]
    fn test_save_overwrites_previous_content() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let gateway = PersistenceGateway::new(tmp.path().join("inventory.json"));

        gateway.save(&[Record::new(1, "A", "B"), Record::new(2, "C", "D")])?;
        gateway.save(&[Record::new(3, "E", "F")])?;

        assert_eq!(gateway.load()?, vec![Record::new(3, "E", "F")]);
        assert!(!tmp.path().join("inventory.json.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("missing.json");

        let result = load(&path);
        assert!(matches!(result, Err(StorageError::FileNotFound { path: p }) if p == path));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_empty_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("empty.json");
        fs::write(&path, b"").unwrap();

        assert!(matches!(
            load(&path),
            Err(StorageError::EmptyOrCorrupt { .. })
        ));
    }

    #[test]
    fn test_load_truncated_file() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("inventory.json");
        save(&[Record::new(1, "Thriller", "Michael Jackson")], &path)?;

        let bytes = fs::read(&path)?;
        fs::write(&path, &bytes[..bytes.len() / 2])?;

        assert!(matches!(
            load(&path),
            Err(StorageError::EmptyOrCorrupt { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_load_unknown_version() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("inventory.json");
        fs::write(&path, r#"{ "version": 99, "saved_at": 0, "records": [] }"#).unwrap();

        match load(&path) {
            Err(StorageError::EmptyOrCorrupt { reason, .. }) => {
                assert!(reason.contains("99"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_failed_save_keeps_previous_file() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("inventory.json");
        let previous = vec![Record::new(1, "Thriller", "Michael Jackson")];
        save(&previous, &path)?;

        // a directory in place of the temp file makes the write fail
        fs::create_dir(tmp.path().join("inventory.json.tmp"))?;

        let result = save(&[Record::new(2, "Back in Black", "AC/DC")], &path);
        assert!(matches!(result, Err(StorageError::Fs(_))));
        assert_eq!(load(&path)?, previous);
        Ok(())
    }

    #[test]
    fn test_failed_rename_removes_temp_file() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("inventory.json");

        // a non-empty directory cannot be replaced by a file
        fs::create_dir(&path)?;
        fs::write(path.join("keep"), b"x")?;

        let result = save(&[Record::new(1, "A", "B")], &path);
        assert!(matches!(result, Err(StorageError::Fs(_))));
        assert!(!tmp.path().join("inventory.json.tmp").exists());
        assert!(path.join("keep").is_file());
        Ok(())
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("no-such-dir").join("inventory.json");

        assert!(matches!(save(&[], &path), Err(StorageError::Fs(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_two_albums_survive_a_new_session() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("CDInventory.json");

        let mut store = RecordStore::new();
        store.add(Record::new(1, "Thriller", "Michael Jackson"));
        store.add(Record::new(2, "Back in Black", "AC/DC"));
        PersistenceGateway::new(&path).save(store.snapshot())?;

        let mut reloaded = RecordStore::new();
        reloaded.replace(PersistenceGateway::new(&path).load()?);

        assert_eq!(
            reloaded.snapshot(),
            &[
                Record::new(1, "Thriller", "Michael Jackson"),
                Record::new(2, "Back in Black", "AC/DC"),
            ]
        );
        Ok(())
    }
}
