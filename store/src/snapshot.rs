//! Snapshot persistence: the exported node directory as one JSON document.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{NodeDb, StoreError};

/// Where snapshots are loaded from at startup and written to each cycle.
pub trait SnapshotStore: Send + Sync {
    /// Load the last snapshot. A store that has never been written is empty.
    fn load(&self) -> Result<NodeDb, StoreError>;

    /// Replace the snapshot with `db`. On error the previous snapshot is
    /// left as it was.
    fn save(&self, db: &NodeDb) -> Result<(), StoreError>;
}

/// A JSON file replaced atomically by rename on each save.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temporary files are created next to the target so the final rename
    /// never crosses filesystems.
    fn temp_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<NodeDb, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(NodeDb::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Corruption {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, db: &NodeDb) -> Result<(), StoreError> {
        let prefix = self
            .path
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(self.path.clone()))?;
        let mut temp = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(self.temp_dir())?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer(&mut writer, db)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        // Closes the file; the path is still deleted on drop until persisted.
        let temp = temp.into_temp_path();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp, fs::Permissions::from_mode(0o644))?;
        }
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
