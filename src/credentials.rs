//! Credential storage scoped to the calling user.
//!
//! The pipeline only ever reads the single [`API_KEY_PROPERTY`] entry; writes
//! go through [`CellGpt::set_api_key`](crate::CellGpt::set_api_key).

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;

use crate::{CellGptError, Result};

/// Name of the property holding the completion API key.
pub const API_KEY_PROPERTY: &str = "OPENAI_API_KEY";

/// A key-value property store.
pub trait PropertyStore: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>>;
    fn set(&self, name: &str, value: &str) -> Result<()>;
    fn delete(&self, name: &str) -> Result<()>;
}

/// Process-local property store.
#[derive(Default)]
pub struct MemoryPropertyStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with an API key.
    pub fn with_api_key(key: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(API_KEY_PROPERTY.to_string(), key.into());
        }
        store
    }
}

fn poisoned() -> CellGptError {
    CellGptError::Store("property store lock poisoned".to_string())
}

impl PropertyStore for MemoryPropertyStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.remove(name);
        Ok(())
    }
}

/// Properties persisted as a flat TOML table.
///
/// Writes are atomic and the file is only ever created with mode 0600. It is
/// refused on read if group or other permission bits are set (Unix only).
pub struct FilePropertyStore {
    path: PathBuf,
}

impl FilePropertyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.cellgpt/credentials.toml`, if a home directory is known.
    pub fn default_location() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(".cellgpt").join("credentials.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        check_permissions(&self.path)?;
        let content = fs::read_to_string(&self.path).map_err(|e| {
            CellGptError::Store(format!("Failed to read credentials file {:?}: {e}", self.path))
        })?;
        toml::from_str(&content).map_err(|e| {
            CellGptError::Store(format!("Failed to parse credentials file {:?}: {e}", self.path))
        })
    }

    /// Write a private sibling temp file, then rename it over the target.
    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| {
            CellGptError::Store(format!("Failed to create directory {dir:?}: {e}"))
        })?;

        let content = toml::to_string(values)
            .map_err(|e| CellGptError::Store(format!("Failed to encode credentials: {e}")))?;

        let write_error = |e: std::io::Error| {
            CellGptError::Store(format!("Failed to write credentials file {:?}: {e}", self.path))
        };
        // tempfile creates the file 0600 on Unix
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
        restrict_permissions(tmp.path())?;
        tmp.write_all(content.as_bytes()).map_err(write_error)?;
        tmp.as_file().sync_all().map_err(write_error)?;
        tmp.persist(&self.path).map_err(|e| write_error(e.error))?;
        Ok(())
    }
}

impl PropertyStore for FilePropertyStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(name))
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(name.to_string(), value.to_string());
        self.save(&values)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut values = self.load()?;
        if values.remove(name).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// Reject credential files readable by group or others.
#[cfg(unix)]
fn check_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|e| {
        CellGptError::Store(format!("Failed to stat credentials file {path:?}: {e}"))
    })?;

    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(CellGptError::Store(format!(
            "Credentials file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
            mode & 0o777
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
        CellGptError::Store(format!("Failed to set permissions on {path:?}: {e}"))
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
