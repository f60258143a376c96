//! Persisted user preferences (locale, theme).
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use parking_lot::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key/value storage that survives restarts.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Flat JSON object on disk, cached in memory after the first read.
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    /// `<config_dir>/portfolio/preferences.json`, or the working directory
    /// when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("portfolio").join("preferences.json")
    }

    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path);
        Self { path, values: Mutex::new(values) }
    }
}

/// Sibling `<name>.tmp` that is renamed over the real file once written.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn read_values(path: &Path) -> BTreeMap<String, String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
            BTreeMap::new()
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read preferences");
            BTreeMap::new()
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> { self.values.lock().get(key).cloned() }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        let encoded = serde_json::to_string_pretty(&*values)?;
        let tmp = tmp_path(&self.path);
        let write = |p: &Path| -> std::io::Result<()> {
            if let Some(dir) = p.parent() { std::fs::create_dir_all(dir)?; }
            std::fs::write(&tmp, encoded.as_bytes())?;
            std::fs::rename(&tmp, p)
        };
        write(&self.path).map_err(|source| PrefsError::Write { path: self.path.clone(), source })?;
        tracing::debug!(path = %self.path.display(), key, "saved preferences");
        Ok(())
    }
}

/// Process-local store.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> { self.values.lock().get(key).cloned() }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
