use crate::errors::AttendanceError;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    fs,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Teacher,
    Courses,
    Students,
    Attendance,
}

impl StorageKey {
    pub fn namespace(self) -> &'static str {
        match self {
            StorageKey::Teacher => "nu_teacher_v1",
            StorageKey::Courses => "nu_courses_v1",
            StorageKey::Students => "nu_students_v1",
            StorageKey::Attendance => "nu_attendance_v1",
        }
    }
}

pub trait Store: Send + Sync {
    fn read(&self, key: StorageKey) -> io::Result<Option<String>>;

    fn write(&self, key: StorageKey, value: &str) -> io::Result<()>;

    fn remove(&self, key: StorageKey) -> io::Result<()>;
}

/// Loads `key`, returning `None` when it is absent, `null`, unreadable or
/// does not parse as `T`.
pub fn load_opt<T: DeserializeOwned>(store: &dyn Store, key: StorageKey) -> Option<T> {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            error!(key = key.namespace(), "failed to read stored value: {err}");
            return None;
        }
    };

    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(key = key.namespace(), "discarding corrupt stored value: {err}");
            None
        }
    }
}

pub fn load<T: DeserializeOwned>(store: &dyn Store, key: StorageKey, default: T) -> T {
    load_opt(store, key).unwrap_or(default)
}

pub fn save<T: Serialize>(store: &dyn Store, key: StorageKey, value: &T) -> Result<(), AttendanceError> {
    let payload = serde_json::to_string_pretty(value)?;
    store.write(key, &payload)?;
    debug!(key = key.namespace(), bytes = payload.len(), "saved value");
    Ok(())
}

pub fn remove(store: &dyn Store, key: StorageKey) -> Result<(), AttendanceError> {
    store.remove(key)?;
    debug!(key = key.namespace(), "removed value");
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<StorageKey, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store for MemoryStore {
    fn read(&self, key: StorageKey) -> io::Result<Option<String>> {
        Ok(self.values().get(&key).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> io::Result<()> {
        self.values().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> io::Result<()> {
        self.values().remove(&key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.namespace()))
    }
}

impl Store for JsonFileStore {
    fn read(&self, key: StorageKey) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, key: StorageKey, value: &str) -> io::Result<()> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    fn remove(&self, key: StorageKey) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}
