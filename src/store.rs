use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::Result;
use crate::models::Db;

// JSON file holding the study schedule.
// Writes go through a temp file + rename so a crash never leaves half a file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // A store that has never been written reads as empty
    pub fn load(&self) -> Result<Db> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no schedule file yet");
                return Ok(Db::default());
            }
            Err(e) => return Err(e.into()),
        };
        let db: Db = serde_json::from_str(&text)?;
        Ok(db)
    }

    pub fn save(&self, db: &Db) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(db)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&tmp_path, text)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = %self.path.display(), tasks = db.tasks.len(), "schedule saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::logging;
    use crate::models::{Task, TaskStatus};

    #[test]
    fn missing_file_loads_empty() {
        logging::init_test();
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("db.json"));
        assert!(store.load().unwrap().tasks.is_empty());
    }

    #[test]
    fn save_then_load_keeps_order_and_creates_parent() {
        logging::init_test();
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("nested").join("db.json"));

        let db = Db {
            tasks: vec![
                Task::new("Initial Review", "2025-01-01T09:00:00.000+00:00", TaskStatus::Done),
                Task::new("Reading", "No Date", TaskStatus::Other("Paused".into())),
            ],
        };
        store.save(&db).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.tasks, db.tasks);
        assert!(!dir.path().join("nested").join("db.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Store::new(&path).load().unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }
}
