use crate::session::errors::SessionError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key/value storage persisted as a JSON object on disk, so a session
/// survives between invocations of the CLI.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl From<String> for FileStore {
    fn from(file_path: String) -> Self {
        Self {
            path: PathBuf::from(file_path),
            guard: Mutex::new(()),
        }
    }
}

impl FileStore {
    fn read_all(&self) -> Result<HashMap<String, String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(data) if data.trim().is_empty() => Ok(HashMap::new()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(items)?)?;
        Ok(())
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _lock = self.guard.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    pub fn set_item(&self, key: &str, value: String) -> Result<(), SessionError> {
        let _lock = self.guard.lock().map_err(|_| SessionError::Poisoned)?;
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value);
        self.write_all(&items)
    }

    pub fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let _lock = self.guard.lock().map_err(|_| SessionError::Poisoned)?;
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let path = std::env::temp_dir()
            .join(format!("tracker-{}-{name}", std::process::id()))
            .join("session.json");
        path.to_string_lossy().to_string()
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let store = FileStore::from(temp_path("missing"));
        assert_eq!(store.get_item("token").expect("Failed to read"), None);
    }

    #[test]
    fn items_survive_a_new_store() {
        let path = temp_path("persist");
        FileStore::from(path.clone())
            .set_item("token", "abc".to_string())
            .expect("Failed to write");
        let reopened = FileStore::from(path.clone());
        assert_eq!(
            reopened.get_item("token").expect("Failed to read"),
            Some("abc".to_string())
        );
        reopened.remove_item("token").expect("Failed to remove");
        assert_eq!(reopened.get_item("token").expect("Failed to read"), None);
        let _ = fs::remove_file(path);
    }
}
