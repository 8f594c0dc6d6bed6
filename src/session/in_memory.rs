use crate::session::errors::SessionError;
use std::collections::HashMap;
use std::sync::RwLock;

/// Key/value storage living only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let items = self.items.read().map_err(|_| SessionError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    pub fn set_item(&self, key: &str, value: String) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(|_| SessionError::Poisoned)?;
        items.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let mut items = self.items.write().map_err(|_| SessionError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_item_works() {
        let store = InMemoryStore::default();
        store
            .set_item("token", "abc".to_string())
            .expect("Failed to set item");
        assert_eq!(
            store.get_item("token").expect("Failed to get item"),
            Some("abc".to_string())
        );
    }

    #[test]
    fn remove_missing_item_is_noop() {
        let store = InMemoryStore::default();
        assert!(store.remove_item("token").is_ok());
        assert_eq!(store.get_item("token").expect("Failed to get item"), None);
    }
}
