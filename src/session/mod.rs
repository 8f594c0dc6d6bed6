use crate::configuration::{SessionSettings, SessionStoreType};
use crate::data_models::AuthSession;
use crate::errors::ConfigurationError;
use tracing::debug;

mod errors;
pub mod file;
pub mod in_memory;

pub use errors::SessionError;
use file::FileStore;
use in_memory::InMemoryStore;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Where the authentication context lives between requests.
#[derive(Debug)]
pub enum SessionStorage {
    InMemory(InMemoryStore),
    File(FileStore),
}

impl Default for SessionStorage {
    fn default() -> Self {
        Self::InMemory(InMemoryStore::default())
    }
}

impl TryFrom<&SessionSettings> for SessionStorage {
    type Error = ConfigurationError;

    fn try_from(settings: &SessionSettings) -> Result<Self, Self::Error> {
        settings.check_if_valid()?;
        match (settings.store_type, &settings.file_path) {
            (SessionStoreType::File, Some(path)) => Ok(Self::File(FileStore::from(path.clone()))),
            (SessionStoreType::File, None) => Err(ConfigurationError::MissingSessionFile),
            (SessionStoreType::InMemory, _) => Ok(Self::default()),
        }
    }
}

impl SessionStorage {
    pub fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        match self {
            SessionStorage::InMemory(store) => store.get_item(key),
            SessionStorage::File(store) => store.get_item(key),
        }
    }

    pub fn set_item(&self, key: &str, value: String) -> Result<(), SessionError> {
        match self {
            SessionStorage::InMemory(store) => store.set_item(key, value),
            SessionStorage::File(store) => store.set_item(key, value),
        }
    }

    pub fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        match self {
            SessionStorage::InMemory(store) => store.remove_item(key),
            SessionStorage::File(store) => store.remove_item(key),
        }
    }

    /// A blank token counts as no token.
    pub fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self
            .get_item(TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty()))
    }

    pub fn user(&self) -> Result<Option<serde_json::Value>, SessionError> {
        match self.get_item(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, session: &AuthSession) -> Result<(), SessionError> {
        self.set_item(TOKEN_KEY, session.token.clone())?;
        self.set_item(USER_KEY, serde_json::to_string(&session.user)?)?;
        debug!("session stored");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.remove_item(TOKEN_KEY)?;
        self.remove_item(USER_KEY)?;
        debug!("session cleared");
        Ok(())
    }
}
