use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::models::SessionUser;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "jwt";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage database: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage lock poisoned")]
    Lock,
}

/// Process-wide key/value storage, the equivalent of the browser's
/// `localStorage`.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Lock)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Lock)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Lock)?;
        items.remove(key);
        Ok(())
    }
}

/// Typed access to the session entries kept in [`LocalStorage`].
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn LocalStorage>,
}

impl Session {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Session { storage }
    }

    pub fn in_memory() -> Self {
        Session::new(Arc::new(MemoryStorage::new()))
    }

    pub fn save_user(&self, user: &SessionUser) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)?;
        self.storage.set_item(USER_KEY, &raw)
    }

    pub fn current_user(&self) -> Result<Option<SessionUser>, StorageError> {
        match self.storage.get_item(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn current_email(&self) -> Result<Option<String>, StorageError> {
        Ok(self.current_user()?.map(|user| user.email))
    }

    pub fn save_token(&self, jwt: &str) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_KEY, jwt)
    }

    pub fn token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get_item(TOKEN_KEY)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(USER_KEY)?;
        self.storage.remove_item(TOKEN_KEY)
    }
}
