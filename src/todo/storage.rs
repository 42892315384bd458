use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use log::{debug, warn};
use super::error::TodoError;
use super::item::TodoItem;

pub const DEFAULT_STORAGE_FILE: &str = "todos.json";

/// Backing store for a todo collection. `save` always receives the whole
/// collection.
pub trait TodoStorage {
    fn load(&self) -> Vec<TodoItem>;
    fn save(&mut self, items: &[TodoItem]) -> Result<(), TodoError>;
}

/// Keeps items for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Vec<TodoItem>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<TodoItem>) -> Self {
        MemoryStorage { items }
    }
}

impl TodoStorage for MemoryStorage {
    fn load(&self) -> Vec<TodoItem> {
        self.items.clone()
    }

    fn save(&mut self, items: &[TodoItem]) -> Result<(), TodoError> {
        self.items = items.to_vec();
        Ok(())
    }
}

/// A JSON array of items in a single file, rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }
}

impl Default for JsonFileStorage {
    fn default() -> Self {
        JsonFileStorage::new(DEFAULT_STORAGE_FILE)
    }
}

impl TodoStorage for JsonFileStorage {
    // An absent, unreadable or malformed file all load as an empty list.
    fn load(&self) -> Vec<TodoItem> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No todo file at {}, starting empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read {}: {}; starting empty", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(items) => items,
            Err(e) => {
                warn!("Discarding malformed todo file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn save(&mut self, items: &[TodoItem]) -> Result<(), TodoError> {
        let json = serde_json::to_string_pretty(items).map_err(TodoError::Encode)?;
        fs::write(&self.path, json).map_err(|source| TodoError::Storage {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved {} todos to {}", items.len(), self.path.display());
        Ok(())
    }
}
