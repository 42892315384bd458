use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum TodoError {
    EmptyTitle,
    InvalidPriority(String),
    InvalidDate(String),
    InvalidRecurrence(String),
    IdsExhausted,
    Storage { path: PathBuf, source: io::Error },
    Encode(serde_json::Error),
}

impl fmt::Display for TodoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoError::EmptyTitle => write!(f, "Title is required!"),
            TodoError::InvalidPriority(value) => write!(
                f,
                "Invalid priority: {}. Must be one of: High, Medium, Low",
                value
            ),
            TodoError::InvalidDate(value) => write!(
                f,
                "Invalid date format: {}. Expected format: YYYY-MM-DD",
                value
            ),
            TodoError::InvalidRecurrence(value) => write!(
                f,
                "Invalid recurring pattern: {}. Must be one of: Daily, Weekly, Monthly, or empty",
                value
            ),
            TodoError::IdsExhausted => write!(f, "No todo ids left: the largest id is {}", u32::MAX),
            TodoError::Storage { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            TodoError::Encode(e) => write!(f, "Failed to encode todos: {}", e),
        }
    }
}

impl std::error::Error for TodoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TodoError::Storage { source, .. } => Some(source),
            TodoError::Encode(e) => Some(e),
            _ => None,
        }
    }
}
