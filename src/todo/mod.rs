//! Command-line todo list: items with priority, category, due date and
//! recurrence, kept either in memory or in a JSON file.

pub mod cli;
pub mod error;
pub mod item;
pub mod manager;
pub mod storage;

pub use error::TodoError;
pub use item::{NewTodo, Priority, RecurringPattern, TodoChanges, TodoItem};
pub use manager::{ListOptions, TodoManager, Toggled};
pub use storage::{JsonFileStorage, MemoryStorage, TodoStorage};
