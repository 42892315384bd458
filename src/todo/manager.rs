use std::path::PathBuf;
use log::info;
use super::error::TodoError;
use super::item::{NewTodo, TodoChanges, TodoItem};
use super::storage::{JsonFileStorage, MemoryStorage, TodoStorage};

#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub show_completed: bool,
    pub sort_by_priority: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            show_completed: true,
            sort_by_priority: false,
        }
    }
}

/// Result of a completion toggle.
#[derive(Debug, Clone)]
pub struct Toggled {
    pub item: TodoItem,
    /// Successor created because a recurring task was just completed.
    pub regenerated: Option<TodoItem>,
}

/// Owns the ordered todo collection and writes it through to `S` after
/// every change. A change only becomes visible once the save succeeds.
pub struct TodoManager<S: TodoStorage> {
    storage: S,
    todos: Vec<TodoItem>,
    // Wider than an id so a loaded `u32::MAX` still has a successor value.
    next_id: u64,
}

impl TodoManager<MemoryStorage> {
    pub fn in_memory() -> Self {
        TodoManager::open(MemoryStorage::new())
    }
}

impl TodoManager<JsonFileStorage> {
    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        TodoManager::open(JsonFileStorage::new(path))
    }
}

impl<S: TodoStorage> TodoManager<S> {
    pub fn open(storage: S) -> Self {
        let todos = storage.load();
        let next_id = todos.iter().map(|todo| u64::from(todo.id)).max().map_or(1, |max| max + 1);
        info!("Loaded {} todos, next id {}", todos.len(), next_id);
        TodoManager {
            storage,
            todos,
            next_id,
        }
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[TodoItem] {
        &self.todos
    }

    fn peek_id(&self) -> Result<u32, TodoError> {
        u32::try_from(self.next_id).map_err(|_| TodoError::IdsExhausted)
    }

    // Saves `staged` and only then adopts it.
    fn commit(&mut self, staged: Vec<TodoItem>, next_id: u64) -> Result<(), TodoError> {
        self.storage.save(&staged)?;
        self.todos = staged;
        self.next_id = next_id;
        Ok(())
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    pub fn add(&mut self, mut new: NewTodo) -> Result<TodoItem, TodoError> {
        new.title = new.title.trim().to_string();
        if new.title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }

        let id = self.peek_id()?;
        let todo = TodoItem::new(id, new);
        let mut staged = self.todos.clone();
        staged.push(todo.clone());
        self.commit(staged, u64::from(id) + 1)?;
        info!("Added todo {}", id);
        Ok(todo)
    }

    pub fn get(&self, id: u32) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Newest first, or highest priority first (newest first within a
    /// priority) when `sort_by_priority` is set.
    pub fn list(&self, options: ListOptions) -> Vec<&TodoItem> {
        let mut todos: Vec<&TodoItem> = self
            .todos
            .iter()
            .filter(|todo| options.show_completed || !todo.completed)
            .collect();

        if options.sort_by_priority {
            todos.sort_by(|a, b| {
                (b.priority.rank(), b.created_at, b.id).cmp(&(a.priority.rank(), a.created_at, a.id))
            });
        } else {
            todos.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        }
        todos
    }

    pub fn update(&mut self, id: u32, mut changes: TodoChanges) -> Result<Option<TodoItem>, TodoError> {
        let index = match self.position(id) {
            Some(index) => index,
            None => return Ok(None),
        };

        if let Some(title) = changes.title.as_mut() {
            *title = title.trim().to_string();
            if title.is_empty() {
                return Err(TodoError::EmptyTitle);
            }
        }

        let mut staged = self.todos.clone();
        let todo = &mut staged[index];
        if let Some(title) = changes.title {
            todo.title = title;
        }
        if let Some(description) = changes.description {
            todo.description = description;
        }
        if let Some(priority) = changes.priority {
            todo.priority = priority;
        }
        if let Some(category) = changes.category {
            todo.category = category;
        }
        if let Some(due_date) = changes.due_date {
            todo.due_date = due_date;
        }
        if let Some(pattern) = changes.recurring_pattern {
            todo.recurring_pattern = pattern;
        }
        todo.touch();
        let updated = todo.clone();

        self.commit(staged, self.next_id)?;
        info!("Updated todo {}", id);
        Ok(Some(updated))
    }

    pub fn remove(&mut self, id: u32) -> Result<bool, TodoError> {
        let index = match self.position(id) {
            Some(index) => index,
            None => return Ok(false),
        };
        let mut staged = self.todos.clone();
        staged.remove(index);
        self.commit(staged, self.next_id)?;
        info!("Removed todo {}", id);
        Ok(true)
    }

    /// Flips completion. Completing a recurring task appends its successor;
    /// un-completing never removes one, so completing the same task again
    /// appends another successor.
    pub fn toggle_completion(&mut self, id: u32) -> Result<Option<Toggled>, TodoError> {
        let index = match self.position(id) {
            Some(index) => index,
            None => return Ok(None),
        };

        let mut staged = self.todos.clone();
        let todo = &mut staged[index];
        todo.completed = !todo.completed;
        todo.touch();
        let item = todo.clone();

        let mut next_id = self.next_id;
        let regenerated = if item.completed && item.recurring_pattern.is_recurring() {
            item.successor(self.peek_id()?)
        } else {
            None
        };
        if let Some(successor) = &regenerated {
            next_id = u64::from(successor.id) + 1;
            staged.push(successor.clone());
        }

        self.commit(staged, next_id)?;
        if let Some(successor) = &regenerated {
            info!("Todo {} recurs as {}", id, successor.id);
        }
        Ok(Some(Toggled { item, regenerated }))
    }
}
