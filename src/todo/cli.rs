//! Interactive numbered menu over a [`TodoManager`].
//!
//! Reads from any `BufRead` and writes to any `Write` so the whole loop
//! can be driven from tests.

use std::io::{self, BufRead, Write};
use chrono::NaiveDate;
use super::error::TodoError;
use super::item::{parse_due_date, NewTodo, Priority, RecurringPattern, TodoChanges, TodoItem};
use super::manager::{ListOptions, TodoManager};
use super::storage::TodoStorage;

const RULE_WIDTH: usize = 50;
const TABLE_WIDTH: usize = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Add,
    List,
    Update,
    Complete,
    Delete,
    Show,
    Help,
    Exit,
}

impl Command {
    fn parse(choice: &str) -> Option<Command> {
        match choice.trim().to_lowercase().as_str() {
            "1" | "add" => Some(Command::Add),
            "2" | "list" => Some(Command::List),
            "3" | "update" => Some(Command::Update),
            "4" | "complete" => Some(Command::Complete),
            "5" | "delete" => Some(Command::Delete),
            "6" | "show" => Some(Command::Show),
            "7" | "help" => Some(Command::Help),
            "8" | "exit" | "quit" => Some(Command::Exit),
            _ => None,
        }
    }
}

// End of input ends the session
enum Flow {
    Continue,
    Stop,
}

enum IdInput {
    Id(u32),
    NotANumber,
    EndOfInput,
}

struct Menu<'a, R, W, S: TodoStorage> {
    input: R,
    output: W,
    manager: &'a mut TodoManager<S>,
}

/// Runs the menu loop until the user exits or input ends.
pub fn run<R: BufRead, W: Write, S: TodoStorage>(
    manager: &mut TodoManager<S>,
    input: R,
    output: W,
) -> io::Result<()> {
    Menu { input, output, manager }.run()
}

impl<'a, R: BufRead, W: Write, S: TodoStorage> Menu<'a, R, W, S> {
    fn run(mut self) -> io::Result<()> {
        writeln!(self.output, "Welcome to the Advanced Todo App!")?;
        writeln!(self.output, "Type '7' or 'help' for available commands.")?;

        loop {
            self.print_menu()?;
            let choice = match self.prompt("\nEnter your choice (1-8): ")? {
                Some(choice) => choice,
                None => return self.goodbye(),
            };

            let flow = match Command::parse(&choice) {
                Some(Command::Add) => self.add()?,
                Some(Command::List) => self.list()?,
                Some(Command::Update) => self.update()?,
                Some(Command::Complete) => self.complete()?,
                Some(Command::Delete) => self.delete()?,
                Some(Command::Show) => self.show()?,
                Some(Command::Help) => {
                    self.print_help()?;
                    Flow::Continue
                }
                Some(Command::Exit) => {
                    writeln!(self.output, "Thank you for using the Advanced Todo App!")?;
                    return Ok(());
                }
                None => {
                    writeln!(self.output, "Invalid choice. Please enter a number between 1-8.")?;
                    Flow::Continue
                }
            };

            if let Flow::Stop = flow {
                return self.goodbye();
            }
        }
    }

    fn goodbye(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n\nGoodbye!")?;
        self.output.flush()
    }

    /// Prints `text`, reads one line and trims it. `None` on end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_id(&mut self, text: &str) -> io::Result<IdInput> {
        let Some(raw) = self.prompt(text)? else { return Ok(IdInput::EndOfInput) };
        match raw.parse::<u32>() {
            Ok(id) => Ok(IdInput::Id(id)),
            Err(_) => {
                writeln!(self.output, "Task ID must be a number.")?;
                Ok(IdInput::NotANumber)
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "\n{}", rule)?;
        writeln!(self.output, "           TODO APPLICATION")?;
        writeln!(self.output, "{}", rule)?;
        for line in [
            "1. Add Task",
            "2. List Tasks",
            "3. Update Task",
            "4. Complete Task",
            "5. Delete Task",
            "6. Show Task Details",
            "7. Help",
            "8. Exit",
        ] {
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output, "{}", rule)
    }

    fn print_help(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nCOMMAND REFERENCE:")?;
        for line in [
            "Add Task: Add a new task with title, description, priority, category, due date, and recurring pattern",
            "List Tasks: View all tasks or filter by status/priority",
            "Update Task: Modify an existing task's details",
            "Complete Task: Mark a task as completed",
            "Delete Task: Remove a task permanently",
            "Show Task Details: View detailed information about a specific task",
            "Help: Show this help message",
            "Exit: Quit the application",
        ] {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn report(&mut self, error: &TodoError) -> io::Result<()> {
        writeln!(self.output, "{}", error)
    }

    fn add(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- ADD TASK ---")?;
        let Some(title) = self.prompt("Enter task title: ")? else { return Ok(Flow::Stop) };
        if title.is_empty() {
            self.report(&TodoError::EmptyTitle)?;
            return Ok(Flow::Continue);
        }
        let Some(description) = self.prompt("Enter description (optional): ")? else { return Ok(Flow::Stop) };
        let Some(priority) = self.prompt("Enter priority (High/Medium/Low, default: Medium): ")? else {
            return Ok(Flow::Stop);
        };
        let Some(category) = self.prompt("Enter category (optional): ")? else { return Ok(Flow::Stop) };
        let Some(due_date) = self.prompt("Enter due date (YYYY-MM-DD, optional): ")? else {
            return Ok(Flow::Stop);
        };
        let Some(recurring) = self.prompt("Enter recurring pattern (Daily/Weekly/Monthly, optional): ")? else {
            return Ok(Flow::Stop);
        };

        let due_date = match parse_due_date(&due_date) {
            Ok(due_date) => due_date,
            Err(e) => {
                self.report(&e)?;
                return Ok(Flow::Continue);
            }
        };

        let new = NewTodo {
            title,
            description,
            priority: priority.parse().unwrap_or_default(),
            category,
            due_date,
            recurring_pattern: recurring.parse().unwrap_or_default(),
        };
        match self.manager.add(new) {
            Ok(todo) => writeln!(self.output, "Task added successfully with ID: {}", todo.id)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- LIST TASKS ---")?;
        writeln!(self.output, "1. All Tasks")?;
        writeln!(self.output, "2. Pending Tasks Only")?;
        writeln!(self.output, "3. Sort by Priority")?;
        let Some(choice) = self.prompt("Choose option (1-3): ")? else { return Ok(Flow::Stop) };

        let options = match choice.as_str() {
            "2" => ListOptions { show_completed: false, sort_by_priority: false },
            "3" => ListOptions { show_completed: true, sort_by_priority: true },
            _ => ListOptions::default(),
        };

        let rows: Vec<String> = self.manager.list(options).into_iter().map(table_row).collect();
        if rows.is_empty() {
            writeln!(self.output, "No tasks found.")?;
            return Ok(Flow::Continue);
        }

        writeln!(
            self.output,
            "\n{:<3} {:<6} {:<8} {:<20} {:<12} {:<12} {:<10}",
            "ID", "Status", "Priority", "Title", "Category", "Due Date", "Recurring"
        )?;
        writeln!(self.output, "{}", "-".repeat(TABLE_WIDTH))?;
        for row in rows {
            writeln!(self.output, "{}", row)?;
        }
        Ok(Flow::Continue)
    }

    fn update(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- UPDATE TASK ---")?;
        let id = match self.prompt_id("Enter task ID to update: ")? {
            IdInput::Id(id) => id,
            IdInput::NotANumber => return Ok(Flow::Continue),
            IdInput::EndOfInput => return Ok(Flow::Stop),
        };
        let current = match self.manager.get(id) {
            Some(todo) => todo.clone(),
            None => {
                writeln!(self.output, "Task with ID {} not found.", id)?;
                return Ok(Flow::Continue);
            }
        };

        writeln!(self.output, "Current task: {}", current)?;
        writeln!(self.output, "Leave blank to keep current value")?;

        let Some(title) = self.prompt(&format!("Enter new title (current: {}): ", current.title))? else {
            return Ok(Flow::Stop);
        };
        let Some(description) =
            self.prompt(&format!("Enter new description (current: {}): ", current.description))?
        else {
            return Ok(Flow::Stop);
        };
        let Some(priority) = self.prompt(&format!(
            "Enter new priority (High/Medium/Low, current: {}): ",
            current.priority
        ))?
        else {
            return Ok(Flow::Stop);
        };
        let Some(category) = self.prompt(&format!("Enter new category (current: {}): ", current.category))? else {
            return Ok(Flow::Stop);
        };
        let Some(due_date) = self.prompt(&format!(
            "Enter new due date (YYYY-MM-DD, current: {}): ",
            format_date(current.due_date)
        ))?
        else {
            return Ok(Flow::Stop);
        };
        let Some(recurring) = self.prompt(&format!(
            "Enter new recurring pattern (Daily/Weekly/Monthly, current: {}): ",
            current.recurring_pattern
        ))?
        else {
            return Ok(Flow::Stop);
        };

        let due_date = if due_date.is_empty() {
            None
        } else {
            match parse_due_date(&due_date) {
                Ok(date) => Some(date),
                Err(e) => {
                    self.report(&e)?;
                    writeln!(self.output, "Failed to update task.")?;
                    return Ok(Flow::Continue);
                }
            }
        };

        let changes = TodoChanges {
            title: non_empty(title),
            description: non_empty(description),
            priority: priority.parse::<Priority>().ok(),
            category: non_empty(category),
            due_date,
            recurring_pattern: recurring
                .parse::<RecurringPattern>()
                .ok()
                .filter(|pattern| pattern.is_recurring()),
        };

        match self.manager.update(id, changes) {
            Ok(Some(_)) => writeln!(self.output, "Task updated successfully!")?,
            Ok(None) => writeln!(self.output, "Failed to update task.")?,
            Err(e) => {
                self.report(&e)?;
                writeln!(self.output, "Failed to update task.")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn complete(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- COMPLETE TASK ---")?;
        let id = match self.prompt_id("Enter task ID to mark as complete: ")? {
            IdInput::Id(id) => id,
            IdInput::NotANumber => return Ok(Flow::Continue),
            IdInput::EndOfInput => return Ok(Flow::Stop),
        };

        match self.manager.toggle_completion(id) {
            Ok(Some(toggled)) => {
                let status = if toggled.item.completed { "completed" } else { "incomplete" };
                writeln!(self.output, "Task marked as {}.", status)?;
                if let Some(next) = toggled.regenerated {
                    writeln!(
                        self.output,
                        "New recurring task created based on pattern: {} (ID: {})",
                        toggled.item.recurring_pattern, next.id
                    )?;
                }
            }
            Ok(None) => writeln!(self.output, "Task with ID {} not found.", id)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- DELETE TASK ---")?;
        let id = match self.prompt_id("Enter task ID to delete: ")? {
            IdInput::Id(id) => id,
            IdInput::NotANumber => return Ok(Flow::Continue),
            IdInput::EndOfInput => return Ok(Flow::Stop),
        };

        match self.manager.remove(id) {
            Ok(true) => writeln!(self.output, "Task deleted successfully.")?,
            Ok(false) => writeln!(self.output, "Task with ID {} not found.", id)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn show(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- TASK DETAILS ---")?;
        let id = match self.prompt_id("Enter task ID to view: ")? {
            IdInput::Id(id) => id,
            IdInput::NotANumber => return Ok(Flow::Continue),
            IdInput::EndOfInput => return Ok(Flow::Stop),
        };

        let text = match self.manager.get(id) {
            Some(todo) => details(todo),
            None => format!("Task with ID {} not found.", id),
        };
        writeln!(self.output, "{}", text)?;
        Ok(Flow::Continue)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

fn table_row(todo: &TodoItem) -> String {
    let status = if todo.completed { "✓" } else { "○" };
    format!(
        "{:<3} {:<6} {:<8} {:<20} {:<12} {:<12} {:<10}",
        todo.id,
        status,
        todo.priority.as_str(),
        truncate(&todo.title, 19),
        truncate(&or_placeholder(todo.category.clone(), "N/A"), 11),
        or_placeholder(format_date(todo.due_date), "N/A"),
        or_placeholder(todo.recurring_pattern.to_string(), "N/A"),
    )
}

fn details(todo: &TodoItem) -> String {
    [
        format!("\nID: {}", todo.id),
        format!("Title: {}", todo.title),
        format!("Description: {}", todo.description),
        format!("Status: {}", if todo.completed { "Completed" } else { "Pending" }),
        format!("Priority: {}", todo.priority),
        format!("Category: {}", or_placeholder(todo.category.clone(), "None")),
        format!("Due Date: {}", or_placeholder(format_date(todo.due_date), "None")),
        format!("Recurring: {}", or_placeholder(todo.recurring_pattern.to_string(), "No")),
        format!("Created: {}", todo.created_at.format("%Y-%m-%dT%H:%M:%S%.6f")),
        format!("Updated: {}", todo.updated_at.format("%Y-%m-%dT%H:%M:%S%.6f")),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drive(manager: &mut TodoManager<crate::todo::MemoryStorage>, script: &str) -> String {
        let mut output = Vec::new();
        run(manager, Cursor::new(script.as_bytes().to_vec()), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn add_then_exit() {
        let mut manager = TodoManager::in_memory();
        let out = drive(&mut manager, "1\nBuy milk\n2%\nHigh\nshopping\n2024-01-05\n\n8\n");

        assert!(out.contains("Task added successfully with ID: 1"));
        assert!(out.contains("Thank you for using the Advanced Todo App!"));
        let todo = manager.get(1).unwrap();
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.category, "shopping");
        assert_eq!(format_date(todo.due_date), "2024-01-05");
    }

    #[test]
    fn unknown_priority_and_pattern_fall_back_to_defaults() {
        let mut manager = TodoManager::in_memory();
        drive(&mut manager, "add\nTask\n\nurgent\n\n\nYearly\nexit\n");
        let todo = manager.get(1).unwrap();
        assert_eq!(todo.priority, Priority::Medium);
        assert_eq!(todo.recurring_pattern, RecurringPattern::Never);
    }

    #[test]
    fn bad_due_date_aborts_add() {
        let mut manager = TodoManager::in_memory();
        let out = drive(&mut manager, "1\nTask\n\n\n\n01/02/2024\n\n8\n");
        assert!(out.contains("Invalid date format: 01/02/2024"));
        assert!(manager.is_empty());
    }

    #[test]
    fn empty_title_is_refused() {
        let mut manager = TodoManager::in_memory();
        let out = drive(&mut manager, "1\n\n8\n");
        assert!(out.contains("Title is required!"));
        assert!(manager.is_empty());
    }

    #[test]
    fn completing_recurring_task_reports_successor() {
        let mut manager = TodoManager::in_memory();
        let out = drive(&mut manager, "1\nYoga\n\n\n\n2024-01-01\nDaily\n4\n1\n8\n");
        assert!(out.contains("Task marked as completed."));
        assert!(out.contains("New recurring task created based on pattern: Daily (ID: 2)"));
        assert_eq!(format_date(manager.get(2).unwrap().due_date), "2024-01-02");
    }

    #[test]
    fn non_numeric_id_is_reported() {
        let mut manager = TodoManager::in_memory();
        let out = drive(&mut manager, "5\nabc\n8\n");
        assert!(out.contains("Task ID must be a number."));
    }

    #[test]
    fn update_keeps_blank_fields() {
        let mut manager = TodoManager::in_memory();
        manager
            .add(NewTodo { category: "home".into(), ..NewTodo::titled("Old") })
            .unwrap();
        let out = drive(&mut manager, "3\n1\nNew\n\nLow\n\n\n\n8\n");
        assert!(out.contains("Task updated successfully!"));
        let todo = manager.get(1).unwrap();
        assert_eq!(todo.title, "New");
        assert_eq!(todo.priority, Priority::Low);
        assert_eq!(todo.category, "home");
    }

    #[test]
    fn list_prints_table() {
        let mut manager = TodoManager::in_memory();
        manager.add(NewTodo::titled("A fairly long task title here")).unwrap();
        let out = drive(&mut manager, "2\n1\n8\n");
        assert!(out.contains("ID  Status Priority Title"));
        assert!(out.contains("A fairly long task "));
        assert!(!out.contains("A fairly long task title"));
    }

    #[test]
    fn empty_list_says_so() {
        let mut manager = TodoManager::in_memory();
        let out = drive(&mut manager, "list\n2\n8\n");
        assert!(out.contains("No tasks found."));
    }

    #[test]
    fn show_and_delete() {
        let mut manager = TodoManager::in_memory();
        manager.add(NewTodo::titled("Inspect")).unwrap();
        let out = drive(&mut manager, "6\n1\n5\n1\n6\n1\n8\n");
        assert!(out.contains("Title: Inspect"));
        assert!(out.contains("Recurring: No"));
        assert!(out.contains("Task deleted successfully."));
        assert!(out.contains("Task with ID 1 not found."));
    }

    #[test]
    fn end_of_input_says_goodbye() {
        let mut manager = TodoManager::in_memory();
        let out = drive(&mut manager, "1\nHalf typed");
        assert!(out.ends_with("Goodbye!\n"));
        assert!(manager.is_empty());
    }

    #[test]
    fn invalid_choice_is_reported() {
        let mut manager = TodoManager::in_memory();
        let out = drive(&mut manager, "9\nquit\n");
        assert!(out.contains("Invalid choice. Please enter a number between 1-8."));
    }
}
