use std::fmt;
use std::str::FromStr;
use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use super::error::TodoError;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    // Higher sorts first
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn indicator(self) -> char {
        match self {
            Priority::High => '!',
            Priority::Medium => '~',
            Priority::Low => '.',
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Priority::High),
            "Medium" => Ok(Priority::Medium),
            "Low" => Ok(Priority::Low),
            other => Err(TodoError::InvalidPriority(other.to_string())),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Unknown stored values load as Medium instead of failing the whole file.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(value.parse().unwrap_or_default())
    }
}

/// How a task repeats once completed. Stored as `""`, `"Daily"`,
/// `"Weekly"` or `"Monthly"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecurringPattern {
    #[default]
    Never,
    Daily,
    Weekly,
    Monthly,
}

impl RecurringPattern {
    pub fn as_str(self) -> &'static str {
        match self {
            RecurringPattern::Never => "",
            RecurringPattern::Daily => "Daily",
            RecurringPattern::Weekly => "Weekly",
            RecurringPattern::Monthly => "Monthly",
        }
    }

    pub fn is_recurring(self) -> bool {
        self != RecurringPattern::Never
    }

    /// Days between a due date and its successor's. Monthly is a flat
    /// 30 days, not a calendar month.
    pub fn interval_days(self) -> Option<u64> {
        match self {
            RecurringPattern::Never => None,
            RecurringPattern::Daily => Some(1),
            RecurringPattern::Weekly => Some(7),
            RecurringPattern::Monthly => Some(30),
        }
    }

    /// Due date of the successor task. An absent due date stays absent.
    pub fn next_due(self, due: Option<NaiveDate>) -> Option<NaiveDate> {
        let days = self.interval_days()?;
        due?.checked_add_days(Days::new(days))
    }
}

impl fmt::Display for RecurringPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurringPattern {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(RecurringPattern::Never),
            "Daily" => Ok(RecurringPattern::Daily),
            "Weekly" => Ok(RecurringPattern::Weekly),
            "Monthly" => Ok(RecurringPattern::Monthly),
            other => Err(TodoError::InvalidRecurrence(other.to_string())),
        }
    }
}

impl Serialize for RecurringPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecurringPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(value.parse().unwrap_or_default())
    }
}

/// Parses a user-entered due date. Blank input means "no due date";
/// anything else must be a real `YYYY-MM-DD` calendar date.
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, TodoError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let bytes = input.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(TodoError::InvalidDate(input.to_string()));
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|_| TodoError::InvalidDate(input.to_string()))
}

mod due_date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if value.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&value, DATE_FORMAT)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid due date {:?}", value)))
    }
}

/// One todo entry. Field names and order are the JSON file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub recurring_pattern: RecurringPattern,
    #[serde(default = "now")]
    pub created_at: NaiveDateTime,
    #[serde(default = "now")]
    pub updated_at: NaiveDateTime,
}

impl TodoItem {
    pub fn new(id: u32, new: NewTodo) -> Self {
        let created_at = now();
        TodoItem {
            id,
            title: new.title,
            description: new.description,
            completed: false,
            priority: new.priority,
            category: new.category,
            due_date: new.due_date,
            recurring_pattern: new.recurring_pattern,
            created_at,
            updated_at: created_at,
        }
    }

    /// The next occurrence of a recurring task, or `None` when the task
    /// does not repeat.
    pub fn successor(&self, id: u32) -> Option<TodoItem> {
        if !self.recurring_pattern.is_recurring() {
            return None;
        }
        Some(TodoItem::new(
            id,
            NewTodo {
                title: self.title.clone(),
                description: self.description.clone(),
                priority: self.priority,
                category: self.category.clone(),
                due_date: self.recurring_pattern.next_due(self.due_date),
                recurring_pattern: self.recurring_pattern,
            },
        ))
    }

    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

impl fmt::Display for TodoItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.completed { '✓' } else { '○' };
        write!(f, "[{}]{} {}", status, self.priority.indicator(), self.title)?;
        if !self.category.is_empty() {
            write!(f, " [{}]", self.category)?;
        }
        if let Some(due) = self.due_date {
            write!(f, " (Due: {})", due.format(DATE_FORMAT))?;
        }
        write!(f, " - {}", self.description)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<NaiveDate>,
    pub recurring_pattern: RecurringPattern,
}

impl NewTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        NewTodo {
            title: title.into(),
            ..NewTodo::default()
        }
    }
}

/// Field-wise edit; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub recurring_pattern: Option<RecurringPattern>,
}
