use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ToggleCompleteRequest {
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub completed: Option<bool>,
}

pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title must not be empty".into());
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(format!("Title must be at most {} characters", TITLE_MAX_CHARS));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), String> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(format!(
            "Description must be at most {} characters",
            DESCRIPTION_MAX_CHARS
        ));
    }
    Ok(())
}

impl CreateTaskRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

impl UpdateTaskRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title("Buy milk").is_ok());
    }

    #[test]
    fn length_limits_count_characters() {
        assert!(validate_title(&"é".repeat(TITLE_MAX_CHARS)).is_ok());
        assert!(validate_title(&"a".repeat(TITLE_MAX_CHARS + 1)).is_err());
        assert!(validate_description(&"a".repeat(DESCRIPTION_MAX_CHARS)).is_ok());
        assert!(validate_description(&"a".repeat(DESCRIPTION_MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateTaskRequest::default().validate().is_ok());
    }
}
