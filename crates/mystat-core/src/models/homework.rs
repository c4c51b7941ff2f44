use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default spent-time value the portal accepts when the student does not report one.
pub const UNREPORTED_SPENT_TIME: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeworkType {
    #[default]
    Homework,
    Lab,
}

impl HomeworkType {
    pub fn code(&self) -> u8 {
        match self {
            HomeworkType::Homework => 0,
            HomeworkType::Lab => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeworkStatus {
    Checked,
    Uploaded,
    #[default]
    Active,
    Deleted,
    Overdue,
}

impl HomeworkStatus {
    pub fn code(&self) -> u8 {
        match self {
            HomeworkStatus::Checked => 1,
            HomeworkStatus::Uploaded => 2,
            HomeworkStatus::Active => 3,
            HomeworkStatus::Deleted => 5,
            HomeworkStatus::Overdue => 6,
        }
    }
}

/// Id accepted by the delete endpoint, which takes numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HomeworkId {
    Number(i64),
    Text(String),
}

impl From<i64> for HomeworkId {
    fn from(id: i64) -> Self {
        HomeworkId::Number(id)
    }
}

impl From<&str> for HomeworkId {
    fn from(id: &str) -> Self {
        HomeworkId::Text(id.to_string())
    }
}

impl From<String> for HomeworkId {
    fn from(id: String) -> Self {
        HomeworkId::Text(id)
    }
}

/// An answer to submit for a homework assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkUpload {
    pub homework_id: i64,
    pub answer_text: Option<String>,
    pub file: Option<PathBuf>,
    pub spent_time_hour: u32,
    pub spent_time_min: u32,
}

impl HomeworkUpload {
    pub fn new(homework_id: i64) -> Self {
        Self {
            homework_id,
            answer_text: None,
            file: None,
            spent_time_hour: UNREPORTED_SPENT_TIME,
            spent_time_min: UNREPORTED_SPENT_TIME,
        }
    }

    pub fn with_answer(mut self, text: impl Into<String>) -> Self {
        self.answer_text = Some(text.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn with_spent_time(mut self, hours: u32, minutes: u32) -> Self {
        self.spent_time_hour = hours;
        self.spent_time_min = minutes;
        self
    }
}
