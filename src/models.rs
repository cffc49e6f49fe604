use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Status labels are stored exactly as shown in the schedule view.
// Unknown labels are kept verbatim so a round-trip through the store
// never loses data; they never count as done.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Scheduled,
    DueSoon,
    Done,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::DueSoon => "Due Soon",
            Self::Done => "Done",
            Self::Other(label) => label,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl From<String> for TaskStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Scheduled" => Self::Scheduled,
            "Due Soon" => Self::DueSoon,
            "Done" => Self::Done,
            _ => Self::Other(label),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub date: String, // RFC3339 once normalized, otherwise the raw text
    pub status: TaskStatus,
}

impl Task {
    pub fn new(title: impl Into<String>, date: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            date: date.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Db {
    #[serde(default)]
    pub tasks: Vec<Task>,
}
