use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A Kanban card embedded in a project.
///
/// Tasks have no identity outside their project: they are created with
/// defaults, appended to exactly one project's task list, and removed by
/// filtering them out of that list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    /// Member responsible for the task (name or email).
    pub assignee: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    /// Derived from `status` and `deadline`; recomputed on every refresh.
    #[serde(default)]
    pub is_late: bool,
}

impl Task {
    /// Build a new task from a draft, generating a fresh id and applying defaults.
    pub fn new(input: TaskInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            assignee: input.assignee,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            deadline: input.deadline,
            is_late: false,
        }
    }
}

/// Kanban column of a task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    ToDo,
    Doing,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "TO_DO",
            Self::Doing => "DOING",
            Self::Done => "DONE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "TO_DO" => Some(Self::ToDo),
            "DOING" => Some(Self::Doing),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Input for adding a task to a project.
///
/// `status` defaults to `TO_DO` and `priority` to `MEDIUM` when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDate>,
}

/// Body of a task status change request.
///
/// The status is kept as a raw string so an unknown value can be reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusInput {
    pub status: String,
}
