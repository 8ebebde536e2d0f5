use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::progress;
use super::task::Task;

/// A university group project.
///
/// The project is an aggregate root: its tasks are embedded values with no
/// storage of their own, and the whole project is persisted as one document.
/// `completion_percent` and `status` are derived and must be brought up to
/// date with [`Project::refresh`] after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Assigned by the store on first save. Empty until then.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Course or module the project belongs to.
    pub subject: Option<String>,
    pub creation_date: NaiveDate,
    pub deadline: Option<NaiveDate>,
    pub members: Vec<String>,
    pub tasks: Vec<Task>,
    pub completion_percent: f64,
    pub status: ProjectStatus,
}

impl Project {
    /// Build an unsaved project from a draft, stamped with `today` as its creation date.
    pub fn new(input: ProjectInput, today: NaiveDate) -> Self {
        let mut project = Self {
            id: String::new(),
            title: input.title,
            description: input.description,
            subject: input.subject,
            creation_date: today,
            deadline: input.deadline,
            members: dedup_members(input.members),
            tasks: Vec::new(),
            completion_percent: 0.0,
            status: ProjectStatus::InProgress,
        };
        project.refresh(today);
        project
    }

    /// Overwrite the editable metadata from a draft. Tasks, id and creation date are kept.
    pub fn apply(&mut self, input: ProjectInput) {
        self.title = input.title;
        self.description = input.description;
        self.subject = input.subject;
        self.deadline = input.deadline;
        self.members = dedup_members(input.members);
    }

    /// Recompute task lateness, then completion, then status.
    pub fn refresh(&mut self, today: NaiveDate) {
        for task in &mut self.tasks {
            task.is_late = progress::compute_lateness(task, today);
        }
        self.completion_percent = progress::compute_completion(&self.tasks);
        self.status = progress::compute_status(self.deadline, self.completion_percent, today);
    }

    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }
}

fn dedup_members(members: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(members.len());
    for member in members {
        if !unique.contains(&member) {
            unique.push(member);
        }
    }
    unique
}

/// Overall state of a project, derived from its deadline and completion.
///
/// - `InProgress`: not finished and not overdue
/// - `Late`: deadline has passed and completion is below 100%
/// - `Done`: every task is done
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    InProgress,
    Late,
    Done,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Late => "LATE",
            Self::Done => "DONE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "IN_PROGRESS" => Some(Self::InProgress),
            "LATE" => Some(Self::Late),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Input for creating or replacing a project's metadata.
///
/// Used by both create and update; an update overwrites every field listed
/// here and leaves the task list alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Body of an add-member request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInput {
    pub member: String,
}

/// Confirmation returned after deleting a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub deleted: bool,
    pub message: String,
}
