//! Derived-field rules for projects and tasks.
//!
//! These are pure functions of the entity and the current date so they can be
//! exercised without a store or a clock.

use chrono::NaiveDate;

use super::project::ProjectStatus;
use super::task::{Task, TaskStatus};

/// Share of tasks in `DONE`, as a percentage. An empty task list is 0%.
pub fn compute_completion(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let done = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();
    (done as f64 / tasks.len() as f64) * 100.0
}

/// A task is late when it has a deadline strictly before `today` and is not done.
pub fn compute_lateness(task: &Task, today: NaiveDate) -> bool {
    match task.deadline {
        Some(deadline) => task.status != TaskStatus::Done && today > deadline,
        None => false,
    }
}

/// Project status from its deadline and (already recomputed) completion.
///
/// The lateness check runs first but only fires below 100%, so an overdue
/// project whose tasks are all done reports `Done`.
pub fn compute_status(
    deadline: Option<NaiveDate>,
    completion_percent: f64,
    today: NaiveDate,
) -> ProjectStatus {
    let overdue = deadline.is_some_and(|d| today > d);
    if overdue && completion_percent < 100.0 {
        ProjectStatus::Late
    } else if completion_percent >= 100.0 {
        ProjectStatus::Done
    } else {
        ProjectStatus::InProgress
    }
}
