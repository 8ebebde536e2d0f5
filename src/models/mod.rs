//! Domain models for the project board.
//!
//! - [`Project`]: aggregate root holding metadata, members and embedded tasks.
//! - [`Task`]: Kanban card owned by exactly one project.
//!
//! Both carry derived fields (`completion_percent`/`status` on projects,
//! `is_late` on tasks) computed by the rules in [`progress`].

mod project;
pub mod progress;
mod task;

pub use project::*;
pub use task::*;
