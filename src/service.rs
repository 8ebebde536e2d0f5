//! Project aggregate manager.
//!
//! Every operation follows the same shape: load the project, mutate it in
//! memory, recompute its derived fields, then save it once. A failure at any
//! step aborts before the save, so a project is never partially written.
//! There is no concurrency control: overlapping updates are last-write-wins.

use chrono::{Local, NaiveDate};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::*;

/// Source of the current calendar date.
pub type Clock = fn() -> NaiveDate;

/// Today's date in the server's local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Clone)]
pub struct ProjectService {
    db: Database,
    clock: Clock,
}

impl ProjectService {
    pub fn new(db: Database) -> Self {
        Self::with_clock(db, local_today)
    }

    pub fn with_clock(db: Database, clock: Clock) -> Self {
        Self { db, clock }
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    fn load(&self, id: &str) -> Result<Project> {
        self.db
            .find_by_id(id)?
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))
    }

    fn refreshed(&self, mut projects: Vec<Project>) -> Vec<Project> {
        let today = self.today();
        for project in &mut projects {
            project.refresh(today);
        }
        projects
    }

    fn persist(&self, mut project: Project) -> Result<Project> {
        project.refresh(self.today());
        Ok(self.db.save(project)?)
    }

    // ============================================================
    // Projects
    // ============================================================

    pub fn list(&self) -> Result<Vec<Project>> {
        Ok(self.refreshed(self.db.find_all()?))
    }

    pub fn get(&self, id: &str) -> Result<Project> {
        let mut project = self.load(id)?;
        project.refresh(self.today());
        Ok(project)
    }

    pub fn create(&self, input: ProjectInput) -> Result<Project> {
        validate_title(&input.title)?;

        let project = self.db.save(Project::new(input, self.today()))?;
        tracing::info!("Created project {} ({})", project.id, project.title);
        Ok(project)
    }

    pub fn update(&self, id: &str, input: ProjectInput) -> Result<Project> {
        validate_title(&input.title)?;

        let mut project = self.load(id)?;
        project.apply(input);
        let project = self.persist(project)?;
        tracing::info!("Updated project {}", project.id);
        Ok(project)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let project = self.load(id)?;
        self.db.delete(&project.id)?;
        tracing::info!("Deleted project {}", project.id);
        Ok(())
    }

    // ============================================================
    // Tasks
    // ============================================================

    pub fn add_task(&self, project_id: &str, input: TaskInput) -> Result<Project> {
        let mut project = self.load(project_id)?;

        let task = Task::new(input);
        tracing::info!("Adding task {} to project {}", task.id, project_id);
        project.tasks.push(task);

        self.persist(project)
    }

    /// Move a task to another Kanban column.
    ///
    /// An unknown `task_id` is not an error: the project is recomputed and
    /// saved unchanged. The project must exist before `status` is checked.
    pub fn set_task_status(
        &self,
        project_id: &str,
        task_id: &str,
        status: &str,
    ) -> Result<Project> {
        let mut project = self.load(project_id)?;
        let status = TaskStatus::from_str(status).ok_or_else(|| {
            Error::validation(format!(
                "Unknown task status '{}', expected TO_DO, DOING or DONE",
                status
            ))
        })?;

        match project.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.status = status;
                tracing::info!(
                    "Task {} in project {} moved to {}",
                    task_id,
                    project_id,
                    status.as_str()
                );
            }
            None => tracing::debug!("Task {} not found in project {}", task_id, project_id),
        }

        self.persist(project)
    }

    pub fn remove_task(&self, project_id: &str, task_id: &str) -> Result<Project> {
        let mut project = self.load(project_id)?;

        let before = project.tasks.len();
        project.tasks.retain(|t| t.id != task_id);
        if project.tasks.len() < before {
            tracing::info!("Removed task {} from project {}", task_id, project_id);
        } else {
            tracing::debug!("Task {} not found in project {}", task_id, project_id);
        }

        self.persist(project)
    }

    // ============================================================
    // Members
    // ============================================================

    /// Add a member unless already present. A repeated add does not write.
    pub fn add_member(&self, project_id: &str, member: &str) -> Result<Project> {
        let mut project = self.load(project_id)?;

        if member.trim().is_empty() {
            return Err(Error::validation("Member name must not be blank"));
        }

        if project.has_member(member) {
            tracing::debug!("{} is already a member of project {}", member, project_id);
            project.refresh(self.today());
            return Ok(project);
        }

        project.members.push(member.to_string());
        tracing::info!("Added member {} to project {}", member, project_id);
        self.persist(project)
    }

    // ============================================================
    // Finders
    // ============================================================

    /// Projects by their last saved status.
    ///
    /// Results are not refreshed: a project saved as `IN_PROGRESS` whose
    /// deadline has since passed is still returned here, not under `LATE`,
    /// until something writes it again.
    pub fn filter_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>> {
        Ok(self.db.find_by_status(status)?)
    }

    pub fn find_by_member(&self, member: &str) -> Result<Vec<Project>> {
        Ok(self.refreshed(self.db.find_by_member(member)?))
    }

    pub fn find_by_subject(&self, subject: &str) -> Result<Vec<Project>> {
        Ok(self.refreshed(self.db.find_by_subject(subject)?))
    }

    pub fn search_by_title(&self, fragment: &str) -> Result<Vec<Project>> {
        Ok(self.refreshed(self.db.find_by_title_containing(fragment)?))
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::validation("Project title is required"));
    }
    Ok(())
}
