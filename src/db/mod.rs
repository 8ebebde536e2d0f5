//! SQLite-backed document store for projects.
//!
//! Each project aggregate is stored as one JSON document. The fields the
//! finders filter on (`title`, `subject`, `status`) are copied into their own
//! columns on every save; member lookups read straight from the document.

mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, ToSql};
use uuid::Uuid;

use crate::models::*;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Location of the database file in the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "project-board")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("project-board.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Project documents
    // ============================================================

    pub fn find_all(&self) -> Result<Vec<Project>> {
        self.query_projects("SELECT document FROM projects ORDER BY rowid", &[])
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Project>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM projects WHERE id = ?",
                [id],
                |row| row.get(0),
            )
            .optional()?;

        document.as_deref().map(decode_document).transpose()
    }

    /// Insert or replace a project document.
    ///
    /// A project with an empty id is new: it is given a fresh id before being
    /// written. The saved project is returned.
    pub fn save(&self, mut project: Project) -> Result<Project> {
        if project.id.is_empty() {
            project.id = Uuid::new_v4().to_string();
        }

        let document = serde_json::to_string(&project)
            .with_context(|| format!("Failed to encode project {}", project.id))?;
        let now = Utc::now().to_rfc3339();

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO projects (id, title, subject, status, document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                subject = excluded.subject,
                status = excluded.status,
                document = excluded.document,
                updated_at = excluded.updated_at",
            (
                &project.id,
                &project.title,
                &project.subject,
                project.status.as_str(),
                &document,
                &now,
            ),
        )?;

        Ok(project)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM projects WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Finders
    // ============================================================

    /// Projects whose last saved status matches. The status is not recomputed.
    pub fn find_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>> {
        self.query_projects(
            "SELECT document FROM projects WHERE status = ? ORDER BY rowid",
            &[&status.as_str()],
        )
    }

    pub fn find_by_member(&self, member: &str) -> Result<Vec<Project>> {
        self.query_projects(
            "SELECT document FROM projects
             WHERE EXISTS (
                SELECT 1 FROM json_each(projects.document, '$.members')
                WHERE json_each.value = ?
             )
             ORDER BY rowid",
            &[&member],
        )
    }

    pub fn find_by_subject(&self, subject: &str) -> Result<Vec<Project>> {
        self.query_projects(
            "SELECT document FROM projects WHERE subject = ? ORDER BY rowid",
            &[&subject],
        )
    }

    /// Case-insensitive substring match on the title.
    ///
    /// Folding happens in Rust: SQLite's `lower()` only folds ASCII, which
    /// misses accented titles.
    pub fn find_by_title_containing(&self, fragment: &str) -> Result<Vec<Project>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .collect())
    }

    fn query_projects(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Project>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(sql)?;

        let documents = stmt
            .query_map(params, |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        documents.iter().map(|d| decode_document(d)).collect()
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn decode_document(document: &str) -> Result<Project> {
    serde_json::from_str(document).context("Failed to decode project document")
}
