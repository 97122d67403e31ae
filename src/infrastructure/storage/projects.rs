use super::{Database, StoreError};
use crate::domain::records::{NewProject, Project};
use rusqlite::{OptionalExtension, Row, params};
use tracing::info;
use uuid::Uuid;

impl Database {
    pub fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, description FROM projects")?;
        let rows = stmt.query_map([], map_project)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                "SELECT id, name, description FROM projects WHERE id = ?1",
                params![id],
                map_project,
            )
            .optional()?)
    }

    /// Insert a project, generating an id when the caller supplied none.
    pub fn create_project(&self, project: NewProject) -> Result<String, StoreError> {
        let id = project
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO projects (id, name, description) VALUES (?1, ?2, ?3)",
            params![id, project.name, project.description],
        )?;
        info!(project_id = id.as_str(), "Project created");
        Ok(id)
    }

    /// Delete a project together with its sources, their params and its data
    /// entries, all in one transaction.
    pub fn delete_project(&self, id: &str) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let params_removed = tx.execute(
            "DELETE FROM external_source_params
             WHERE source_id IN (SELECT id FROM external_sources WHERE project_id = ?1)",
            params![id],
        )?;
        let sources_removed = tx.execute(
            "DELETE FROM external_sources WHERE project_id = ?1",
            params![id],
        )?;
        let entries_removed =
            tx.execute("DELETE FROM data_entries WHERE project_id = ?1", params![id])?;
        tx.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        tx.commit()?;
        info!(
            project_id = id,
            params_removed, sources_removed, entries_removed, "Project deleted"
        );
        Ok(())
    }
}

fn map_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}
