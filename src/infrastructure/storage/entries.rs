use super::{Database, StoreError};
use crate::domain::records::{DataEntry, SourceType};
use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A data entry reduced to what the model needs to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchHit {
    pub content: String,
    pub category: Option<String>,
}

impl Database {
    pub fn list_entries(&self, project_id: &str) -> Result<Vec<DataEntry>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, project_id, content, category, source_type
             FROM data_entries WHERE project_id = ?1",
        )?;
        let rows = stmt.query_map(params![project_id], map_entry)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn add_entry(
        &self,
        project_id: &str,
        content: &str,
        category: Option<&str>,
        source_type: SourceType,
    ) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO data_entries (project_id, content, category, source_type)
             VALUES (?1, ?2, ?3, ?4)",
            params![project_id, content, category, source_type.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn delete_entry(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM data_entries WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Entries whose content contains `needle`, compared case-sensitively.
    pub fn entries_containing(
        &self,
        project_id: &str,
        needle: &str,
    ) -> Result<Vec<SearchHit>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT content, category FROM data_entries
             WHERE project_id = ?1 AND instr(content, ?2) > 0",
        )?;
        let rows = stmt.query_map(params![project_id, needle], map_hit)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn entry_summaries(&self, project_id: &str) -> Result<Vec<SearchHit>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT content, category FROM data_entries WHERE project_id = ?1")?;
        let rows = stmt.query_map(params![project_id], map_hit)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<DataEntry> {
    let source_type: Option<String> = row.get(4)?;
    Ok(DataEntry {
        id: row.get(0)?,
        project_id: row.get(1)?,
        content: row.get(2)?,
        category: row.get(3)?,
        source_type: source_type
            .as_deref()
            .map(SourceType::parse)
            .unwrap_or(SourceType::Manual),
    })
}

fn map_hit(row: &Row<'_>) -> rusqlite::Result<SearchHit> {
    Ok(SearchHit {
        content: row.get(0)?,
        category: row.get(1)?,
    })
}
