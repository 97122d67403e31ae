use super::{Database, StoreError};
use crate::domain::records::{ExternalSource, NewSourceParam, ParamType, SourceInput, SourceParam};
use rusqlite::{OptionalExtension, Row, params};
use tracing::info;

const SOURCE_COLUMNS: &str =
    "id, project_id, name, url, method, headers, params, category, description";

impl Database {
    pub fn list_sources(&self, project_id: &str) -> Result<Vec<ExternalSource>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SOURCE_COLUMNS} FROM external_sources WHERE project_id = ?1"
        ))?;
        let rows = stmt.query_map(params![project_id], map_source)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn source(&self, id: i64) -> Result<Option<ExternalSource>, StoreError> {
        let conn = self.lock()?;
        Ok(conn
            .query_row(
                &format!("SELECT {SOURCE_COLUMNS} FROM external_sources WHERE id = ?1"),
                params![id],
                map_source,
            )
            .optional()?)
    }

    pub fn create_source(&self, project_id: &str, input: &SourceInput) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO external_sources
                (project_id, name, url, method, headers, params, category, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                project_id,
                input.name,
                input.url,
                input.method_or_default(),
                input.headers_or_default(),
                input.params_or_default(),
                input.category_or_default(),
                input.description_or_default(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(project_id, source_id = id, name = input.name.as_str(), "External source created");
        Ok(id)
    }

    /// Overwrite every column of a source. Returns `false` when no row matched.
    pub fn update_source(&self, id: i64, input: &SourceInput) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE external_sources
             SET name = ?1, url = ?2, method = ?3, headers = ?4, params = ?5,
                 category = ?6, description = ?7
             WHERE id = ?8",
            params![
                input.name,
                input.url,
                input.method_or_default(),
                input.headers_or_default(),
                input.params_or_default(),
                input.category_or_default(),
                input.description_or_default(),
                id,
            ],
        )?;
        Ok(updated > 0)
    }

    /// Delete a source and its params in one transaction.
    pub fn delete_source(&self, id: i64) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM external_source_params WHERE source_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM external_sources WHERE id = ?1", params![id])?;
        tx.commit()?;
        info!(source_id = id, "External source deleted");
        Ok(())
    }

    pub fn list_params(&self, source_id: i64) -> Result<Vec<SourceParam>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, source_id, name, description, type, required, format
             FROM external_source_params WHERE source_id = ?1",
        )?;
        let rows = stmt.query_map(params![source_id], map_param)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn create_param(&self, source_id: i64, param: &NewSourceParam) -> Result<i64, StoreError> {
        let param_type = param.param_type.as_deref().unwrap_or("string");
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO external_source_params
                (source_id, name, description, type, required, format)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                source_id,
                param.name,
                param.description,
                if param_type.is_empty() { "string" } else { param_type },
                param.required,
                param.format.as_deref().unwrap_or(""),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn delete_param(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM external_source_params WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }
}

fn map_source(row: &Row<'_>) -> rusqlite::Result<ExternalSource> {
    let method: Option<String> = row.get(4)?;
    let headers: Option<String> = row.get(5)?;
    let params: Option<String> = row.get(6)?;
    Ok(ExternalSource {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        url: row.get(3)?,
        method: method.unwrap_or_else(|| "GET".to_string()),
        headers: non_blank_json(headers),
        params: non_blank_json(params),
        category: row.get(7)?,
        description: row.get(8)?,
    })
}

fn map_param(row: &Row<'_>) -> rusqlite::Result<SourceParam> {
    let param_type: Option<String> = row.get(4)?;
    let required: Option<i64> = row.get(5)?;
    Ok(SourceParam {
        id: row.get(0)?,
        source_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        param_type: param_type
            .as_deref()
            .map(ParamType::parse)
            .unwrap_or(ParamType::String),
        required: required.unwrap_or(0) != 0,
        format: row.get(6)?,
    })
}

fn non_blank_json(value: Option<String>) -> String {
    value
        .filter(|raw| !raw.trim().is_empty())
        .unwrap_or_else(|| "{}".to_string())
}
