use rusqlite::Connection;
use tracing::debug;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS data_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id TEXT NOT NULL,
    content TEXT NOT NULL,
    category TEXT,
    source_type TEXT DEFAULT 'manual',
    FOREIGN KEY (project_id) REFERENCES projects(id)
);

CREATE TABLE IF NOT EXISTS external_sources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id TEXT NOT NULL,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    method TEXT DEFAULT 'GET',
    headers TEXT,
    params TEXT,
    category TEXT,
    description TEXT,
    FOREIGN KEY (project_id) REFERENCES projects(id)
);

CREATE TABLE IF NOT EXISTS external_source_params (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    type TEXT DEFAULT 'string',
    required INTEGER DEFAULT 0,
    format TEXT,
    FOREIGN KEY (source_id) REFERENCES external_sources(id)
);
"#;

pub(super) fn apply(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;

    // Databases created before sources carried a description.
    if let Err(err) = conn.execute(
        "ALTER TABLE external_sources ADD COLUMN description TEXT",
        [],
    ) {
        debug!(%err, "external_sources.description already present");
    }
    Ok(())
}
