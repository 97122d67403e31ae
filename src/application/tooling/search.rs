use crate::infrastructure::storage::{Database, SearchHit, StoreError};
use tracing::debug;

/// Entries of `project_id` whose content contains `query`; every entry of
/// the project when nothing matches, so the model always has data to read.
pub fn search_project_data(
    db: &Database,
    project_id: &str,
    query: &str,
) -> Result<Vec<SearchHit>, StoreError> {
    let hits = db.entries_containing(project_id, query)?;
    if !hits.is_empty() {
        debug!(project_id, query, hits = hits.len(), "Search matched entries");
        return Ok(hits);
    }
    debug!(project_id, query, "No entry matched, returning all project data");
    db.entry_summaries(project_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::{NewProject, SourceType};

    fn seeded() -> Database {
        let db = Database::open_in_memory().expect("db");
        for id in ["p1", "p2"] {
            db.create_project(NewProject {
                id: Some(id.into()),
                name: id.into(),
                description: None,
            })
            .expect("project");
        }
        db.add_entry("p1", "Revenue Q1: 120k", Some("finance"), SourceType::Manual)
            .expect("entry");
        db.add_entry("p1", "Headcount: 14", None, SourceType::Manual)
            .expect("entry");
        db.add_entry("p2", "Revenue Q1: 999k", None, SourceType::Manual)
            .expect("entry");
        db
    }

    #[test]
    fn single_match_returns_only_that_entry() {
        let db = seeded();
        let hits = search_project_data(&db, "p1", "Headcount").expect("search");
        assert_eq!(
            hits,
            vec![SearchHit {
                content: "Headcount: 14".into(),
                category: None
            }]
        );
    }

    #[test]
    fn no_match_falls_back_to_all_project_entries() {
        let db = seeded();
        let hits = search_project_data(&db, "p1", "margin").expect("search");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|hit| !hit.content.contains("999k")));
    }

    #[test]
    fn match_is_case_sensitive() {
        let db = seeded();
        let hits = search_project_data(&db, "p1", "revenue").expect("search");
        assert_eq!(hits.len(), 2, "lowercase query misses and falls back");
        let hits = search_project_data(&db, "p1", "Revenue").expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category.as_deref(), Some("finance"));
    }
}
