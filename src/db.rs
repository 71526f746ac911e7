use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::model::CvData;

const DB_PATH: &str = "data/perfectcv.sqlite";

/// Settings key holding the id of the document the editor opens by default.
pub const CURRENT_DOCUMENT_KEY: &str = "current_document";

pub fn connect() -> Result<Connection> {
    std::fs::create_dir_all("data").context("Failed to create data directory")?;
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            first_name  TEXT NOT NULL DEFAULT '',
            last_name   TEXT NOT NULL DEFAULT '',
            email       TEXT NOT NULL DEFAULT '',
            job_title   TEXT NOT NULL DEFAULT '',
            source_file TEXT,
            data        TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_documents_updated ON documents(updated_at);

        CREATE TABLE IF NOT EXISTS settings (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

// ── Documents ──

/// Insert or replace one record. The listing columns are denormalized from
/// the record so `list` never has to deserialize every document.
pub fn save_document(conn: &Connection, cv: &CvData, source_file: Option<&str>) -> Result<()> {
    let data = serde_json::to_string(cv).context("Failed to serialize document")?;
    conn.execute(
        "INSERT OR REPLACE INTO documents
             (id, title, first_name, last_name, email, job_title, source_file, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            cv.id,
            cv.title,
            cv.personal_info.first_name,
            cv.personal_info.last_name,
            cv.personal_info.email,
            cv.personal_info.job_title,
            source_file,
            data,
            cv.created_at,
            cv.updated_at,
        ],
    )?;
    Ok(())
}

pub fn fetch_document(conn: &Connection, id: &str) -> Result<Option<CvData>> {
    let data: Option<String> = conn
        .query_row("SELECT data FROM documents WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()?;
    match data {
        Some(json) => {
            let cv = serde_json::from_str(&json).context("Stored document is not valid JSON")?;
            Ok(Some(cv))
        }
        None => Ok(None),
    }
}

pub struct DocumentRow {
    pub id: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_title: String,
    pub updated_at: String,
}

pub fn list_documents(conn: &Connection) -> Result<Vec<DocumentRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, first_name, last_name, email, job_title, updated_at
         FROM documents
         ORDER BY updated_at DESC, id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(DocumentRow {
                id: row.get(0)?,
                title: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                email: row.get(4)?,
                job_title: row.get(5)?,
                updated_at: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_document(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM documents WHERE id = ?1", [id])?;
    if deleted > 0 && get_current(conn)?.as_deref() == Some(id) {
        conn.execute(
            "DELETE FROM settings WHERE key = ?1",
            [CURRENT_DOCUMENT_KEY],
        )?;
    }
    Ok(deleted > 0)
}

/// Resolve a full id or unique id prefix to a stored document id.
pub fn resolve_id(conn: &Connection, prefix: &str) -> Result<String> {
    let mut stmt =
        conn.prepare("SELECT id FROM documents WHERE id LIKE ?1 || '%' ORDER BY id LIMIT 3")?;
    let matches = stmt
        .query_map([prefix], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    match matches.as_slice() {
        [] => bail!("No document matching '{}'", prefix),
        [id] => Ok(id.clone()),
        _ => bail!("'{}' is ambiguous; use more of the id", prefix),
    }
}

// ── Settings ──

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        [key, value],
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

pub fn set_current(conn: &Connection, id: &str) -> Result<()> {
    set_setting(conn, CURRENT_DOCUMENT_KEY, id)
}

pub fn get_current(conn: &Connection) -> Result<Option<String>> {
    get_setting(conn, CURRENT_DOCUMENT_KEY)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub named: usize,
    pub with_email: usize,
    pub current: Option<String>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
    let named: usize = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE first_name NOT IN ('', 'Your')",
        [],
        |r| r.get(0),
    )?;
    let with_email: usize = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE email != ''",
        [],
        |r| r.get(0),
    )?;
    let current = match get_current(conn)? {
        Some(id) => conn
            .query_row("SELECT title FROM documents WHERE id = ?1", [id], |r| {
                r.get(0)
            })
            .optional()?,
        None => None,
    };
    Ok(Stats {
        total,
        named,
        with_email,
        current,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{generate_id, now_iso, CvData};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn test_cv(first_name: &str) -> CvData {
        let now = now_iso();
        let mut cv = CvData {
            id: generate_id(),
            created_at: now.clone(),
            updated_at: now,
            ..CvData::default()
        };
        cv.personal_info.first_name = first_name.to_string();
        cv.title = format!("{}'s CV (Imported)", first_name);
        cv
    }

    #[test]
    fn save_and_fetch_round_trips() {
        let conn = test_conn();
        let cv = test_cv("Jane");
        save_document(&conn, &cv, Some("jane.pdf")).unwrap();
        let back = fetch_document(&conn, &cv.id).unwrap().unwrap();
        assert_eq!(back, cv);
    }

    #[test]
    fn fetch_missing_is_none() {
        let conn = test_conn();
        assert!(fetch_document(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn resolve_id_by_prefix() {
        let conn = test_conn();
        let cv = test_cv("Jane");
        save_document(&conn, &cv, None).unwrap();
        let prefix = &cv.id[..8];
        assert_eq!(resolve_id(&conn, prefix).unwrap(), cv.id);
        assert!(resolve_id(&conn, "zzzz").is_err());
    }

    #[test]
    fn delete_clears_current_pointer() {
        let conn = test_conn();
        let cv = test_cv("Jane");
        save_document(&conn, &cv, None).unwrap();
        set_current(&conn, &cv.id).unwrap();
        assert!(delete_document(&conn, &cv.id).unwrap());
        assert!(get_current(&conn).unwrap().is_none());
        assert!(!delete_document(&conn, &cv.id).unwrap());
    }

    #[test]
    fn stats_count_named_and_emailed() {
        let conn = test_conn();
        let mut a = test_cv("Jane");
        a.personal_info.email = "jane@example.com".into();
        let b = test_cv("Your");
        save_document(&conn, &a, None).unwrap();
        save_document(&conn, &b, None).unwrap();
        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.named, 1);
        assert_eq!(stats.with_email, 1);
    }
}
