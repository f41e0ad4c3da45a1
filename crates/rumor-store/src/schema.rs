use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: i64 = 1;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS messages (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            queue_name     TEXT NOT NULL,
            body           TEXT NOT NULL,
            receipt_handle TEXT,
            visible_at     INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS news_items (
            table_name      TEXT NOT NULL,
            created_at_date TEXT NOT NULL,
            news_item_id    TEXT NOT NULL,
            created_at      INTEGER NOT NULL,
            updated_at      INTEGER NOT NULL,
            ttl             INTEGER NOT NULL,
            score           REAL NOT NULL,
            url             TEXT NOT NULL,
            title           TEXT NOT NULL,
            keywords        TEXT NOT NULL DEFAULT '[]',
            PRIMARY KEY (table_name, created_at_date, news_item_id)
        );

        CREATE TABLE IF NOT EXISTS preferences (
            table_name        TEXT NOT NULL,
            preference_type   TEXT NOT NULL,
            preference_key    TEXT NOT NULL,
            preference_weight REAL NOT NULL,
            PRIMARY KEY (table_name, preference_type, preference_key)
        );

        CREATE TABLE IF NOT EXISTS reports (
            table_name TEXT NOT NULL,
            id         TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            body       TEXT NOT NULL,
            PRIMARY KEY (table_name, id)
        );

        CREATE INDEX IF NOT EXISTS idx_msg_queue ON messages(queue_name, visible_at);
        CREATE INDEX IF NOT EXISTS idx_msg_receipt ON messages(receipt_handle);
        CREATE INDEX IF NOT EXISTS idx_items_created
            ON news_items(table_name, created_at_date, created_at);
        CREATE INDEX IF NOT EXISTS idx_reports_created ON reports(table_name, created_at);
        ",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<Option<i64>> {
    let mut stmt = conn.prepare("SELECT value FROM metadata WHERE key = 'schema_version'")?;
    let version = stmt
        .query_row([], |row| row.get::<_, String>(0))
        .ok()
        .and_then(|v| v.parse().ok());
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_fresh() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_initialize_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_busy_timeout_set() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let timeout: i64 = conn
            .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 5000);
    }

    #[test]
    fn test_message_columns() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('messages')").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(
            columns,
            ["id", "queue_name", "body", "receipt_handle", "visible_at"],
        );
    }
}
