//! SQLite access. Connections are opened per operation; the schema is
//! created once at startup.

use rusqlite::Connection;

use crate::config;

pub fn open() -> Result<Connection, rusqlite::Error> {
    Connection::open(config::db_path())
}

pub fn init_schema() -> Result<(), rusqlite::Error> {
    let conn = open()?;
    init_schema_on(&conn)
}

pub fn init_schema_on(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS templates (
            id         TEXT PRIMARY KEY,
            name       TEXT NOT NULL,
            image_url  TEXT,
            fields     TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE TABLE IF NOT EXISTS generated_certificates (
            id              TEXT PRIMARY KEY,
            recipient_name  TEXT NOT NULL,
            recipient_email TEXT,
            recipient_phone TEXT,
            template_id     TEXT NOT NULL,
            category        TEXT NOT NULL,
            file_url        TEXT NOT NULL,
            metadata        TEXT NOT NULL DEFAULT '{}',
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
}
