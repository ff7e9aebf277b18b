use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS analise (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            filename    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS procedimento (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            nome          TEXT NOT NULL,
            valor_minimo  REAL
        );

        CREATE TABLE IF NOT EXISTS elemento (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            analise_id      INTEGER NOT NULL,
            created_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            tipo            TEXT,
            nome            TEXT,
            freq            REAL,
            custo_unit      REAL,
            custo_total     REAL,
            status          TEXT,
            valor_proposto  REAL,
            id_gold_label   INTEGER,
            FOREIGN KEY (analise_id) REFERENCES analise(id),
            FOREIGN KEY (id_gold_label) REFERENCES procedimento(id)
        );

        CREATE INDEX IF NOT EXISTS idx_elemento_analise
            ON elemento(analise_id);

        CREATE INDEX IF NOT EXISTS idx_procedimento_nome
            ON procedimento(nome);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
