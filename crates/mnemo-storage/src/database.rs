// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup and migrations.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::debug;

use mnemo_core::MnemoError;

use crate::migrations::run_migrations;

/// Converts tokio_rusqlite errors into `MnemoError::Storage`.
pub(crate) fn storage_err<E>(e: tokio_rusqlite::Error<E>) -> MnemoError
where
    tokio_rusqlite::Error<E>: std::error::Error + Send + Sync + 'static,
{
    MnemoError::storage(e)
}

/// Opens (creating if needed) the database at `path`, enables WAL and
/// foreign keys, and applies pending migrations.
pub async fn open_database(path: &str) -> Result<Connection, MnemoError> {
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(MnemoError::storage)?;
    }

    let conn = Connection::open(path).await.map_err(MnemoError::storage)?;
    prepare(&conn).await?;
    debug!(path, "memory database ready");
    Ok(conn)
}

/// Opens a private in-memory database with the schema applied.
pub async fn open_in_memory() -> Result<Connection, MnemoError> {
    let conn = Connection::open_in_memory()
        .await
        .map_err(MnemoError::storage)?;
    prepare(&conn).await?;
    Ok(conn)
}

async fn prepare(conn: &Connection) -> Result<(), MnemoError> {
    conn.call(|conn| -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
    })
    .await
    .map_err(storage_err)?;

    conn.call(|conn| run_migrations(conn))
        .await
        .map_err(storage_err)
}
