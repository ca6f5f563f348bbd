// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use std::path::PathBuf;
use uuid::Uuid;

use crate::models::TxKind;

/// Categories every new local database starts with.
pub const DEFAULT_CATEGORIES: [(&str, TxKind); 8] = [
    ("Salary", TxKind::Income),
    ("Freelance", TxKind::Income),
    ("Investments", TxKind::Income),
    ("Housing", TxKind::Expense),
    ("Food", TxKind::Expense),
    ("Transportation", TxKind::Expense),
    ("Entertainment", TxKind::Expense),
    ("Utilities", TxKind::Expense),
];

pub fn db_path() -> Result<PathBuf> {
    Ok(crate::config::data_dir()?.join("fintrack.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    seed_categories(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        UNIQUE(name, type)
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        amount TEXT NOT NULL, -- non-negative; sign comes from type
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        category_id TEXT,
        description TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL,
        recurring INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    "#,
    )
}

/// Insert the default categories into an empty table.
pub fn seed_categories(conn: &Connection) -> rusqlite::Result<()> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if n > 0 {
        return Ok(());
    }
    for (name, kind) in DEFAULT_CATEGORIES {
        conn.execute(
            "INSERT INTO categories(id, name, type) VALUES (?1, ?2, ?3)",
            params![Uuid::new_v4().to_string(), name, kind.as_str()],
        )?;
    }
    Ok(())
}
