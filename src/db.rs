// Copyright (c) 2025 Piastre Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

use crate::errors::StoreError;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.piastre", "Piastre", "piastre"));

pub fn db_path() -> Result<PathBuf, StoreError> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        StoreError::Unavailable("could not determine platform-specific data dir".into())
    })?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir)
        .map_err(|e| StoreError::Unavailable(format!("failed to create data dir: {e}")))?;
    Ok(data_dir.join("piastre.sqlite"))
}

pub fn open_or_init() -> Result<Connection, StoreError> {
    let path = db_path()?;
    let mut conn = Connection::open(&path)
        .map_err(|e| StoreError::Unavailable(format!("open DB at {}: {e}", path.display())))?;
    init_schema(&mut conn)?;
    seed_default_categories(&conn)?;
    Ok(conn)
}

/// In-memory store with the full schema, unseeded.
pub fn open_in_memory() -> Result<Connection, StoreError> {
    let mut conn = Connection::open_in_memory()
        .map_err(|e| StoreError::Unavailable(format!("open in-memory DB: {e}")))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        initial_balance TEXT NOT NULL DEFAULT '0',
        currency TEXT NOT NULL DEFAULT 'EGP',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        icon TEXT NOT NULL,
        color TEXT NOT NULL,
        is_default INTEGER NOT NULL DEFAULT 0
    );

    -- No cascades: deletion rules live in the coordinator, the FK declarations
    -- and CHECKs are a storage-layer backstop.
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL CHECK(type IN ('expense','income','transfer')),
        description TEXT NOT NULL,
        amount TEXT NOT NULL CHECK(CAST(amount AS NUMERIC) > 0),
        date TEXT NOT NULL,
        account_id INTEGER NOT NULL,
        transfer_to_account_id INTEGER,
        category_id INTEGER,
        received_amount TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(account_id) REFERENCES accounts(id),
        FOREIGN KEY(transfer_to_account_id) REFERENCES accounts(id),
        FOREIGN KEY(category_id) REFERENCES categories(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    "#,
    )?;
    Ok(())
}

/// Fixed starter set, written once when the categories table is empty.
const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Food & Drink", "restaurant", "#FF6B6B"),
    ("Transport", "car", "#45B7D1"),
    ("Shopping", "cart", "#FF8E53"),
    ("Bills & Utilities", "receipt", "#F7DC6F"),
    ("Entertainment", "film", "#9B59B6"),
    ("Health", "medical", "#58D68D"),
    ("Education", "school", "#3498DB"),
    ("Other", "ellipsis-horizontal-circle", "#ADB5BD"),
];

pub fn seed_default_categories(conn: &Connection) -> Result<(), StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(());
    }
    let mut stmt = conn
        .prepare("INSERT INTO categories(name, icon, color, is_default) VALUES (?1, ?2, ?3, 1)")?;
    for (name, icon, color) in DEFAULT_CATEGORIES {
        stmt.execute(rusqlite::params![name, icon, color])?;
    }
    Ok(())
}
