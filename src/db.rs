// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Cashclip", "cashclip"));

pub const DB_ENV: &str = "CASHCLIP_DB";

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Salary", "income"),
    ("Freelance", "income"),
    ("Other", "income"),
    ("Food", "expense"),
    ("Transport", "expense"),
    ("Housing", "expense"),
    ("Health", "expense"),
    ("Leisure", "expense"),
    ("Other", "expense"),
];

pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV) {
        let p = p.trim();
        if !p.is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("cashclip.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        color TEXT,
        UNIQUE(name, kind)
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        amount TEXT NOT NULL,
        category_id INTEGER NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS investments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        note TEXT
    );

    CREATE TABLE IF NOT EXISTS card_charges(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        card TEXT NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        installments INTEGER NOT NULL DEFAULT 1 CHECK(installments >= 1),
        date TEXT NOT NULL,
        category_id INTEGER,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_card_charges_date ON card_charges(date);

    CREATE TABLE IF NOT EXISTS goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        target TEXT NOT NULL,
        saved TEXT NOT NULL DEFAULT '0',
        deadline TEXT
    );

    CREATE TABLE IF NOT EXISTS notes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        body TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- number is the year-scoped sequence (PROP-2025-0001); uniqueness is what
    -- makes concurrent allocation safe
    CREATE TABLE IF NOT EXISTS documents(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('proposal','invoice')),
        number TEXT NOT NULL UNIQUE,
        client TEXT NOT NULL,
        title TEXT NOT NULL,
        amount TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(kind, created_at);
    "#,
    )?;
    seed_categories(conn)?;
    Ok(())
}

fn seed_categories(conn: &Connection) -> Result<()> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if existing > 0 {
        return Ok(());
    }
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO categories(name, kind) VALUES (?1, ?2)")?;
    for (name, kind) in DEFAULT_CATEGORIES {
        stmt.execute(params![name, kind])?;
    }
    debug!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    Ok(())
}
