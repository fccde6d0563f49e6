// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::CoreError;
use crate::models::Note;
use crate::utils::{maybe_print_json, page_args, pretty_table};
use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = sub.get_one::<String>("title").unwrap().trim();
            if title.is_empty() {
                return Err(anyhow!("Note title must not be empty"));
            }
            let body = sub
                .get_one::<String>("body")
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            conn.execute(
                "INSERT INTO notes(title, body) VALUES (?1, ?2)",
                params![title, body],
            )?;
            let id = conn.last_insert_rowid();
            info!(id, "note added");
            println!("Added note #{} '{}'", id, title);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM notes WHERE id=?1", params![id])?;
            if n == 0 {
                return Err(CoreError::NotFound(format!("Note #{}", id)).into());
            }
            info!(id, "note deleted");
            println!("Removed note #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut notes = load_notes(conn)?;
    if let Some((limit, offset)) = page_args(sub)? {
        notes = notes.into_iter().skip(offset).take(limit).collect();
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &notes)? {
        let rows = notes
            .into_iter()
            .map(|n| {
                vec![
                    n.id.to_string(),
                    n.created_at.format("%Y-%m-%d").to_string(),
                    n.title,
                    n.body,
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Created", "Title", "Body"], rows));
    }
    Ok(())
}

/// Notes newest first.
pub fn load_notes(conn: &Connection) -> Result<Vec<Note>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, body, created_at FROM notes ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(Note {
            id: r.get(0)?,
            title: r.get(1)?,
            body: r.get(2)?,
            created_at: r.get::<_, NaiveDateTime>(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
