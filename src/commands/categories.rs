// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, TxKind};
use crate::utils::{id_for_category, parse_kind, pretty_table};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
            let color = sub
                .get_one::<String>("color")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            if let Some(c) = color {
                let ok = c.len() == 7
                    && c.starts_with('#')
                    && c[1..].chars().all(|ch| ch.is_ascii_hexdigit());
                if !ok {
                    return Err(anyhow!("Invalid color '{}', expected #RRGGBB", c));
                }
            }
            conn.execute(
                "INSERT INTO categories(name, kind, color) VALUES (?1, ?2, ?3)",
                params![name, kind.as_str(), color],
            )
            .with_context(|| format!("Category '{}' ({}) already exists?", name, kind))?;
            info!(name, kind = kind.as_str(), "category added");
            println!("Added {} category '{}'", kind, name);
        }
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("kind")
                .map(|k| parse_kind(k))
                .transpose()?;
            let data = load_categories(conn)?
                .into_iter()
                .filter(|c| kind.is_none_or(|k| c.kind == k))
                .map(|c| vec![c.name, c.kind.to_string(), c.color.unwrap_or_default()])
                .collect();
            println!("{}", pretty_table(&["Category", "Kind", "Color"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
            let id = id_for_category(conn, name, kind)?;
            conn.execute("DELETE FROM categories WHERE id=?1", params![id])
                .with_context(|| format!("Category '{}' is still used by transactions", name))?;
            println!("Removed {} category '{}'", kind, name.trim());
        }
        _ => {}
    }
    Ok(())
}

pub fn load_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, kind, color FROM categories ORDER BY kind, name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, kind, color) = row?;
        out.push(Category {
            id,
            name,
            kind: kind.parse::<TxKind>()?,
            color,
        });
    }
    Ok(out)
}
