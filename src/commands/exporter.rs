// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let mut stmt = conn.prepare(
        "SELECT t.id, t.date, t.kind, c.name as category, t.amount, t.description, t.created_at
         FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;

    let mut count = 0usize;
    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "id",
            "date",
            "kind",
            "category",
            "amount",
            "description",
            "created_at",
        ])?;
        for row in rows {
            let (id, d, kind, cat, amt, desc, created) = row?;
            wtr.write_record([
                id.to_string(),
                d,
                kind,
                cat.unwrap_or_default(),
                amt,
                desc,
                created,
            ])?;
            count += 1;
        }
        wtr.flush()?;
    } else {
        let mut items = Vec::new();
        for row in rows {
            let (id, d, kind, cat, amt, desc, created) = row?;
            items.push(json!({
                "id": id, "date": d, "kind": kind, "category": cat, "amount": amt,
                "description": desc, "created_at": created
            }));
        }
        count = items.len();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    info!(count, out = out.as_str(), format = fmt.as_str(), "transactions exported");
    println!("Exported {} transactions to {}", count, out);
    Ok(())
}
