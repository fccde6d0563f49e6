// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::Period;
use crate::models::Investment;
use crate::utils::{
    maybe_print_json, page_args, parse_amount, parse_date, parse_decimal, parse_month,
    pretty_table,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let kind = sub.get_one::<String>("kind").unwrap().trim();
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let note = sub
                .get_one::<String>("note")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            conn.execute(
                "INSERT INTO investments(name, kind, amount, date, note) VALUES (?1,?2,?3,?4,?5)",
                params![name, kind, amount.to_string(), date.to_string(), note],
            )?;
            info!(name, amount = %amount, "investment recorded");
            println!("Invested {} in {} ({}) on {}", amount, name, kind, date);
        }
        Some(("list", sub)) => {
            let month = sub
                .get_one::<String>("month")
                .map(|m| parse_month(m))
                .transpose()?;
            let mut items = load_investments(conn, month)?;
            if let Some((limit, offset)) = page_args(sub)? {
                items = items.into_iter().skip(offset).take(limit).collect();
            }
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let rows = items
                    .into_iter()
                    .map(|i| {
                        vec![
                            i.date.to_string(),
                            i.name,
                            i.kind,
                            format!("{:.2}", i.amount),
                            i.note.unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Date", "Name", "Kind", "Amount", "Note"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

/// Investments, optionally restricted to one month, newest first.
pub fn load_investments(conn: &Connection, month: Option<Period>) -> Result<Vec<Investment>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, kind, amount, date, note FROM investments
         WHERE ?1 IS NULL OR substr(date,1,7)=?1
         ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![month.map(|p| p.to_string())], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, NaiveDate>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, kind, amount, date, note) = row?;
        out.push(Investment {
            id,
            amount: parse_decimal(&amount)
                .with_context(|| format!("Invalid amount '{}' for investment {}", amount, name))?,
            name,
            kind,
            date,
            note,
        });
    }
    Ok(out)
}
