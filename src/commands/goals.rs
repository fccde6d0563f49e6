// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::goal_progress;
use crate::errors::CoreError;
use crate::models::Goal;
use crate::utils::{maybe_print_json, parse_amount, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let target = parse_amount(sub.get_one::<String>("target").unwrap())?;
            if target.is_zero() {
                return Err(anyhow!("Goal target must be greater than zero"));
            }
            let deadline = sub
                .get_one::<String>("deadline")
                .map(|d| parse_date(d))
                .transpose()?;
            conn.execute(
                "INSERT INTO goals(name, target, deadline) VALUES (?1,?2,?3)",
                params![name, target.to_string(), deadline.map(|d| d.to_string())],
            )
            .with_context(|| format!("Goal '{}' already exists?", name))?;
            println!("Added goal '{}' of {}", name, target);
        }
        Some(("deposit", sub)) => deposit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn deposit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let saved: Option<String> = conn
        .query_row(
            "SELECT saved FROM goals WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    let saved = saved.ok_or_else(|| CoreError::NotFound(format!("Goal '{}'", name)))?;
    let new_saved = parse_decimal(&saved)
        .with_context(|| format!("Invalid saved amount '{}' for goal {}", saved, name))?
        + amount;
    conn.execute(
        "UPDATE goals SET saved=?1 WHERE name=?2",
        params![new_saved.to_string(), name],
    )?;
    info!(name, saved = %new_saved, "goal deposit");
    println!("Saved {} towards '{}' (now {})", amount, name, new_saved);
    Ok(())
}

#[derive(Serialize)]
struct GoalView {
    #[serde(flatten)]
    goal: Goal,
    progress: rust_decimal::Decimal,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let views: Vec<GoalView> = load_goals(conn)?
        .into_iter()
        .map(|g| GoalView {
            progress: goal_progress(&g).round_dp(2),
            goal: g,
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &views)? {
        let rows = views
            .into_iter()
            .map(|v| {
                vec![
                    v.goal.name,
                    format!("{:.2}", v.goal.saved),
                    format!("{:.2}", v.goal.target),
                    format!("{:.2}%", v.progress),
                    v.goal.deadline.map(|d| d.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Goal", "Saved", "Target", "Progress", "Deadline"], rows)
        );
    }
    Ok(())
}

pub fn load_goals(conn: &Connection) -> Result<Vec<Goal>> {
    let mut stmt = conn.prepare("SELECT id, name, target, saved, deadline FROM goals ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<NaiveDate>>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, target, saved, deadline) = row?;
        out.push(Goal {
            id,
            target: parse_decimal(&target)
                .with_context(|| format!("Invalid target '{}' for goal {}", target, name))?,
            saved: parse_decimal(&saved)
                .with_context(|| format!("Invalid saved amount '{}' for goal {}", saved, name))?,
            name,
            deadline,
        });
    }
    Ok(out)
}
