// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{Period, installment_due};
use crate::models::{CardCharge, TxKind};
use crate::utils::{
    id_for_category, maybe_print_json, month_or_current, page_args, parse_amount, parse_date,
    parse_decimal, pretty_table,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let card = sub.get_one::<String>("card").unwrap().trim();
    let description = sub.get_one::<String>("description").unwrap().trim();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let installments = *sub.get_one::<u32>("installments").unwrap_or(&1);
    let category_id = match sub.get_one::<String>("category") {
        Some(c) => Some(id_for_category(conn, c, TxKind::Expense)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO card_charges(card, description, amount, installments, date, category_id)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            card,
            description,
            amount.to_string(),
            installments,
            date.to_string(),
            category_id
        ],
    )?;
    info!(card, amount = %amount, installments, "card charge recorded");
    println!(
        "Charged {} to {} in {}x on {}",
        amount, card, installments, date
    );
    Ok(())
}

// Shows what each purchase bills in the selected month.
fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = month_or_current(sub.get_one::<String>("month"))?;
    let mut items: Vec<(CardCharge, rust_decimal::Decimal)> = load_card_charges(conn)?
        .into_iter()
        .map(|c| {
            let due = installment_due(&c, period);
            (c, due)
        })
        .filter(|(_, due)| !due.is_zero())
        .collect();
    if let Some((limit, offset)) = page_args(sub)? {
        items = items.into_iter().skip(offset).take(limit).collect();
    }

    let json: Vec<serde_json::Value> = items
        .iter()
        .map(|(c, due)| serde_json::json!({ "charge": c, "due": due, "period": period }))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &json)? {
        let rows = items
            .into_iter()
            .map(|(c, due)| {
                let n = period.months_since(&Period::containing(c.date)) + 1;
                vec![
                    c.date.to_string(),
                    c.card,
                    c.description,
                    format!("{:.2}", c.amount),
                    format!("{}/{}", n, c.installments),
                    format!("{:.2}", due),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Card", "Description", "Total", "Installment", "Due"],
                rows
            )
        );
    }
    Ok(())
}

pub fn load_card_charges(conn: &Connection) -> Result<Vec<CardCharge>> {
    let mut stmt = conn.prepare(
        "SELECT id, card, description, amount, installments, date, category_id
         FROM card_charges ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, u32>(4)?,
            r.get::<_, NaiveDate>(5)?,
            r.get::<_, Option<i64>>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, card, description, amount, installments, date, category_id) = row?;
        out.push(CardCharge {
            id,
            amount: parse_decimal(&amount)
                .with_context(|| format!("Invalid amount '{}' on card charge #{}", amount, id))?,
            card,
            description,
            installments,
            date,
            category_id,
        });
    }
    Ok(out)
}
