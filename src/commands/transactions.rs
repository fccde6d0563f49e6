// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::Period;
use crate::errors::CoreError;
use crate::models::{Transaction, TxKind};
use crate::utils::{
    id_for_category, maybe_print_json, page_args, parse_amount, parse_date, parse_decimal,
    parse_kind, parse_month, pretty_table,
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

struct TxInput {
    kind: TxKind,
    amount: Decimal,
    category_id: i64,
    description: String,
    date: NaiveDate,
}

fn read_input(conn: &Connection, sub: &clap::ArgMatches) -> Result<TxInput> {
    let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();
    let category_id = id_for_category(conn, category, kind)?;
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    Ok(TxInput {
        kind,
        amount,
        category_id,
        description,
        date,
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let input = read_input(conn, sub)?;
    conn.execute(
        "INSERT INTO transactions(kind, amount, category_id, description, date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            input.kind.as_str(),
            input.amount.to_string(),
            input.category_id,
            &input.description,
            input.date.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(id, kind = input.kind.as_str(), amount = %input.amount, "transaction recorded");
    println!(
        "Recorded {} #{} of {} on {}",
        input.kind, id, input.amount, input.date
    );
    Ok(())
}

// Edits replace every field; created_at is kept so the row keeps its place.
fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let input = read_input(conn, sub)?;
    let n = conn.execute(
        "UPDATE transactions SET kind=?1, amount=?2, category_id=?3, description=?4, date=?5
         WHERE id=?6",
        params![
            input.kind.as_str(),
            input.amount.to_string(),
            input.category_id,
            &input.description,
            input.date.to_string(),
            id
        ],
    )?;
    if n == 0 {
        return Err(CoreError::NotFound(format!("Transaction #{}", id)).into());
    }
    info!(id, "transaction replaced");
    println!("Updated transaction #{}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(CoreError::NotFound(format!("Transaction #{}", id)).into());
    }
    info!(id, "transaction deleted");
    println!("Removed transaction #{}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Kind", "Category", "Amount", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.kind, c.name, t.amount, t.description FROM transactions t LEFT JOIN categories c ON t.category_id=c.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        let period = parse_month(month)?;
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(period.to_string());
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        sql.push_str(" AND t.kind=?");
        params_vec.push(parse_kind(kind)?.as_str().into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.trim().into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some((limit, offset)) = page_args(sub)? {
        sql.push_str(" LIMIT ? OFFSET ?");
        params_vec.push(limit.to_string());
        params_vec.push(offset.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let category: Option<String> = r.get(3)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            kind: r.get(2)?,
            category: category.unwrap_or_default(),
            amount: r.get(4)?,
            description: r.get(5)?,
        });
    }
    Ok(data)
}

/// Row selection for loading typed transactions.
#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TxKind>,
    pub category_id: Option<i64>,
}

impl TxFilter {
    /// Every row dated within `first..=last` month, inclusive.
    pub fn months(first: Period, last: Period) -> Self {
        TxFilter {
            from: Some(first.first_day()),
            to: Some(last.last_day()),
            ..Default::default()
        }
    }
}

pub fn load_transactions(conn: &Connection, filter: &TxFilter) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, kind, amount, category_id, description, date, created_at FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(from) = filter.from {
        sql.push_str(" AND date>=?");
        params_vec.push(from.to_string());
    }
    if let Some(to) = filter.to {
        sql.push_str(" AND date<=?");
        params_vec.push(to.to_string());
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND kind=?");
        params_vec.push(kind.as_str().into());
    }
    if let Some(cid) = filter.category_id {
        sql.push_str(" AND category_id=?");
        params_vec.push(cid.to_string());
    }
    sql.push_str(" ORDER BY date, id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, NaiveDate>(5)?,
            r.get::<_, NaiveDateTime>(6)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, kind, amount, category_id, description, date, created_at) = row?;
        out.push(Transaction {
            id,
            kind: kind.parse::<TxKind>()?,
            amount: parse_decimal(&amount)
                .with_context(|| format!("Invalid amount '{}' on transaction #{}", amount, id))?,
            category_id,
            description,
            date,
            created_at,
        });
    }
    debug!(rows = out.len(), "transactions loaded");
    Ok(out)
}
