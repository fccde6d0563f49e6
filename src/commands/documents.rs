// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::Document;
use crate::report::format_currency;
use crate::sequence::{DocumentKind, NewDocument, create_document};
use crate::utils::{maybe_print_json, page_args, parse_amount, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("new", sub)) => new_document(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn new_document(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: DocumentKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let doc = NewDocument {
        client: sub.get_one::<String>("client").unwrap().trim().to_string(),
        title: sub.get_one::<String>("title").unwrap().trim().to_string(),
        amount: parse_amount(sub.get_one::<String>("amount").unwrap())?,
    };
    let settings = Settings::load(conn)?;
    let prefix = settings.prefix_for(kind).to_string();
    let created = create_document(conn, kind, &prefix, &doc, Local::now().naive_local())?;
    println!(
        "Created {} {} for {} ({})",
        kind,
        created.number,
        created.client,
        format_currency(created.amount, &settings.currency)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = sub
        .get_one::<String>("kind")
        .map(|k| k.parse::<DocumentKind>())
        .transpose()?;
    let year = sub.get_one::<i32>("year").copied();
    let mut docs = load_documents(conn, kind, year)?;
    if let Some((limit, offset)) = page_args(sub)? {
        docs = docs.into_iter().skip(offset).take(limit).collect();
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &docs)? {
        let rows = docs
            .into_iter()
            .map(|d| {
                vec![
                    d.number,
                    d.kind,
                    d.client,
                    d.title,
                    format!("{:.2}", d.amount),
                    d.created_at.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Number", "Kind", "Client", "Title", "Amount", "Created"],
                rows
            )
        );
    }
    Ok(())
}

/// Documents newest first, optionally narrowed to a kind and a calendar year.
pub fn load_documents(
    conn: &Connection,
    kind: Option<DocumentKind>,
    year: Option<i32>,
) -> Result<Vec<Document>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, number, client, title, amount, created_at FROM documents
         WHERE (?1 IS NULL OR kind=?1) AND (?2 IS NULL OR substr(created_at,1,4)=?2)
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(
        rusqlite::params![kind.map(|k| k.as_str()), year.map(|y| format!("{:04}", y))],
        |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, String>(5)?,
                r.get::<_, NaiveDateTime>(6)?,
            ))
        },
    )?;
    let mut out = Vec::new();
    for row in rows {
        let (id, kind, number, client, title, amount, created_at) = row?;
        out.push(Document {
            id,
            amount: parse_decimal(&amount)
                .with_context(|| format!("Invalid amount '{}' on {}", amount, number))?,
            kind,
            number,
            client,
            title,
            created_at,
        });
    }
    Ok(out)
}
