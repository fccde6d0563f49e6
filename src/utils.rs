// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::aggregate::Period;
use crate::errors::CoreError;
use crate::models::TxKind;

static TRACING_INIT: Once = Once::new();

/// Installs the global fmt subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cashclip=warn"));
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<Period> {
    Ok(Period::parse(s)?)
}

/// The month given on the command line, or the current local month.
pub fn month_or_current(s: Option<&String>) -> Result<Period> {
    match s {
        Some(m) => parse_month(m),
        None => Ok(Period::current()),
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Money entered by the user: a decimal that must not be negative.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_| CoreError::InvalidAmount(s.to_string(), "not a decimal number"))?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(CoreError::InvalidAmount(s.to_string(), "must not be negative").into());
    }
    Ok(d)
}

pub fn parse_kind(s: &str) -> Result<TxKind> {
    Ok(s.parse::<TxKind>()?)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_category(conn: &Connection, name: &str, kind: TxKind) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE name=?1 AND kind=?2")?;
    let id: i64 = stmt
        .query_row(params![name.trim(), kind.as_str()], |r| r.get(0))
        .with_context(|| format!("Category '{}' ({}) not found", name.trim(), kind))?;
    Ok(id)
}

/// Reads an optional `--limit/--offset` pair, rejecting a dangling offset.
pub fn page_args(sub: &clap::ArgMatches) -> Result<Option<(usize, usize)>> {
    let limit = sub.get_one::<usize>("limit").copied();
    let offset = sub.get_one::<usize>("offset").copied().unwrap_or(0);
    match limit {
        Some(l) => Ok(Some((l, offset))),
        None if offset > 0 => Err(anyhow!("--offset requires --limit")),
        None => Ok(None),
    }
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
