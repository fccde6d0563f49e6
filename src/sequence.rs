// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Year-scoped document numbers such as `PROP-2025-0004`.
//!
//! [`format_sequence`] is the pure part: the next number after `count`
//! existing documents of the year. [`create_document`] allocates and inserts
//! in one IMMEDIATE transaction against a `UNIQUE(number)` column, so two
//! writers can never both persist the same number; a collision with an
//! existing row (e.g. after deletions shrank the count) is retried with a
//! fresh candidate.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::errors::{CoreError, CoreResult};
use crate::models::Document;

pub const MAX_ATTEMPTS: u32 = 5;

static SEQUENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9]*)-(\d{4})-(\d{4,})$").expect("static pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Proposal,
    Invoice,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Proposal => "proposal",
            DocumentKind::Invoice => "invoice",
        }
    }

    pub fn default_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Proposal => "PROP",
            DocumentKind::Invoice => "INV",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proposal" | "prop" => Ok(DocumentKind::Proposal),
            "invoice" | "inv" => Ok(DocumentKind::Invoice),
            _ => Err(CoreError::InvalidDocumentKind(s.trim().to_string())),
        }
    }
}

/// `{prefix}-{year}-{count + 1}`, the sequence part zero-padded to at least 4 digits.
pub fn format_sequence(prefix: &str, year: i32, existing_count: u64) -> String {
    format_number(prefix, year, existing_count + 1)
}

fn format_number(prefix: &str, year: i32, n: u64) -> String {
    format!("{}-{}-{:04}", prefix, year, n)
}

/// Splits `PROP-2025-0004` into `("PROP", 2025, 4)`.
pub fn parse_sequence(number: &str) -> Option<(String, i32, u64)> {
    let caps = SEQUENCE_RE.captures(number.trim())?;
    let year = caps.get(2)?.as_str().parse().ok()?;
    let n = caps.get(3)?.as_str().parse().ok()?;
    Some((caps.get(1)?.as_str().to_string(), year, n))
}

/// Documents of `kind` created within `[year-01-01, year+1-01-01)`.
pub fn count_in_year(conn: &Connection, kind: DocumentKind, year: i32) -> CoreResult<u64> {
    let from = format!("{:04}-01-01", year);
    let to = format!("{:04}-01-01", year + 1);
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE kind=?1 AND created_at>=?2 AND created_at<?3",
        params![kind.as_str(), from, to],
        |r| r.get(0),
    )?;
    Ok(n.max(0) as u64)
}

fn highest_in_year(conn: &Connection, prefix: &str, year: i32) -> CoreResult<u64> {
    let mut stmt = conn.prepare("SELECT number FROM documents WHERE number LIKE ?1")?;
    let rows = stmt.query_map(params![format!("{}-{}-%", prefix, year)], |r| {
        r.get::<_, String>(0)
    })?;
    let mut highest = 0;
    for row in rows {
        if let Some((p, y, n)) = parse_sequence(&row?) {
            if p == prefix && y == year {
                highest = highest.max(n);
            }
        }
    }
    Ok(highest)
}

fn number_taken(conn: &Connection, number: &str) -> CoreResult<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT id FROM documents WHERE number=?1",
            params![number],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub client: String,
    pub title: String,
    pub amount: Decimal,
}

/// Numbers and inserts a document created at `created_at`.
pub fn create_document(
    conn: &mut Connection,
    kind: DocumentKind,
    prefix: &str,
    doc: &NewDocument,
    created_at: NaiveDateTime,
) -> CoreResult<Document> {
    use chrono::Datelike;

    let year = created_at.year();
    let stamp = created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut candidate = count_in_year(&tx, kind, year)? + 1;
    for attempt in 1..=MAX_ATTEMPTS {
        let number = format_number(prefix, year, candidate);
        let res = tx.execute(
            "INSERT INTO documents(kind, number, client, title, amount, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                kind.as_str(),
                &number,
                &doc.client,
                &doc.title,
                doc.amount.to_string(),
                &stamp
            ],
        );
        match res {
            Ok(_) => {
                let id = tx.last_insert_rowid();
                tx.commit()?;
                info!(%number, kind = kind.as_str(), attempt, "document numbered");
                return Ok(Document {
                    id,
                    kind: kind.as_str().to_string(),
                    number,
                    client: doc.client.clone(),
                    title: doc.title.clone(),
                    amount: doc.amount,
                    created_at,
                });
            }
            Err(rusqlite::Error::SqliteFailure(err, msg))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                if !number_taken(&tx, &number)? {
                    return Err(rusqlite::Error::SqliteFailure(err, msg).into());
                }
                let recount = count_in_year(&tx, kind, year)? + 1;
                let past_highest = highest_in_year(&tx, prefix, year)? + 1;
                warn!(%number, attempt, "document number already taken, retrying");
                candidate = recount.max(past_highest).max(candidate + 1);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(CoreError::SequenceExhausted {
        kind: kind.as_str(),
        year,
        attempts: MAX_ATTEMPTS,
    })
}
