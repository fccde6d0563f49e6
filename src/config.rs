// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User settings persisted in the `settings` key/value table.

use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::report::DEFAULT_TOP_N;
use crate::sequence::DocumentKind;

pub const KEYS: &[&str] = &["currency", "top_n", "proposal_prefix", "invoice_prefix"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub currency: String,
    pub top_n: usize,
    pub proposal_prefix: String,
    pub invoice_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            top_n: DEFAULT_TOP_N,
            proposal_prefix: DocumentKind::Proposal.default_prefix().into(),
            invoice_prefix: DocumentKind::Invoice.default_prefix().into(),
        }
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut s = Settings::default();
        if let Some(v) = get_setting(conn, "currency")? {
            s.currency = v;
        }
        if let Some(v) = get_setting(conn, "top_n")? {
            s.top_n = v
                .parse()
                .map_err(|_| anyhow!("Invalid top_n setting '{}'", v))?;
        }
        if let Some(v) = get_setting(conn, "proposal_prefix")? {
            s.proposal_prefix = v;
        }
        if let Some(v) = get_setting(conn, "invoice_prefix")? {
            s.invoice_prefix = v;
        }
        Ok(s)
    }

    pub fn prefix_for(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Proposal => &self.proposal_prefix,
            DocumentKind::Invoice => &self.invoice_prefix,
        }
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        vec![
            vec!["currency".into(), self.currency.clone()],
            vec!["top_n".into(), self.top_n.to_string()],
            vec!["proposal_prefix".into(), self.proposal_prefix.clone()],
            vec!["invoice_prefix".into(), self.invoice_prefix.clone()],
        ]
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Validates and stores one setting. Values are normalized (trimmed, codes upper-cased).
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<String> {
    let key = key.trim();
    let value = value.trim();
    let normalized = match key {
        "currency" => {
            if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(anyhow!("Invalid currency '{}', expected a 3-letter code", value));
            }
            value.to_uppercase()
        }
        "top_n" => {
            let n: usize = value
                .parse()
                .map_err(|_| anyhow!("Invalid top_n '{}', expected a positive integer", value))?;
            if n == 0 {
                return Err(anyhow!("top_n must be at least 1"));
            }
            n.to_string()
        }
        "proposal_prefix" | "invoice_prefix" => {
            let ok = value.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && value.chars().all(|c| c.is_ascii_alphanumeric());
            if !ok {
                return Err(anyhow!("Invalid prefix '{}', expected letters and digits", value));
            }
            value.to_uppercase()
        }
        other => {
            return Err(anyhow!(
                "Unknown setting '{}' (known: {})",
                other,
                KEYS.join(", ")
            ));
        }
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, &normalized],
    )?;
    Ok(normalized)
}
