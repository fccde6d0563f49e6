// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{KEYS, Settings, get_setting, set_setting};
use crate::utils::pretty_table;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            if !KEYS.contains(&key) {
                return Err(anyhow!("Unknown setting '{}' (known: {})", key, KEYS.join(", ")));
            }
            // fall back to the effective default when unset
            let value = match get_setting(conn, key)? {
                Some(v) => v,
                None => Settings::default()
                    .rows()
                    .into_iter()
                    .find(|r| r[0] == key)
                    .map(|r| r[1].clone())
                    .unwrap_or_default(),
            };
            println!("{}", value);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            let stored = set_setting(conn, key, value)?;
            println!("{} = {}", key.trim(), stored);
        }
        Some(("list", _)) => {
            let settings = Settings::load(conn)?;
            println!("{}", pretty_table(&["Key", "Value"], settings.rows()));
        }
        _ => {}
    }
    Ok(())
}
