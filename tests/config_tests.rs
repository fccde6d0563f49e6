// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashclip::config::{Settings, get_setting, set_setting};
use cashclip::sequence::DocumentKind;
use cashclip::{cli, commands::settings, db};

#[test]
fn defaults_apply_when_unset() {
    let conn = db::open_in_memory().unwrap();
    let s = Settings::load(&conn).unwrap();
    assert_eq!(s, Settings::default());
    assert_eq!(s.currency, "USD");
    assert_eq!(s.top_n, 6);
    assert_eq!(s.prefix_for(DocumentKind::Proposal), "PROP");
    assert_eq!(s.prefix_for(DocumentKind::Invoice), "INV");
}

#[test]
fn set_normalizes_and_validates() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(set_setting(&conn, "currency", " brl ").unwrap(), "BRL");
    assert_eq!(set_setting(&conn, "invoice_prefix", "fat").unwrap(), "FAT");
    assert_eq!(set_setting(&conn, "top_n", "10").unwrap(), "10");

    assert!(set_setting(&conn, "currency", "reais").is_err());
    assert!(set_setting(&conn, "top_n", "0").is_err());
    assert!(set_setting(&conn, "invoice_prefix", "9X").is_err());
    assert!(set_setting(&conn, "theme", "dark").is_err());

    let s = Settings::load(&conn).unwrap();
    assert_eq!(s.currency, "BRL");
    assert_eq!(s.top_n, 10);
    assert_eq!(s.prefix_for(DocumentKind::Invoice), "FAT");
}

#[test]
fn config_set_command_trims_key() {
    let conn = db::open_in_memory().unwrap();
    let matches = cli::build_cli().get_matches_from([
        "cashclip", "config", "set", "--key", " currency ", "--value", "eur",
    ]);
    if let Some(("config", config_m)) = matches.subcommand() {
        settings::handle(&conn, config_m).unwrap();
    } else {
        panic!("config command not parsed");
    }
    assert_eq!(
        get_setting(&conn, "currency").unwrap(),
        Some("EUR".to_string())
    );
}

#[test]
fn corrupt_top_n_is_reported() {
    let conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO settings(key,value) VALUES('top_n','many')",
        [],
    )
    .unwrap();
    let err = Settings::load(&conn).unwrap_err();
    assert!(err.to_string().contains("Invalid top_n"));
}
