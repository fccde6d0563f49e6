// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashclip::{cli, commands::exporter, db};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO transactions(kind, amount, category_id, description, date, created_at)
         SELECT 'expense', '12.34', id, 'Weekly run', '2025-01-02', '2025-01-02 08:00:00'
         FROM categories WHERE name='Food' AND kind='expense'",
        [],
    )
    .unwrap();
    conn
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "cashclip",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    export(&conn, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "date": "2025-01-02",
                "kind": "expense",
                "category": "Food",
                "amount": "12.34",
                "description": "Weekly run",
                "created_at": "2025-01-02 08:00:00"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv_header_and_rows() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    export(&conn, " CSV ", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("id,date,kind,category,amount,description,created_at")
    );
    assert_eq!(
        lines.next(),
        Some("1,2025-01-02,expense,Food,12.34,Weekly run,2025-01-02 08:00:00")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    assert!(export(&conn, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
