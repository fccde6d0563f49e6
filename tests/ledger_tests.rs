// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashclip::aggregate::{Period, dashboard};
use cashclip::commands::cards::load_card_charges;
use cashclip::commands::goals::load_goals;
use cashclip::commands::investments::load_investments;
use cashclip::commands::notes::load_notes;
use cashclip::commands::transactions::{TxFilter, load_transactions};
use cashclip::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dispatch(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["cashclip"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("category", sub)) => commands::categories::handle(conn, sub),
        Some(("tx", sub)) => commands::transactions::handle(conn, sub),
        Some(("invest", sub)) => commands::investments::handle(conn, sub),
        Some(("card", sub)) => commands::cards::handle(conn, sub),
        Some(("goal", sub)) => commands::goals::handle(conn, sub),
        Some(("note", sub)) => commands::notes::handle(conn, sub),
        Some(("report", sub)) => commands::reports::handle(conn, sub),
        other => panic!("unexpected command {:?}", other.map(|o| o.0)),
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

#[test]
fn card_installments_feed_the_dashboard() {
    let conn = db::open_in_memory().unwrap();
    dispatch(
        &conn,
        &[
            "tx", "add", "--kind", "income", "--amount", "3000", "--category", "Salary",
            "--date", "2025-04-05",
        ],
    )
    .unwrap();
    dispatch(
        &conn,
        &[
            "card",
            "add",
            "--card",
            "Visa",
            "--description",
            "Phone",
            "--amount",
            "1200",
            "--date",
            "2025-03-28",
            "--installments",
            "4",
            "--category",
            "Leisure",
        ],
    )
    .unwrap();
    dispatch(
        &conn,
        &[
            "invest", "add", "--name", "Treasury", "--kind", "fixed income", "--amount", "500",
            "--date", "2025-04-10",
        ],
    )
    .unwrap();

    let charges = load_card_charges(&conn).unwrap();
    assert_eq!(charges.len(), 1);
    assert_eq!(charges[0].installments, 4);
    assert!(charges[0].category_id.is_some());

    let april = Period::new(2025, 4).unwrap();
    let txs = load_transactions(&conn, &TxFilter::months(april.previous(), april)).unwrap();
    let investments = load_investments(&conn, Some(april)).unwrap();
    let dash = dashboard(&txs, &investments, &charges, april);
    assert_eq!(dash.card_spend, dec("300"));
    assert_eq!(dash.invested, dec("500"));
    assert_eq!(dash.committed_balance, dec("2700"));
}

#[test]
fn card_rejects_zero_installments() {
    let cmd = cli::build_cli();
    let res = cmd.try_get_matches_from([
        "cashclip",
        "card",
        "add",
        "--card",
        "Visa",
        "--description",
        "X",
        "--amount",
        "10",
        "--date",
        "2025-01-01",
        "--installments",
        "0",
    ]);
    assert!(res.is_err());
}

#[test]
fn goal_deposits_accumulate() {
    let conn = db::open_in_memory().unwrap();
    dispatch(&conn, &["goal", "add", "--name", " Trip ", "--target", "2000"]).unwrap();
    dispatch(&conn, &["goal", "deposit", "--name", "Trip", "--amount", "250.50"]).unwrap();
    dispatch(&conn, &["goal", "deposit", "--name", "Trip", "--amount", "249.50"]).unwrap();
    assert!(dispatch(&conn, &["goal", "deposit", "--name", "Car", "--amount", "1"]).is_err());
    assert!(dispatch(&conn, &["goal", "add", "--name", "Zero", "--target", "0"]).is_err());

    let goals = load_goals(&conn).unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].name, "Trip");
    assert_eq!(goals[0].saved, dec("500"));
}

#[test]
fn category_add_validates_color_and_duplicates() {
    let conn = db::open_in_memory().unwrap();
    dispatch(
        &conn,
        &["category", "add", "--name", "Pets", "--kind", "expense", "--color", "#aabbcc"],
    )
    .unwrap();
    assert!(
        dispatch(&conn, &["category", "add", "--name", "Pets", "--kind", "expense"]).is_err()
    );
    assert!(
        dispatch(
            &conn,
            &["category", "add", "--name", "Gifts", "--kind", "expense", "--color", "red"],
        )
        .is_err()
    );
    // same name, other kind is a different category
    dispatch(&conn, &["category", "add", "--name", "Pets", "--kind", "income"]).unwrap();
}

#[test]
fn reports_run_in_json_mode() {
    let conn = db::open_in_memory().unwrap();
    dispatch(
        &conn,
        &[
            "tx", "add", "--kind", "expense", "--amount", "42", "--category", "Food", "--date",
            "2025-05-02",
        ],
    )
    .unwrap();
    for report in ["summary", "categories", "cashflow", "dashboard"] {
        dispatch(&conn, &["report", report, "--month", "2025-05", "--json"]).unwrap();
    }
    assert!(dispatch(&conn, &["report", "summary", "--month", "2025-5"]).is_err());
    assert!(dispatch(&conn, &["report", "categories", "--top", "0"]).is_err());
}

#[test]
fn cashflow_months_is_bounded() {
    for months in ["0", "1201", "3200000"] {
        let res = cli::build_cli()
            .try_get_matches_from(["cashclip", "report", "cashflow", "--months", months]);
        assert!(res.is_err(), "--months {} should be rejected", months);
    }
    let conn = db::open_in_memory().unwrap();
    dispatch(
        &conn,
        &["report", "cashflow", "--month", "2025-05", "--months", "1200", "--json"],
    )
    .unwrap();
}

#[test]
fn notes_add_list_and_remove() {
    let conn = db::open_in_memory().unwrap();
    dispatch(
        &conn,
        &["note", "add", "--title", " Renew lease ", "--body", "Call landlord in June"],
    )
    .unwrap();
    dispatch(&conn, &["note", "add", "--title", "Tax docs"]).unwrap();
    assert!(dispatch(&conn, &["note", "add", "--title", "   "]).is_err());
    dispatch(&conn, &["note", "list", "--json"]).unwrap();

    let notes = load_notes(&conn).unwrap();
    assert_eq!(notes.len(), 2);
    let lease = notes.iter().find(|n| n.title == "Renew lease").unwrap();
    assert_eq!(lease.body, "Call landlord in June");
    let tax = notes.iter().find(|n| n.title == "Tax docs").unwrap();
    assert_eq!(tax.body, "");

    let lease_id = lease.id.to_string();
    dispatch(&conn, &["note", "rm", "--id", lease_id.as_str()]).unwrap();
    assert!(dispatch(&conn, &["note", "rm", "--id", lease_id.as_str()]).is_err());
    let notes = load_notes(&conn).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Tax docs");
}
