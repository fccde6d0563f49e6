// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{Period, aggregate, dashboard, monthly_series, period_stats};
use crate::commands::cards::load_card_charges;
use crate::commands::categories::load_categories;
use crate::commands::investments::load_investments;
use crate::commands::transactions::{TxFilter, load_transactions};
use crate::config::Settings;
use crate::report::{breakdown_lines, format_currency, stats_lines};
use crate::utils::{maybe_print_json, month_or_current, parse_kind, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::debug;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, &settings, sub)?,
        Some(("categories", sub)) => categories(conn, &settings, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, &settings, sub)?,
        Some(("dashboard", sub)) => dashboard_report(conn, &settings, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let period = month_or_current(sub.get_one::<String>("month"))?;
    let txs = load_transactions(conn, &TxFilter::months(period.previous(), period))?;
    let stats = period_stats(&txs, period);
    debug!(%period, rows = txs.len(), "summary computed");
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        println!("Period {}", period);
        println!(
            "{}",
            pretty_table(
                &["", "Amount", "vs previous month"],
                stats_lines(&stats, &settings.currency)
            )
        );
    }
    Ok(())
}

fn categories(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let period = month_or_current(sub.get_one::<String>("month"))?;
    let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let top_n = sub.get_one::<usize>("top").copied().unwrap_or(settings.top_n);
    if top_n == 0 {
        return Err(anyhow!("--top must be at least 1"));
    }
    let txs = load_transactions(conn, &TxFilter::months(period, period))?;
    let cats = load_categories(conn)?;
    let agg = aggregate(&txs, period);
    let lines = breakdown_lines(&agg, &cats, kind, top_n, &settings.currency);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &lines)? {
        let rows = lines
            .into_iter()
            .map(|l| {
                vec![
                    l.category,
                    l.formatted,
                    format!("{:.2}%", l.percentage),
                    l.color,
                ]
            })
            .collect();
        println!(
            "{} by category, {} (total {})",
            kind,
            period,
            format_currency(agg.total(kind), &settings.currency)
        );
        println!(
            "{}",
            pretty_table(&["Category", "Amount", "Share", "Color"], rows)
        );
    }
    Ok(())
}

fn cashflow(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let end = month_or_current(sub.get_one::<String>("month"))?;
    let months = usize::from(*sub.get_one::<u16>("months").unwrap_or(&12));
    let mut first = end;
    for _ in 1..months {
        first = first.previous();
    }
    let txs = load_transactions(conn, &TxFilter::months(first, end))?;
    let series = monthly_series(&txs, end, months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        let ccy = &settings.currency;
        let data = series
            .iter()
            .rev()
            .map(|m| {
                vec![
                    m.period.to_string(),
                    format_currency(m.income, ccy),
                    format_currency(m.expense, ccy),
                    format_currency(m.balance, ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Balance"], data)
        );
    }
    Ok(())
}

fn dashboard_report(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let period: Period = month_or_current(sub.get_one::<String>("month"))?;
    let txs = load_transactions(conn, &TxFilter::months(period.previous(), period))?;
    let investments = load_investments(conn, Some(period))?;
    let charges = load_card_charges(conn)?;
    let dash = dashboard(&txs, &investments, &charges, period);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        let ccy = &settings.currency;
        let mut rows = stats_lines(&dash.stats, ccy);
        rows.push(vec![
            "Card bill".into(),
            format_currency(dash.card_spend, ccy),
            String::new(),
        ]);
        rows.push(vec![
            "After card bill".into(),
            format_currency(dash.committed_balance, ccy),
            String::new(),
        ]);
        rows.push(vec![
            "Invested".into(),
            format_currency(dash.invested, ccy),
            String::new(),
        ]);
        println!("Dashboard {}", period);
        println!(
            "{}",
            pretty_table(&["", "Amount", "vs previous month"], rows)
        );
    }
    Ok(())
}
