// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashclip::aggregate::{Period, PeriodStats, aggregate, period_stats};
use cashclip::models::{Category, Transaction, TxKind};
use cashclip::report::{
    DEFAULT_TOP_N, NEUTRAL_GRAY, breakdown_lines, color_for, format_currency, stats_lines,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn cat(id: i64, name: &str, kind: TxKind, color: Option<&str>) -> Category {
    Category {
        id,
        name: name.into(),
        kind,
        color: color.map(|c| c.to_string()),
    }
}

fn expense(id: i64, amount: &str, category_id: i64) -> Transaction {
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    Transaction {
        id,
        kind: TxKind::Expense,
        amount: dec(amount),
        category_id,
        description: String::new(),
        date,
        created_at: date.and_hms_opt(9, 0, 0).unwrap(),
    }
}

fn march() -> Period {
    Period::new(2025, 3).unwrap()
}

#[test]
fn currency_is_grouped_and_rounded() {
    assert_eq!(format_currency(dec("1234.5"), "USD"), "USD 1,234.50");
    assert_eq!(format_currency(Decimal::ZERO, "USD"), "USD 0.00");
    assert_eq!(format_currency(dec("-12"), "BRL"), "BRL -12.00");
    assert_eq!(format_currency(dec("1234567.891"), "EUR"), "EUR 1,234,567.89");
    assert_eq!(format_currency(dec("999.999"), "USD"), "USD 1,000.00");
    assert_eq!(format_currency(dec("0.125"), "USD"), "USD 0.13");
    assert_eq!(format_currency(dec("-0.001"), "USD"), "USD 0.00");
}

#[test]
fn colors_fall_back_to_palette_then_gray() {
    let own = cat(1, "Food", TxKind::Expense, Some("#123456"));
    let palette = cat(2, "food", TxKind::Expense, None);
    let unknown = cat(3, "Pets", TxKind::Expense, None);
    assert_eq!(color_for(Some(&own)), "#123456");
    assert_eq!(color_for(Some(&palette)), "#F59E0B");
    assert_eq!(color_for(Some(&unknown)), NEUTRAL_GRAY);
    assert_eq!(color_for(None), NEUTRAL_GRAY);
}

#[test]
fn breakdown_is_sorted_and_truncated_to_top_n() {
    let categories: Vec<Category> = (1..=8)
        .map(|i| cat(i, &format!("C{}", i), TxKind::Expense, None))
        .collect();
    let txs: Vec<Transaction> = (1..=8)
        .map(|i| expense(i, &(i * 10).to_string(), i))
        .collect();
    let agg = aggregate(&txs, march());
    let before = agg.clone();

    let lines = breakdown_lines(&agg, &categories, TxKind::Expense, DEFAULT_TOP_N, "USD");
    assert_eq!(lines.len(), 6);
    let names: Vec<&str> = lines.iter().map(|l| l.category.as_str()).collect();
    assert_eq!(names, vec!["C8", "C7", "C6", "C5", "C4", "C3"]);
    assert_eq!(lines[0].formatted, "USD 80.00");
    // 80 of 360
    assert_eq!(lines[0].percentage, dec("22.22"));
    assert_eq!(lines[0].color, NEUTRAL_GRAY);
    assert_eq!(agg, before);
}

#[test]
fn breakdown_skips_other_kind_and_names_unknown_categories() {
    let categories = vec![
        cat(1, "Food", TxKind::Expense, None),
        cat(2, "Salary", TxKind::Income, None),
    ];
    let mut txs = vec![expense(1, "30", 1), expense(2, "30", 42)];
    let mut pay = expense(3, "500", 2);
    pay.kind = TxKind::Income;
    txs.push(pay);

    let agg = aggregate(&txs, march());
    let lines = breakdown_lines(&agg, &categories, TxKind::Expense, 10, "USD");
    assert_eq!(lines.len(), 2);
    // equal amounts fall back to name order
    assert_eq!(lines[0].category, "(uncategorized)");
    assert_eq!(lines[1].category, "Food");
    assert_eq!(lines[1].color, "#F59E0B");
    assert_eq!(lines[1].percentage, dec("50"));

    let income = breakdown_lines(&agg, &categories, TxKind::Income, 10, "USD");
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].percentage, dec("100"));
}

#[test]
fn empty_aggregate_formats_to_nothing() {
    let agg = aggregate(&[], march());
    assert!(breakdown_lines(&agg, &[], TxKind::Expense, 6, "USD").is_empty());
}

#[test]
fn stats_lines_mark_missing_baseline() {
    let txs = vec![expense(1, "30", 1)];
    let stats = period_stats(&txs, march());
    let rows = stats_lines(&stats, "USD");
    assert_eq!(rows[1], vec!["Expense", "USD 30.00", "n/a"]);
    assert_eq!(rows[2][1], "USD -30.00");

    let mut earlier = expense(2, "60", 1);
    earlier.date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
    let stats = period_stats(&[txs[0].clone(), earlier], march());
    let rows = stats_lines(&stats, "USD");
    assert_eq!(rows[1][2], "-50.00%");
    assert_eq!(rows[0][2], "+0.00%");
}

#[test]
fn stats_lines_print_tiny_drop_as_unsigned_zero() {
    let stats = PeriodStats {
        period: march(),
        period_income: dec("100"),
        period_expense: dec("100"),
        balance: Decimal::ZERO,
        income_change_percent: dec("0.001"),
        expense_change_percent: dec("-0.001"),
        prior_period_has_activity: true,
    };
    let rows = stats_lines(&stats, "USD");
    assert_eq!(rows[0][2], "+0.00%");
    assert_eq!(rows[1][2], "+0.00%");
}
