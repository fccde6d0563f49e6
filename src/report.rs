// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::aggregate::{Aggregate, PeriodStats, percent_of};
use crate::models::{Category, TxKind};

pub const DEFAULT_TOP_N: usize = 6;
pub const NEUTRAL_GRAY: &str = "#9CA3AF";

static CATEGORY_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("salary", "#10B981"),
        ("salário", "#10B981"),
        ("freelance", "#34D399"),
        ("investments", "#6366F1"),
        ("investimentos", "#6366F1"),
        ("food", "#F59E0B"),
        ("alimentação", "#F59E0B"),
        ("groceries", "#FBBF24"),
        ("transport", "#3B82F6"),
        ("transporte", "#3B82F6"),
        ("housing", "#8B5CF6"),
        ("moradia", "#8B5CF6"),
        ("health", "#EF4444"),
        ("saúde", "#EF4444"),
        ("education", "#0EA5E9"),
        ("educação", "#0EA5E9"),
        ("leisure", "#EC4899"),
        ("lazer", "#EC4899"),
        ("utilities", "#14B8A6"),
        ("shopping", "#F97316"),
    ])
});

/// Display color for a category: its own color, else the palette entry for
/// its name, else neutral gray.
pub fn color_for(category: Option<&Category>) -> String {
    let Some(cat) = category else {
        return NEUTRAL_GRAY.to_string();
    };
    if let Some(c) = cat.color.as_deref().filter(|c| !c.trim().is_empty()) {
        return c.to_string();
    }
    CATEGORY_COLORS
        .get(cat.name.trim().to_lowercase().as_str())
        .copied()
        .unwrap_or(NEUTRAL_GRAY)
        .to_string()
}

/// `USD 1,234.50`. Amounts are rounded half-away-from-zero to cents.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let s = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{} {}{}.{}", currency, sign, grouped, frac_part)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub category_id: i64,
    pub category: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub formatted: String,
    pub color: String,
}

/// Top `top_n` categories of `kind` for the aggregate's period, largest first.
pub fn breakdown_lines(
    aggregate: &Aggregate,
    categories: &[Category],
    kind: TxKind,
    top_n: usize,
    currency: &str,
) -> Vec<ReportLine> {
    let by_id: HashMap<i64, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let total = aggregate.total(kind);

    let mut lines: Vec<ReportLine> = aggregate
        .category_breakdown
        .iter()
        .map(|(id, totals)| (*id, totals.amount(kind)))
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(id, amount)| {
            let cat = by_id.get(&id).copied();
            ReportLine {
                category_id: id,
                category: cat
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "(uncategorized)".into()),
                amount,
                percentage: percent_of(amount, total).round_dp(2),
                formatted: format_currency(amount, currency),
                color: color_for(cat),
            }
        })
        .collect();

    lines.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    lines.truncate(top_n);
    lines
}

pub fn stats_lines(stats: &PeriodStats, currency: &str) -> Vec<Vec<String>> {
    let change = |v: Decimal| {
        if stats.prior_period_has_activity {
            let v = v.round_dp(2);
            // -0.001 rounds to a signed zero
            let v = if v.is_zero() { Decimal::ZERO } else { v };
            let sign = if v.is_sign_negative() { "" } else { "+" };
            format!("{}{:.2}%", sign, v)
        } else {
            "n/a".to_string()
        }
    };
    vec![
        vec![
            "Income".into(),
            format_currency(stats.period_income, currency),
            change(stats.income_change_percent),
        ],
        vec![
            "Expense".into(),
            format_currency(stats.period_expense, currency),
            change(stats.expense_change_percent),
        ],
        vec![
            "Balance".into(),
            format_currency(stats.balance, currency),
            String::new(),
        ],
    ]
}
