// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregation over already-loaded rows.
//!
//! Nothing here touches the database or any global state: the same rows and
//! period always produce the same output, so results can be recomputed or
//! cached by the caller at will.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::errors::{CoreError, CoreResult};
use crate::models::{CardCharge, Goal, Investment, Transaction, TxKind};

/// A calendar month. Always anchored on the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    start: NaiveDate,
}

impl Period {
    pub fn new(year: i32, month: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|start| Period { start })
            .ok_or_else(|| CoreError::InvalidPeriod(format!("{:04}-{:02}", year, month)))
    }

    /// Parses `YYYY-MM`.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        let shaped = s.len() == 7 && s.as_bytes()[4] == b'-';
        if !shaped {
            return Err(CoreError::InvalidPeriod(s.to_string()));
        }
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(|start| Period { start })
            .map_err(|_| CoreError::InvalidPeriod(s.to_string()))
    }

    /// The month containing today, in the server's local time.
    pub fn current() -> Self {
        Period::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        Period {
            start: date - Duration::days(date.day0() as i64),
        }
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start
    }

    pub fn last_day(&self) -> NaiveDate {
        match self.next() {
            next if next == *self => NaiveDate::MAX,
            next => next.start.pred_opt().unwrap_or(self.start),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Period::containing(date) == *self
    }

    /// The month before. Saturates at the earliest representable month.
    pub fn previous(&self) -> Self {
        self.start
            .pred_opt()
            .map(Period::containing)
            .unwrap_or(*self)
    }

    /// The month after. Saturates at the latest representable month.
    pub fn next(&self) -> Self {
        // day 1 + 31 days always lands in the following month
        self.start
            .checked_add_signed(Duration::days(31))
            .map(Period::containing)
            .unwrap_or(*self)
    }

    /// Months elapsed from `other` to `self` (negative when `other` is later).
    pub fn months_since(&self, other: &Period) -> i64 {
        self.index() - other.index()
    }

    fn index(&self) -> i64 {
        self.year() as i64 * 12 + self.start.month0() as i64
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl CategoryTotals {
    pub fn amount(&self, kind: TxKind) -> Decimal {
        match kind {
            TxKind::Income => self.income,
            TxKind::Expense => self.expense,
        }
    }

    fn add(&mut self, kind: TxKind, amount: Decimal) {
        match kind {
            TxKind::Income => self.income += amount,
            TxKind::Expense => self.expense += amount,
        }
    }
}

/// Totals for one period plus per-category subtotals keyed by category id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub period: Period,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    /// Subtotals of the rows inside `period`; sums to the period totals.
    pub category_breakdown: BTreeMap<i64, CategoryTotals>,
    /// Subtotals folded over every row, ignoring `period`.
    pub lifetime_breakdown: BTreeMap<i64, CategoryTotals>,
}

impl Aggregate {
    pub fn total(&self, kind: TxKind) -> Decimal {
        match kind {
            TxKind::Income => self.total_income,
            TxKind::Expense => self.total_expense,
        }
    }

    /// Share of the period total of `kind` that falls in `category_id`, in percent.
    pub fn percentage(&self, category_id: i64, kind: TxKind) -> Decimal {
        let part = self
            .category_breakdown
            .get(&category_id)
            .map(|t| t.amount(kind))
            .unwrap_or(Decimal::ZERO);
        percent_of(part, self.total(kind))
    }
}

pub fn aggregate(transactions: &[Transaction], period: Period) -> Aggregate {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut category_breakdown: BTreeMap<i64, CategoryTotals> = BTreeMap::new();
    let mut lifetime_breakdown: BTreeMap<i64, CategoryTotals> = BTreeMap::new();

    for tx in transactions {
        lifetime_breakdown
            .entry(tx.category_id)
            .or_default()
            .add(tx.kind, tx.amount);
        if !period.contains(tx.date) {
            continue;
        }
        match tx.kind {
            TxKind::Income => total_income += tx.amount,
            TxKind::Expense => total_expense += tx.amount,
        }
        category_breakdown
            .entry(tx.category_id)
            .or_default()
            .add(tx.kind, tx.amount);
    }

    Aggregate {
        period,
        total_income,
        total_expense,
        balance: total_income - total_expense,
        category_breakdown,
        lifetime_breakdown,
    }
}

/// `part / whole * 100`, or zero when `whole` is zero (or the ratio overflows).
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Relative change from `prior` to `current`, in percent. Zero when there is no baseline.
pub fn change_percent(current: Decimal, prior: Decimal) -> Decimal {
    percent_of(current - prior, prior)
}

pub fn period_total(transactions: &[Transaction], period: Period, kind: TxKind) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == kind && period.contains(t.date))
        .map(|t| t.amount)
        .sum()
}

pub fn month_over_month_change(
    transactions: &[Transaction],
    period: Period,
    kind: TxKind,
) -> Decimal {
    let current = period_total(transactions, period, kind);
    let prior = period_total(transactions, period.previous(), kind);
    change_percent(current, prior)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub period: Period,
    pub period_income: Decimal,
    pub period_expense: Decimal,
    pub balance: Decimal,
    pub income_change_percent: Decimal,
    pub expense_change_percent: Decimal,
    /// False when the previous month has no rows at all, in which case both
    /// change percentages are reported as zero.
    pub prior_period_has_activity: bool,
}

pub fn period_stats(transactions: &[Transaction], period: Period) -> PeriodStats {
    let prior = period.previous();
    let income = period_total(transactions, period, TxKind::Income);
    let expense = period_total(transactions, period, TxKind::Expense);
    let prior_income = period_total(transactions, prior, TxKind::Income);
    let prior_expense = period_total(transactions, prior, TxKind::Expense);

    PeriodStats {
        period,
        period_income: income,
        period_expense: expense,
        balance: income - expense,
        income_change_percent: change_percent(income, prior_income),
        expense_change_percent: change_percent(expense, prior_expense),
        prior_period_has_activity: transactions.iter().any(|t| prior.contains(t.date)),
    }
}

/// Longest series `monthly_series` builds (a century).
pub const MAX_SERIES_MONTHS: usize = 1200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub period: Period,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Income and expense for the `months` calendar months ending at `end`, oldest first.
/// Months without rows are reported with zero totals. At most
/// [`MAX_SERIES_MONTHS`] months are produced.
pub fn monthly_series(transactions: &[Transaction], end: Period, months: usize) -> Vec<MonthTotals> {
    let months = months.min(MAX_SERIES_MONTHS);
    let mut periods = Vec::with_capacity(months);
    let mut p = end;
    for _ in 0..months {
        periods.push(p);
        p = p.previous();
    }
    periods.reverse();

    let mut sums: BTreeMap<Period, CategoryTotals> =
        periods.iter().map(|p| (*p, CategoryTotals::default())).collect();
    for tx in transactions {
        if let Some(slot) = sums.get_mut(&Period::containing(tx.date)) {
            slot.add(tx.kind, tx.amount);
        }
    }

    sums.into_iter()
        .map(|(period, t)| MonthTotals {
            period,
            income: t.income,
            expense: t.expense,
            balance: t.income - t.expense,
        })
        .collect()
}

/// The part of a card purchase billed in `period`.
///
/// A purchase of `n` installments is billed over the `n` months starting with
/// the month of purchase. Each installment is truncated to cents; the last one
/// absorbs the remainder, so installments sum to the amount and none is negative.
pub fn installment_due(charge: &CardCharge, period: Period) -> Decimal {
    let n = charge.installments.max(1);
    let offset = period.months_since(&Period::containing(charge.date));
    if offset < 0 || offset >= n as i64 {
        return Decimal::ZERO;
    }
    let share = (charge.amount / Decimal::from(n))
        .round_dp_with_strategy(2, RoundingStrategy::ToZero);
    if offset == n as i64 - 1 {
        charge.amount - share * Decimal::from(n - 1)
    } else {
        share
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub stats: PeriodStats,
    pub invested: Decimal,
    pub card_spend: Decimal,
    /// Balance left after this month's card bill.
    pub committed_balance: Decimal,
}

pub fn dashboard(
    transactions: &[Transaction],
    investments: &[Investment],
    charges: &[CardCharge],
    period: Period,
) -> Dashboard {
    let stats = period_stats(transactions, period);
    let invested = investments
        .iter()
        .filter(|i| period.contains(i.date))
        .map(|i| i.amount)
        .sum();
    let card_spend: Decimal = charges.iter().map(|c| installment_due(c, period)).sum();
    let committed_balance = stats.balance - card_spend;
    Dashboard {
        stats,
        invested,
        card_spend,
        committed_balance,
    }
}

/// Percent of the goal's target already saved, capped at 100.
pub fn goal_progress(goal: &Goal) -> Decimal {
    percent_of(goal.saved, goal.target).min(Decimal::ONE_HUNDRED)
}
