// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Income/expense rollups over fetched transactions.
//!
//! Everything here is pure: callers fetch rows from a store, pass them in
//! together with "today", and render the result.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Category, MonthlyBucket, Transaction, TxKind};
use crate::utils::{month_end, month_start, months_back};

/// Number of calendar months on the dashboard, current month included.
pub const WINDOW_MONTHS: usize = 6;

pub const UNCATEGORIZED: &str = "(uncategorized)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl Totals {
    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_savings: Decimal,
    pub income_change: Decimal,
    pub expenses_change: Decimal,
    pub savings_change: Decimal,
    pub months: Vec<MonthlyBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAlert {
    pub category: String,
    pub current: Decimal,
    pub previous: Decimal,
    pub change: Decimal,
}

pub fn totals(txs: &[Transaction]) -> Totals {
    txs.iter().fold(Totals::default(), |mut acc, tx| {
        match tx.kind {
            TxKind::Income => acc.income += tx.amount,
            TxKind::Expense => acc.expenses += tx.amount,
        }
        acc
    })
}

/// Inclusive date bounds of the dashboard window ending in `today`'s month.
pub fn dashboard_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = month_end(today);
    let start = months_back(end, (WINDOW_MONTHS - 1) as u32);
    (start, end)
}

/// First day of each window month, oldest first.
pub fn window_months(today: NaiveDate) -> [NaiveDate; WINDOW_MONTHS] {
    let mut out = [month_start(today); WINDOW_MONTHS];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = months_back(today, (WINDOW_MONTHS - 1 - i) as u32);
    }
    out
}

/// One bucket per window month, ascending. Months without activity stay at
/// zero; transactions outside the window are not bucketed.
pub fn monthly_buckets(txs: &[Transaction], today: NaiveDate) -> Vec<MonthlyBucket> {
    let months = window_months(today);
    let mut buckets: Vec<MonthlyBucket> = months
        .iter()
        .map(|m| MonthlyBucket {
            month: m.format("%b %Y").to_string(),
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        })
        .collect();

    for tx in txs {
        let key = month_start(tx.date);
        let Some(idx) = months.iter().position(|m| *m == key) else {
            continue;
        };
        match tx.kind {
            TxKind::Income => buckets[idx].income += tx.amount,
            TxKind::Expense => buckets[idx].expenses += tx.amount,
        }
    }
    buckets
}

/// Zero when there is no previous value to compare against.
pub fn percentage_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    (current - previous)
        .checked_div(previous)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

pub fn summarize(txs: &[Transaction], today: NaiveDate) -> DashboardSummary {
    let t = totals(txs);
    let months = monthly_buckets(txs, today);
    // Contiguous by construction: the last bucket is this month, the one
    // before it is last month.
    let current = &months[WINDOW_MONTHS - 1];
    let previous = &months[WINDOW_MONTHS - 2];

    DashboardSummary {
        total_income: t.income,
        total_expenses: t.expenses,
        net_savings: t.net(),
        income_change: percentage_change(current.income, previous.income),
        expenses_change: percentage_change(current.expenses, previous.expenses),
        savings_change: percentage_change(
            current.income - current.expenses,
            previous.income - previous.expenses,
        ),
        months,
    }
}

fn category_names(categories: &[Category]) -> HashMap<Uuid, &str> {
    categories.iter().map(|c| (c.id, c.name.as_str())).collect()
}

fn category_label(names: &HashMap<Uuid, &str>, id: Option<Uuid>) -> String {
    id.and_then(|id| names.get(&id).copied())
        .unwrap_or(UNCATEGORIZED)
        .to_string()
}

/// Per-category totals for one kind, largest first, with each row's share of
/// the total in percent.
pub fn category_breakdown(
    txs: &[Transaction],
    categories: &[Category],
    kind: TxKind,
) -> Vec<CategoryShare> {
    let names = category_names(categories);
    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    for tx in txs.iter().filter(|t| t.kind == kind) {
        *agg.entry(category_label(&names, tx.category))
            .or_insert(Decimal::ZERO) += tx.amount;
    }
    let total: Decimal = agg.values().copied().sum();

    let mut items: Vec<CategoryShare> = agg
        .into_iter()
        .map(|(category, amount)| {
            let share = if total.is_zero() {
                Decimal::ZERO
            } else {
                (amount / total) * Decimal::ONE_HUNDRED
            };
            CategoryShare {
                category,
                amount,
                share,
            }
        })
        .collect();
    // BTreeMap order already breaks ties by name; the sort is stable.
    items.sort_by(|a, b| b.amount.cmp(&a.amount));
    items
}

/// Expense categories that cost more this month than last month.
pub fn category_alerts(
    txs: &[Transaction],
    categories: &[Category],
    today: NaiveDate,
) -> Vec<CategoryAlert> {
    let names = category_names(categories);
    let this_month = month_start(today);
    let last_month = months_back(today, 1);

    let mut agg: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for tx in txs.iter().filter(|t| t.kind == TxKind::Expense) {
        let m = month_start(tx.date);
        if m != this_month && m != last_month {
            continue;
        }
        let entry = agg
            .entry(category_label(&names, tx.category))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        if m == this_month {
            entry.0 += tx.amount;
        } else {
            entry.1 += tx.amount;
        }
    }

    let mut alerts: Vec<CategoryAlert> = agg
        .into_iter()
        .map(|(category, (current, previous))| CategoryAlert {
            category,
            current,
            previous,
            change: percentage_change(current, previous),
        })
        .filter(|a| a.change > Decimal::ZERO)
        .collect();
    alerts.sort_by(|a, b| b.change.cmp(&a.change));
    alerts
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringBill {
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub last_date: NaiveDate,
}

/// Recurring expenses, one row per description and category carrying the
/// most recent charge. Largest first.
pub fn recurring_bills(txs: &[Transaction], categories: &[Category]) -> Vec<RecurringBill> {
    let names = category_names(categories);
    let mut latest: BTreeMap<(String, String), RecurringBill> = BTreeMap::new();
    for tx in txs.iter().filter(|t| t.recurring && t.kind == TxKind::Expense) {
        let category = category_label(&names, tx.category);
        let key = (tx.description.clone(), category.clone());
        if latest.get(&key).is_none_or(|seen| tx.date > seen.last_date) {
            latest.insert(
                key,
                RecurringBill {
                    description: tx.description.clone(),
                    category,
                    amount: tx.amount,
                    last_date: tx.date,
                },
            );
        }
    }
    let mut bills: Vec<RecurringBill> = latest.into_values().collect();
    bills.sort_by(|a, b| b.amount.cmp(&a.amount));
    bills
}

/// Look-back periods offered by the analysis view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Period {
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "3m")]
    Last3Months,
    #[serde(rename = "6m")]
    Last6Months,
    #[serde(rename = "1y")]
    LastYear,
}

impl Period {
    /// Inclusive bounds. `Last30Days` is thirty calendar days ending today;
    /// month-based periods cover whole calendar months, the current one
    /// included.
    pub fn range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Period::Last30Days => (today - Duration::days(29), today),
            Period::Last3Months => (months_back(today, 2), month_end(today)),
            Period::Last6Months => dashboard_window(today),
            Period::LastYear => (months_back(today, 11), month_end(today)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Last30Days => "Last 30 Days",
            Period::Last3Months => "Last 3 Months",
            Period::Last6Months => "Last 6 Months",
            Period::LastYear => "Last Year",
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "30d" => Ok(Period::Last30Days),
            "3m" => Ok(Period::Last3Months),
            "6m" => Ok(Period::Last6Months),
            "1y" | "12m" => Ok(Period::LastYear),
            other => Err(format!(
                "Invalid period '{}', expected 30d, 3m, 6m or 1y",
                other
            )),
        }
    }
}
