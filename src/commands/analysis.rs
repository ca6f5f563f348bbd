// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::error;

use super::categories;
use crate::aggregate::{self, CategoryAlert, CategoryShare, Period, RecurringBill, Totals};
use crate::config::Config;
use crate::models::TxKind;
use crate::store::{RemoteStore, TxQuery};
use crate::utils::{fmt_money, maybe_print_json, months_back, pretty_table};

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub period: Period,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub totals: Totals,
    pub breakdown: Vec<CategoryShare>,
    pub alerts: Vec<CategoryAlert>,
    pub recurring: Vec<RecurringBill>,
}

pub fn handle(store: &dyn RemoteStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let period: Period = sub
        .get_one::<String>("period")
        .map(|s| s.as_str())
        .unwrap_or("30d")
        .parse()
        .map_err(anyhow::Error::msg)?;
    let today = chrono::Local::now().date_naive();
    let report = build(store, period, today);
    if !maybe_print_json(sub.get_flag("json"), false, &report)? {
        render(&report, cfg.currency_symbol());
    }
    Ok(())
}

/// Expense breakdown for `period` plus month-over-month category alerts.
///
/// Alerts need last month in full, so the fetch starts at whichever is
/// earlier: the period start or the first of last month.
pub fn build(store: &dyn RemoteStore, period: Period, today: NaiveDate) -> AnalysisReport {
    let (from, to) = period.range(today);
    let fetch_from = from.min(months_back(today, 1));
    let rows = match store.select_transactions(&TxQuery::window(fetch_from, to)) {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Error fetching transactions");
            Vec::new()
        }
    };
    let cats = categories::fetch(store);

    let in_period: Vec<_> = rows
        .iter()
        .filter(|t| t.date >= from && t.date <= to)
        .cloned()
        .collect();

    AnalysisReport {
        period,
        from,
        to,
        totals: aggregate::totals(&in_period),
        breakdown: aggregate::category_breakdown(&in_period, &cats, TxKind::Expense),
        alerts: aggregate::category_alerts(&rows, &cats, today),
        recurring: aggregate::recurring_bills(&in_period, &cats),
    }
}

fn render(r: &AnalysisReport, symbol: &str) {
    println!(
        "Financial Analysis: {} ({} to {})",
        r.period.label(),
        r.from,
        r.to
    );
    let rows = r
        .breakdown
        .iter()
        .map(|s| {
            vec![
                s.category.clone(),
                fmt_money(&s.amount, symbol),
                format!("{:.1}%", s.share.round_dp(1)),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Expense Breakdown", "Spent", "Share"], rows));

    let saved = r.totals.net();
    if saved >= rust_decimal::Decimal::ZERO {
        println!(
            "Income {} vs expenses {}: saved {}",
            fmt_money(&r.totals.income, symbol),
            fmt_money(&r.totals.expenses, symbol),
            fmt_money(&saved, symbol)
        );
    } else {
        println!(
            "Income {} vs expenses {}: overspent by {}",
            fmt_money(&r.totals.income, symbol),
            fmt_money(&r.totals.expenses, symbol),
            fmt_money(&saved.abs(), symbol)
        );
    }

    if !r.recurring.is_empty() {
        let rows = r
            .recurring
            .iter()
            .map(|b| {
                vec![
                    b.description.clone(),
                    b.category.clone(),
                    fmt_money(&b.amount, symbol),
                    b.last_date.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Recurring", "Category", "Amount", "Last charged"], rows)
        );
    }

    for a in &r.alerts {
        println!(
            "Budget alert: {} expenses are {:.0}% higher than last month ({} vs {})",
            a.category,
            a.change.round_dp(0),
            fmt_money(&a.current, symbol),
            fmt_money(&a.previous, symbol)
        );
    }
}
