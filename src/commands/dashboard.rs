// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, error};

use crate::aggregate::{self, DashboardSummary};
use crate::config::Config;
use crate::models::Transaction;
use crate::store::{RemoteStore, TxQuery};
use crate::utils::{fmt_change, fmt_money, maybe_print_json, pretty_table};

pub fn handle(store: &dyn RemoteStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let summary = load(store, today);
    if !maybe_print_json(sub.get_flag("json"), false, &summary)? {
        render(&summary, cfg.currency_symbol());
    }
    Ok(())
}

/// Transactions in the dashboard window. A failed fetch is logged and
/// yields nothing.
pub fn fetch_window(store: &dyn RemoteStore, today: NaiveDate) -> Vec<Transaction> {
    let (start, end) = aggregate::dashboard_window(today);
    match store.select_transactions(&TxQuery::window(start, end)) {
        Ok(rows) => {
            debug!(rows = rows.len(), %start, %end, "fetched dashboard window");
            rows
        }
        Err(e) => {
            error!(error = %e, "Error fetching transactions");
            Vec::new()
        }
    }
}

pub fn load(store: &dyn RemoteStore, today: NaiveDate) -> DashboardSummary {
    aggregate::summarize(&fetch_window(store, today), today)
}

fn render(s: &DashboardSummary, symbol: &str) {
    let cards = vec![
        vec![
            "Total Income".to_string(),
            fmt_money(&s.total_income, symbol),
            fmt_change(&s.income_change),
        ],
        vec![
            "Total Expenses".to_string(),
            fmt_money(&s.total_expenses, symbol),
            fmt_change(&s.expenses_change),
        ],
        vec![
            "Net Savings".to_string(),
            fmt_money(&s.net_savings, symbol),
            fmt_change(&s.savings_change),
        ],
    ];
    println!("{}", pretty_table(&["Financial Dashboard", "Amount", "Change"], cards));

    let months = s
        .months
        .iter()
        .map(|b| {
            vec![
                b.month.clone(),
                fmt_money(&b.income, symbol),
                fmt_money(&b.expenses, symbol),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Expenses"], months));
}
