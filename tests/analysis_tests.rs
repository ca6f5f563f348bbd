// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::aggregate::Period;
use fintrack::commands::transactions::{self, AddInput};
use fintrack::commands::{analysis, dashboard};
use fintrack::models::TxKind;
use fintrack::store::local::LocalStore;
use rust_decimal::Decimal;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn record(store: &LocalStore, amount: &str, kind: TxKind, category: &str, on: &str) {
    let n = transactions::add(
        store,
        &AddInput {
            amount: d(amount),
            kind,
            category: category.to_string(),
            description: String::new(),
            date: date(on),
            recurring: false,
        },
        "$",
    );
    assert!(!n.is_error(), "{}", n.text());
}

fn setup() -> LocalStore {
    let store = LocalStore::in_memory().unwrap();
    record(&store, "3000", TxKind::Income, "Salary", "2025-02-01");
    record(&store, "1000", TxKind::Expense, "Housing", "2025-02-01");
    record(&store, "200", TxKind::Expense, "Food", "2025-02-14");
    record(&store, "3000", TxKind::Income, "Salary", "2025-03-01");
    record(&store, "1000", TxKind::Expense, "Housing", "2025-03-01");
    record(&store, "300", TxKind::Expense, "Food", "2025-03-05");
    record(&store, "50", TxKind::Expense, "Entertainment", "2024-06-01");
    store
}

#[test]
fn thirty_day_report_covers_only_the_period() {
    let store = setup();
    let r = analysis::build(&store, Period::Last30Days, date("2025-03-10"));
    assert_eq!((r.from, r.to), (date("2025-02-09"), date("2025-03-10")));
    assert_eq!(r.totals.income, d("3000"));
    assert_eq!(r.totals.expenses, d("1500"));

    let names: Vec<&str> = r.breakdown.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(names, ["Housing", "Food"]);
    let share_sum: Decimal = r.breakdown.iter().map(|s| s.share).sum();
    assert!((share_sum - d("100")).abs() < d("0.0001"));
}

#[test]
fn alerts_see_all_of_last_month_even_for_short_periods() {
    let store = setup();
    let r = analysis::build(&store, Period::Last30Days, date("2025-03-10"));
    assert_eq!(r.alerts.len(), 1);
    assert_eq!(r.alerts[0].category, "Food");
    assert_eq!(r.alerts[0].previous, d("200"));
    assert_eq!(r.alerts[0].current, d("300"));
    assert_eq!(r.alerts[0].change, d("50"));
}

#[test]
fn yearly_report_includes_older_expenses() {
    let store = setup();
    let r = analysis::build(&store, Period::LastYear, date("2025-03-10"));
    assert_eq!(r.totals.expenses, d("2550"));
    assert_eq!(r.breakdown.last().unwrap().category, "Entertainment");
}

#[test]
fn dashboard_reads_six_month_window() {
    let store = setup();
    let s = dashboard::load(&store, date("2025-03-10"));
    assert_eq!(s.months.len(), 6);
    assert_eq!(s.months[5].month, "Mar 2025");
    assert_eq!(s.total_income, d("6000"));
    // the June 2024 row is outside the window and never fetched
    assert_eq!(s.total_expenses, d("2500"));
    assert_eq!(s.income_change, Decimal::ZERO);
    // expenses: 1200 -> 1300
    assert_eq!(s.expenses_change.round_dp(4), d("8.3333"));
}

#[test]
fn empty_store_renders_zeroes() {
    let store = LocalStore::in_memory().unwrap();
    let s = dashboard::load(&store, date("2025-03-10"));
    assert_eq!(s.months.len(), 6);
    assert!(s.total_income.is_zero() && s.total_expenses.is_zero());
    assert!(s.savings_change.is_zero());
}

#[test]
fn report_lists_recurring_expenses_in_period() {
    let store = setup();
    let n = transactions::add(
        &store,
        &AddInput {
            amount: d("12.99"),
            kind: TxKind::Expense,
            category: "Entertainment".to_string(),
            description: "Streaming".to_string(),
            date: date("2025-03-03"),
            recurring: true,
        },
        "$",
    );
    assert!(!n.is_error(), "{}", n.text());

    let r = analysis::build(&store, Period::Last30Days, date("2025-03-10"));
    assert_eq!(r.recurring.len(), 1);
    assert_eq!(r.recurring[0].description, "Streaming");
    assert_eq!(r.recurring[0].category, "Entertainment");
    assert_eq!(r.recurring[0].amount, d("12.99"));
}
