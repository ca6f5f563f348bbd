// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use fintrack::aggregate::{self, Period, UNCATEGORIZED, WINDOW_MONTHS};
use fintrack::models::{Category, Transaction, TxKind};
use rust_decimal::Decimal;
use uuid::Uuid;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tx(amount: &str, kind: TxKind, on: &str) -> Transaction {
    tx_in(amount, kind, on, None)
}

fn tx_in(amount: &str, kind: TxKind, on: &str, category: Option<Uuid>) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        amount: d(amount),
        kind,
        category,
        description: String::new(),
        date: date(on),
        recurring: false,
        created_at: Utc::now(),
    }
}

fn cat(name: &str, kind: TxKind) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        kind,
    }
}

#[test]
fn totals_cover_every_amount_regardless_of_order() {
    let mut txs = vec![
        tx("12.34", TxKind::Income, "2025-01-03"),
        tx("0.66", TxKind::Expense, "2025-01-04"),
        tx("100", TxKind::Expense, "2024-12-31"),
        tx("7.5", TxKind::Income, "2025-02-01"),
    ];
    let all: Decimal = txs.iter().map(|t| t.amount).sum();

    let t = aggregate::totals(&txs);
    assert_eq!(t.income, d("19.84"));
    assert_eq!(t.expenses, d("100.66"));
    assert_eq!(t.income + t.expenses, all);

    txs.reverse();
    assert_eq!(aggregate::totals(&txs), t);
}

#[test]
fn empty_input_still_yields_six_zero_buckets_in_order() {
    let buckets = aggregate::monthly_buckets(&[], date("2025-03-15"));
    assert_eq!(buckets.len(), WINDOW_MONTHS);
    let months: Vec<&str> = buckets.iter().map(|b| b.month.as_str()).collect();
    assert_eq!(
        months,
        ["Oct 2024", "Nov 2024", "Dec 2024", "Jan 2025", "Feb 2025", "Mar 2025"]
    );
    assert!(
        buckets
            .iter()
            .all(|b| b.income.is_zero() && b.expenses.is_zero())
    );
}

#[test]
fn window_crosses_year_boundary() {
    let months = aggregate::window_months(date("2025-01-31"));
    assert_eq!(months[0], date("2024-08-01"));
    assert_eq!(months[5], date("2025-01-01"));
    assert!(months.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn dashboard_window_spans_whole_months() {
    assert_eq!(
        aggregate::dashboard_window(date("2025-02-10")),
        (date("2024-09-01"), date("2025-02-28"))
    );
    assert_eq!(
        aggregate::dashboard_window(date("2024-02-05")),
        (date("2023-09-01"), date("2024-02-29"))
    );
}

#[test]
fn percentage_change_policy() {
    for cur in ["0", "5", "-3", "1000000"] {
        assert_eq!(aggregate::percentage_change(d(cur), Decimal::ZERO), Decimal::ZERO);
    }
    assert_eq!(aggregate::percentage_change(d("110"), d("100")), d("10"));
    assert_eq!(aggregate::percentage_change(d("90"), d("100")), d("-10"));
    assert_eq!(aggregate::percentage_change(d("100"), d("100")), Decimal::ZERO);
}

#[test]
fn january_february_example() {
    let txs = vec![
        tx("100", TxKind::Income, "2025-01-05"),
        tx("40", TxKind::Expense, "2025-01-20"),
        tx("50", TxKind::Income, "2025-02-02"),
    ];
    let today = date("2025-02-10");

    let t = aggregate::totals(&txs);
    assert_eq!(t.income, d("150"));
    assert_eq!(t.expenses, d("40"));

    let buckets = aggregate::monthly_buckets(&txs, today);
    assert_eq!(buckets.len(), 6);
    let jan = &buckets[4];
    let feb = &buckets[5];
    assert_eq!(jan.month, "Jan 2025");
    assert_eq!((jan.income, jan.expenses), (d("100"), d("40")));
    assert_eq!(feb.month, "Feb 2025");
    assert_eq!((feb.income, feb.expenses), (d("50"), Decimal::ZERO));
    assert!(buckets[..4].iter().all(|b| b.income.is_zero() && b.expenses.is_zero()));
}

#[test]
fn transactions_outside_window_count_in_totals_only() {
    let txs = vec![
        tx("25", TxKind::Expense, "2024-01-15"),
        tx("10", TxKind::Income, "2025-02-01"),
    ];
    let buckets = aggregate::monthly_buckets(&txs, date("2025-02-10"));
    assert_eq!(buckets.len(), 6);
    let bucketed: Decimal = buckets.iter().map(|b| b.income + b.expenses).sum();
    assert_eq!(bucketed, d("10"));
    assert_eq!(aggregate::totals(&txs).expenses, d("25"));
}

#[test]
fn summary_compares_last_two_months() {
    let txs = vec![
        tx("100", TxKind::Income, "2025-01-05"),
        tx("40", TxKind::Expense, "2025-01-20"),
        tx("150", TxKind::Income, "2025-02-02"),
    ];
    let s = aggregate::summarize(&txs, date("2025-02-10"));
    assert_eq!(s.total_income, d("250"));
    assert_eq!(s.total_expenses, d("40"));
    assert_eq!(s.net_savings, d("210"));
    assert_eq!(s.income_change, d("50"));
    assert_eq!(s.expenses_change, d("-100"));
    // savings: Jan 60 -> Feb 150
    assert_eq!(s.savings_change, d("150"));
    assert_eq!(s.months.len(), 6);
}

#[test]
fn summary_of_quiet_previous_month_reports_zero_change() {
    let txs = vec![tx("80", TxKind::Income, "2025-02-02")];
    let s = aggregate::summarize(&txs, date("2025-02-10"));
    assert_eq!(s.income_change, Decimal::ZERO);
    assert_eq!(s.savings_change, Decimal::ZERO);
}

#[test]
fn breakdown_sorts_by_amount_and_groups_unknown_categories() {
    let housing = cat("Housing", TxKind::Expense);
    let food = cat("Food", TxKind::Expense);
    let salary = cat("Salary", TxKind::Income);
    let cats = vec![housing.clone(), food.clone(), salary.clone()];
    let txs = vec![
        tx_in("60", TxKind::Expense, "2025-02-01", Some(housing.id)),
        tx_in("40", TxKind::Expense, "2025-02-03", Some(housing.id)),
        tx_in("50", TxKind::Expense, "2025-02-04", Some(food.id)),
        tx_in("50", TxKind::Expense, "2025-02-05", Some(Uuid::new_v4())),
        tx_in("999", TxKind::Income, "2025-02-05", Some(salary.id)),
    ];
    let b = aggregate::category_breakdown(&txs, &cats, TxKind::Expense);
    let names: Vec<&str> = b.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(names, ["Housing", UNCATEGORIZED, "Food"]);
    assert_eq!(b[0].amount, d("100"));
    assert_eq!(b[0].share, d("50"));
    assert_eq!(b[1].share, d("25"));
    assert_eq!(b[2].share, d("25"));
}

#[test]
fn breakdown_shares_sum_to_hundred() {
    let cats = vec![
        cat("A", TxKind::Expense),
        cat("B", TxKind::Expense),
        cat("C", TxKind::Expense),
    ];
    let txs: Vec<Transaction> = cats
        .iter()
        .map(|c| tx_in("1", TxKind::Expense, "2025-02-01", Some(c.id)))
        .collect();
    let b = aggregate::category_breakdown(&txs, &cats, TxKind::Expense);
    let sum: Decimal = b.iter().map(|s| s.share).sum();
    assert!((sum - d("100")).abs() < d("0.0001"), "sum was {}", sum);

    assert!(aggregate::category_breakdown(&[], &cats, TxKind::Expense).is_empty());
}

#[test]
fn alerts_flag_categories_that_grew_since_last_month() {
    let food = cat("Food", TxKind::Expense);
    let housing = cat("Housing", TxKind::Expense);
    let travel = cat("Transportation", TxKind::Expense);
    let cats = vec![food.clone(), housing.clone(), travel.clone()];
    let txs = vec![
        tx_in("100", TxKind::Expense, "2025-02-10", Some(food.id)),
        tx_in("150", TxKind::Expense, "2025-03-02", Some(food.id)),
        tx_in("500", TxKind::Expense, "2025-01-02", Some(food.id)),
        tx_in("900", TxKind::Expense, "2025-02-01", Some(housing.id)),
        tx_in("900", TxKind::Expense, "2025-03-01", Some(housing.id)),
        tx_in("20", TxKind::Expense, "2025-03-05", Some(travel.id)),
    ];
    let alerts = aggregate::category_alerts(&txs, &cats, date("2025-03-10"));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].category, "Food");
    assert_eq!(alerts[0].current, d("150"));
    assert_eq!(alerts[0].previous, d("100"));
    assert_eq!(alerts[0].change, d("50"));
}

#[test]
fn analysis_periods() {
    let today = date("2025-03-10");
    assert_eq!(
        "30d".parse::<Period>().unwrap().range(today),
        (date("2025-02-09"), today)
    );
    let (from, to) = Period::Last30Days.range(today);
    assert_eq!((to - from).num_days() + 1, 30);
    assert_eq!(
        "3m".parse::<Period>().unwrap().range(today),
        (date("2025-01-01"), date("2025-03-31"))
    );
    assert_eq!(
        Period::Last6Months.range(today),
        aggregate::dashboard_window(today)
    );
    assert_eq!(
        "1y".parse::<Period>().unwrap().range(today),
        (date("2024-04-01"), date("2025-03-31"))
    );
    assert!("2w".parse::<Period>().is_err());
}

#[test]
fn recurring_bills_keep_latest_charge_per_bill() {
    let housing = cat("Housing", TxKind::Expense);
    let cats = vec![housing.clone()];
    let recurring = |amount: &str, kind: TxKind, on: &str, desc: &str| {
        let mut t = tx_in(amount, kind, on, Some(housing.id));
        t.description = desc.to_string();
        t.recurring = true;
        t
    };
    let txs = vec![
        recurring("1200", TxKind::Expense, "2025-01-01", "Rent"),
        recurring("1250", TxKind::Expense, "2025-02-01", "Rent"),
        recurring("15", TxKind::Expense, "2025-02-03", "Streaming"),
        recurring("3000", TxKind::Income, "2025-02-01", "Paycheck"),
        tx_in("80", TxKind::Expense, "2025-02-04", Some(housing.id)),
    ];
    let bills = aggregate::recurring_bills(&txs, &cats);
    assert_eq!(bills.len(), 2);
    assert_eq!(bills[0].description, "Rent");
    assert_eq!(bills[0].amount, d("1250"));
    assert_eq!(bills[0].last_date, date("2025-02-01"));
    assert_eq!(bills[0].category, "Housing");
    assert_eq!(bills[1].description, "Streaming");
}
