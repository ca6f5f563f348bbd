// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use uuid::Uuid;

const UA: &str = concat!(
    "fintrack/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/fintrack)"
);

/// Display currencies. Amounts are never converted between them.
pub const CURRENCIES: [(&str, &str); 6] = [
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("CNY", "¥"),
    ("INR", "₹"),
];

pub fn http_client() -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s.trim()).with_context(|| format!("Invalid id '{}', expected a UUID", s))
}

pub fn currency_symbol(code: &str) -> Option<&'static str> {
    CURRENCIES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, s)| *s)
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    let v = d.round_dp(2);
    if v < Decimal::ZERO {
        format!("-{}{:.2}", symbol, v.abs())
    } else {
        format!("{}{:.2}", symbol, v)
    }
}

/// "+10.0% from last month"
pub fn fmt_change(pct: &Decimal) -> String {
    let v = pct.round_dp(1);
    let sign = if v >= Decimal::ZERO { "+" } else { "" };
    format!("{}{:.1}% from last month", sign, v)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn month_start(d: NaiveDate) -> NaiveDate {
    d - Duration::days(i64::from(d.day0()))
}

/// First day of the month `back` months before the month containing `d`.
pub fn months_back(d: NaiveDate, back: u32) -> NaiveDate {
    let first = month_start(d);
    let idx = first.year() * 12 + first.month0() as i32 - back as i32;
    NaiveDate::from_ymd_opt(idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1, 1).unwrap_or(first)
}

pub fn month_end(d: NaiveDate) -> NaiveDate {
    let first = month_start(d);
    let idx = first.year() * 12 + first.month0() as i32 + 1;
    NaiveDate::from_ymd_opt(idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
