// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::error;
use uuid::Uuid;

use super::Notice;
use super::categories;
use crate::aggregate::UNCATEGORIZED;
use crate::config::Config;
use crate::models::{NewTransaction, Transaction, TransactionPatch, TxKind, validate_amount};
use crate::store::{RemoteStore, TxQuery};
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_id, pretty_table,
};

pub fn handle(store: &dyn RemoteStore, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    match m.subcommand() {
        Some(("list", sub)) => list(store, cfg, sub)?,
        Some(("add", sub)) => {
            let input = AddInput::from_matches(sub, today)?;
            add(store, &input, cfg.currency_symbol()).print();
        }
        Some(("edit", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            let input = EditInput::from_matches(sub)?;
            edit(store, id, &input).print();
        }
        Some(("rm", sub)) => {
            let id = parse_id(sub.get_one::<String>("id").unwrap())?;
            remove(store, id);
        }
        _ => {}
    }
    Ok(())
}

fn list(store: &dyn RemoteStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, cfg.currency_symbol(), sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.id.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Category", "Amount", "Id"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct LedgerRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub amount: String,
    pub recurring: bool,
}

impl LedgerRow {
    fn new(tx: &Transaction, names: &HashMap<Uuid, String>, symbol: &str) -> Self {
        let amount = match tx.kind {
            TxKind::Income => format!("+{}", fmt_money(&tx.signed_amount(), symbol)),
            TxKind::Expense => fmt_money(&tx.signed_amount(), symbol),
        };
        Self {
            id: tx.id,
            date: tx.date,
            description: tx.description.clone(),
            category: tx
                .category
                .and_then(|c| names.get(&c).cloned())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            kind: tx.kind,
            amount,
            recurring: tx.recurring,
        }
    }
}

/// Whole ledger, newest first, optionally filtered by type and truncated.
pub fn query_rows(
    store: &dyn RemoteStore,
    symbol: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<LedgerRow>> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TxKind>())
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let limit = sub.get_one::<usize>("limit").copied();

    // A type filter runs client-side, so the limit has to as well.
    let query = TxQuery::ledger().with_limit(if kind.is_some() { None } else { limit });
    let txs = match store.select_transactions(&query) {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Error fetching transactions");
            Vec::new()
        }
    };
    let names: HashMap<Uuid, String> = categories::fetch(store)
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    Ok(txs
        .iter()
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .take(limit.unwrap_or(usize::MAX))
        .map(|t| LedgerRow::new(t, &names, symbol))
        .collect())
}

/// Parsed `tx add` arguments. The category is still a name or id here.
#[derive(Debug, Clone)]
pub struct AddInput {
    pub amount: rust_decimal::Decimal,
    pub kind: TxKind,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub recurring: bool,
}

impl AddInput {
    pub fn from_matches(sub: &clap::ArgMatches, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
            kind: sub
                .get_one::<String>("type")
                .unwrap()
                .parse()
                .map_err(anyhow::Error::msg)?,
            category: sub.get_one::<String>("category").unwrap().to_string(),
            description: sub
                .get_one::<String>("description")
                .cloned()
                .unwrap_or_default(),
            date: match sub.get_one::<String>("date") {
                Some(d) => parse_date(d)?,
                None => today,
            },
            recurring: sub.get_flag("recurring"),
        })
    }
}

/// Validate and insert. Every failure comes back as an error notice, and a
/// bad amount is rejected before the store is touched.
pub fn add(store: &dyn RemoteStore, input: &AddInput, symbol: &str) -> Notice {
    let result = (|| -> Result<String> {
        validate_amount(input.amount).map_err(anyhow::Error::msg)?;
        let user = store.current_user()?.ok_or_else(|| anyhow!("Not signed in"))?;
        let cats = store.select_categories()?;
        let category_id = categories::resolve(&cats, &input.category, input.kind)
            .map_err(anyhow::Error::msg)?;
        let row = NewTransaction {
            user_id: user.id,
            amount: input.amount,
            kind: input.kind,
            category_id: Some(category_id),
            description: input.description.clone(),
            date: input.date,
            recurring: input.recurring,
        };
        store.insert_transaction(&row)?;
        Ok(format!(
            "Recorded {} of {} on {}",
            input.kind,
            fmt_money(&input.amount, symbol),
            input.date
        ))
    })();
    if let Err(e) = &result {
        error!(error = %e, "Error adding transaction");
    }
    result.into()
}

#[derive(Debug, Clone, Default)]
pub struct EditInput {
    pub amount: Option<rust_decimal::Decimal>,
    pub kind: Option<TxKind>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub recurring: Option<bool>,
}

impl EditInput {
    pub fn from_matches(sub: &clap::ArgMatches) -> Result<Self> {
        Ok(Self {
            amount: sub
                .get_one::<String>("amount")
                .map(|s| parse_decimal(s))
                .transpose()?,
            kind: sub
                .get_one::<String>("type")
                .map(|s| s.parse::<TxKind>())
                .transpose()
                .map_err(anyhow::Error::msg)?,
            category: sub.get_one::<String>("category").cloned(),
            description: sub.get_one::<String>("description").cloned(),
            date: sub
                .get_one::<String>("date")
                .map(|s| parse_date(s))
                .transpose()?,
            recurring: sub.get_one::<bool>("recurring").copied(),
        })
    }
}

/// Patch an existing transaction. A new category is checked against the
/// transaction's effective type.
pub fn edit(store: &dyn RemoteStore, id: Uuid, input: &EditInput) -> Notice {
    let result = (|| -> Result<String> {
        if let Some(amount) = input.amount {
            validate_amount(amount).map_err(anyhow::Error::msg)?;
        }
        let existing = store
            .select_transactions(&TxQuery::ledger())?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| anyhow!("Transaction {} not found", id))?;
        let kind = input.kind.unwrap_or(existing.kind);
        let category_id = match &input.category {
            Some(needle) => Some(
                categories::resolve(&store.select_categories()?, needle, kind)
                    .map_err(anyhow::Error::msg)?,
            ),
            None if input.kind.is_some_and(|k| k != existing.kind) => {
                return Err(anyhow!(
                    "Changing the type to {} also needs a matching --category",
                    kind
                ));
            }
            None => None,
        };
        let patch = TransactionPatch {
            amount: input.amount,
            kind: input.kind,
            category_id,
            description: input.description.clone(),
            date: input.date,
            recurring: input.recurring,
        };
        if patch.is_empty() {
            return Err(anyhow!("Nothing to change"));
        }
        store.update_transaction(id, &patch)?;
        Ok(format!("Updated transaction {}", id))
    })();
    if let Err(e) = &result {
        error!(error = %e, "Error updating transaction");
    }
    result.into()
}

/// Delete, then re-fetch. Returns the refreshed ledger, or `None` when the
/// delete failed and nothing was re-fetched.
pub fn remove(store: &dyn RemoteStore, id: Uuid) -> Option<Vec<Transaction>> {
    if let Err(e) = store.delete_transaction(id) {
        error!(error = %e, %id, "Error deleting transaction");
        return None;
    }
    match store.select_transactions(&TxQuery::ledger()) {
        Ok(rows) => {
            println!("Deleted {}; {} transactions remain", id, rows.len());
            Some(rows)
        }
        Err(e) => {
            error!(error = %e, "Error fetching transactions");
            None
        }
    }
}
