// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::error;
use uuid::Uuid;

use crate::models::{Category, TxKind};
use crate::store::RemoteStore;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(store: &dyn RemoteStore, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let kind = sub
            .get_one::<String>("type")
            .map(|s| s.parse::<TxKind>())
            .transpose()
            .map_err(anyhow::Error::msg)?;
        let cats: Vec<Category> = fetch(store)
            .into_iter()
            .filter(|c| kind.is_none_or(|k| c.kind == k))
            .collect();
        if !maybe_print_json(sub.get_flag("json"), false, &cats)? {
            let rows = cats
                .iter()
                .map(|c| vec![c.name.clone(), c.kind.to_string(), c.id.to_string()])
                .collect();
            println!("{}", pretty_table(&["Category", "Type", "Id"], rows));
        }
    }
    Ok(())
}

/// Category reference data. A failed fetch is logged and yields nothing.
pub fn fetch(store: &dyn RemoteStore) -> Vec<Category> {
    store.select_categories().unwrap_or_else(|e| {
        error!(error = %e, "Error fetching categories");
        Vec::new()
    })
}

/// Find the category of `kind` named or identified by `needle`. Names match
/// case-insensitively.
pub fn resolve(categories: &[Category], needle: &str, kind: TxKind) -> Result<Uuid, String> {
    let needle = needle.trim();
    let by_id = Uuid::parse_str(needle).ok();
    let found = categories.iter().find(|c| {
        by_id.is_some_and(|id| id == c.id) || c.name.eq_ignore_ascii_case(needle)
    });
    match found {
        Some(c) if c.kind == kind => Ok(c.id),
        Some(c) => {
            // A same-named category may exist for both kinds.
            categories
                .iter()
                .find(|o| o.kind == kind && o.name.eq_ignore_ascii_case(&c.name))
                .map(|o| o.id)
                .ok_or_else(|| {
                    format!(
                        "Category '{}' is an {} category, not {}",
                        c.name, c.kind, kind
                    )
                })
        }
        None => Err(format!("Category '{}' not found", needle)),
    }
}
