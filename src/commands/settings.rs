// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use std::path::Path;
use tracing::error;

use super::Notice;
use crate::config::Config;
use crate::models::{UserData, UserUpdate};
use crate::store::{self, RemoteStore};
use crate::utils::pretty_table;

pub fn handle(cfg: &Config, config_path: &Path, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(store::open(cfg)?.as_ref(), cfg),
        Some(("profile", sub)) => {
            let name = sub.get_one::<String>("name").map(String::as_str);
            let email = sub.get_one::<String>("email").map(String::as_str);
            update_profile(store::open(cfg)?.as_ref(), name, email).print();
        }
        Some(("password", sub)) => {
            let new = sub.get_one::<String>("new").unwrap();
            let confirm = sub.get_one::<String>("confirm").unwrap();
            change_password(store::open(cfg)?.as_ref(), new, confirm).print();
        }
        Some(("notifications", sub)) => {
            let on = sub.get_one::<String>("state").is_some_and(|s| s == "on");
            set_notifications(config_path, on).print();
        }
        _ => {}
    }
    Ok(())
}

fn show(store: &dyn RemoteStore, cfg: &Config) {
    let user = store.current_user().unwrap_or_else(|e| {
        error!(error = %e, "Error fetching user");
        None
    });
    let mut rows = vec![];
    match user {
        Some(u) => {
            rows.push(vec!["User id".to_string(), u.id.to_string()]);
            rows.push(vec!["Name".to_string(), u.full_name.unwrap_or_default()]);
            rows.push(vec!["Email".to_string(), u.email.unwrap_or_default()]);
        }
        None => rows.push(vec!["User".to_string(), "(not signed in)".to_string()]),
    }
    rows.push(vec!["Currency".to_string(), cfg.currency.clone()]);
    let notif = if cfg.email_notifications { "on" } else { "off" };
    rows.push(vec!["Email notifications".to_string(), notif.to_string()]);
    println!("{}", pretty_table(&["Setting", "Value"], rows));
}

/// Update display name and/or email for the signed-in user.
pub fn update_profile(store: &dyn RemoteStore, name: Option<&str>, email: Option<&str>) -> Notice {
    let result = (|| -> Result<String> {
        if name.is_none() && email.is_none() {
            return Err(anyhow!("Nothing to update; pass --name and/or --email"));
        }
        store.current_user()?.ok_or_else(|| anyhow!("No user found"))?;
        let update = UserUpdate {
            email: email.filter(|e| !e.is_empty()).map(str::to_string),
            password: None,
            data: Some(UserData {
                full_name: name.filter(|n| !n.is_empty()).map(str::to_string),
            }),
        };
        store.update_user(&update)?;
        Ok("Profile updated successfully!".to_string())
    })();
    if let Err(e) = &result {
        error!(error = %e, "Error updating profile");
    }
    result.into()
}

/// A mismatched confirmation is rejected before anything is sent.
pub fn change_password(store: &dyn RemoteStore, new: &str, confirm: &str) -> Notice {
    if new != confirm {
        return Notice::Error("New passwords don't match".to_string());
    }
    if new.is_empty() {
        return Notice::Error("New password must not be empty".to_string());
    }
    let update = UserUpdate {
        password: Some(new.to_string()),
        ..Default::default()
    };
    match store.update_user(&update) {
        Ok(_) => Notice::Success("Password updated successfully!".to_string()),
        Err(e) => {
            error!(error = %e, "Error changing password");
            Notice::Error(e.to_string())
        }
    }
}

/// Re-reads the file so command-line overrides are not persisted.
pub fn set_notifications(config_path: &Path, on: bool) -> Notice {
    let state = if on { "enabled" } else { "disabled" };
    Config::load(config_path)
        .and_then(|mut c| {
            c.email_notifications = on;
            c.save(config_path)
        })
        .map(|_| format!("Email notifications {}", state))
        .into()
}
