// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use std::path::Path;

use crate::config::{Backend, Config};
use crate::utils::{CURRENCIES, currency_symbol, pretty_table};

/// Edits always start from the file on disk, never from the
/// override-applied config.
pub fn handle(config_path: &Path, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let cfg = Config::load(config_path)?;
            let backend = match &cfg.backend {
                Backend::Local => "local".to_string(),
                Backend::Rest { url, anon_key } => {
                    format!("rest {} (key {})", url, mask(anon_key))
                }
            };
            let rows = vec![
                vec!["Config file".to_string(), config_path.display().to_string()],
                vec!["Backend".to_string(), backend],
                vec!["Currency".to_string(), cfg.currency.clone()],
                vec![
                    "Email notifications".to_string(),
                    cfg.email_notifications.to_string(),
                ],
            ];
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        Some(("set-backend", sub)) => {
            let mut cfg = Config::load(config_path)?;
            cfg.backend = match sub.get_one::<String>("kind").map(String::as_str) {
                Some("rest") => {
                    let (Some(url), Some(anon_key)) = (
                        sub.get_one::<String>("url"),
                        sub.get_one::<String>("anon-key"),
                    ) else {
                        bail!("The rest backend needs --url and --anon-key");
                    };
                    Backend::Rest {
                        url: url.trim_end_matches('/').to_string(),
                        anon_key: anon_key.clone(),
                    }
                }
                _ => Backend::Local,
            };
            cfg.save(config_path)?;
            println!("Backend saved to {}", config_path.display());
        }
        Some(("set-currency", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().to_uppercase();
            if currency_symbol(&code).is_none() {
                let known: Vec<&str> = CURRENCIES.iter().map(|(c, _)| *c).collect();
                bail!("Unknown currency '{}'; expected one of {}", code, known.join(", "));
            }
            let mut cfg = Config::load(config_path)?;
            cfg.currency = code;
            cfg.save(config_path)?;
            println!("Display currency set to {}", cfg.currency);
        }
        _ => {}
    }
    Ok(())
}

fn mask(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{}", tail)
}
