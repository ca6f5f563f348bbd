// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use fintrack::{cli, commands, config, store};

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Logs go to stderr so table/JSON output on stdout stays clean.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let config_path = config::config_path()?;
    let mut cfg = config::Config::load(&config_path)?.with_overrides(
        matches.get_one::<String>("url").map(String::as_str),
        matches.get_one::<String>("anon-key").map(String::as_str),
    );
    if let Some(ccy) = matches.get_one::<String>("currency") {
        cfg.currency = ccy.to_uppercase();
    }
    let backend = match &cfg.backend {
        config::Backend::Local => "local",
        config::Backend::Rest { .. } => "rest",
    };
    tracing::debug!(backend, currency = %cfg.currency, "loaded config");

    match matches.subcommand() {
        Some(("dashboard", sub)) => {
            let store = store::open(&cfg)?;
            commands::dashboard::handle(store.as_ref(), &cfg, sub)?
        }
        Some(("tx", sub)) => {
            let store = store::open(&cfg)?;
            commands::transactions::handle(store.as_ref(), &cfg, sub)?
        }
        Some(("category", sub)) => {
            let store = store::open(&cfg)?;
            commands::categories::handle(store.as_ref(), sub)?
        }
        Some(("analysis", sub)) => {
            let store = store::open(&cfg)?;
            commands::analysis::handle(store.as_ref(), &cfg, sub)?
        }
        Some(("settings", sub)) => commands::settings::handle(&cfg, &config_path, sub)?,
        Some(("auth", sub)) => commands::auth::handle(&cfg, sub)?,
        Some(("config", sub)) => commands::config::handle(&config_path, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
