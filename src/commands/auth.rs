// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::Notice;
use crate::config::{Backend, Config, session_path};
use crate::store::RemoteStore;
use crate::store::rest::{RestStore, SignUp};

pub fn handle(cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let Backend::Rest { url, anon_key } = &cfg.backend else {
        Notice::Error(format!(
            "The local backend has no sign-in; run `{}` first",
            "fintrack config set-backend rest --url <URL> --anon-key <KEY>"
        ))
        .print();
        return Ok(());
    };
    let store = RestStore::with_session_file(url, anon_key, session_path()?)?;

    let notice: Notice = match m.subcommand() {
        Some(("login", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            store
                .sign_in(email, password)
                .map(|s| format!("Signed in as {}", s.user.email.unwrap_or_else(|| email.clone())))
                .into()
        }
        Some(("signup", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            let name = sub.get_one::<String>("name").map(String::as_str);
            store
                .sign_up(email, password, name)
                .map(|outcome| match outcome {
                    SignUp::SignedIn(_) => format!("Account created; signed in as {}", email),
                    SignUp::ConfirmationRequired(_) => {
                        format!("Account created; check {} for a confirmation link", email)
                    }
                })
                .into()
        }
        Some(("logout", _)) => store.sign_out().map(|_| "Signed out".to_string()).into(),
        Some(("whoami", _)) => match store.current_user() {
            Ok(Some(u)) => Notice::Success(format!(
                "{} ({})",
                u.email.unwrap_or_default(),
                u.id
            )),
            Ok(None) => Notice::Error("Not signed in".to_string()),
            Err(e) => Notice::Error(e.to_string()),
        },
        _ => return Ok(()),
    };
    notice.print();
    Ok(())
}
