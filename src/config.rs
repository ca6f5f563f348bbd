// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! On-disk configuration and platform paths.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Fintrack", "fintrack"));

/// Where ledger data lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backend {
    /// SQLite file in the platform data dir
    #[default]
    Local,
    /// Hosted project exposing PostgREST under /rest/v1 and GoTrue under /auth/v1
    Rest { url: String, anon_key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    /// Display currency code; see `utils::CURRENCIES`
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub email_notifications: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            currency: default_currency(),
            email_notifications: false,
        }
    }
}

impl Config {
    /// A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config dir")?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))
    }

    /// Apply `FINTRACK_URL` / `FINTRACK_ANON_KEY` overrides. A URL switches to
    /// the REST backend and keeps any configured key; a key alone only applies
    /// to a REST backend.
    pub fn with_overrides(mut self, url: Option<&str>, anon_key: Option<&str>) -> Self {
        if let Some(new_url) = url {
            let key = match &self.backend {
                Backend::Rest { anon_key, .. } => anon_key.clone(),
                Backend::Local => String::new(),
            };
            self.backend = Backend::Rest {
                url: new_url.to_string(),
                anon_key: key,
            };
        }
        if let (Backend::Rest { anon_key: k, .. }, Some(new_key)) = (&mut self.backend, anon_key) {
            *k = new_key.to_string();
        }
        self
    }

    pub fn currency_symbol(&self) -> &'static str {
        crate::utils::currency_symbol(&self.currency).unwrap_or("$")
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific directories")
}

pub fn data_dir() -> Result<PathBuf> {
    let proj = project_dirs()?;
    let dir = proj.data_dir();
    fs::create_dir_all(dir).context("Failed to create data dir")?;
    Ok(dir.to_path_buf())
}

pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn session_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("session.json"))
}
