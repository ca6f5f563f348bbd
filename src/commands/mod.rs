// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analysis;
pub mod auth;
pub mod categories;
pub mod config;
pub mod dashboard;
pub mod settings;
pub mod transactions;

/// Outcome of a user-initiated mutation, shown inline instead of failing the
/// command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Notice::Success(t) | Notice::Error(t) => t,
        }
    }

    pub fn print(&self) {
        match self {
            Notice::Success(t) => println!("✓ {}", t),
            Notice::Error(t) => eprintln!("✗ {}", t),
        }
    }
}

impl<E: std::fmt::Display> From<Result<String, E>> for Notice {
    fn from(r: Result<String, E>) -> Self {
        match r {
            Ok(msg) => Notice::Success(msg),
            Err(e) => Notice::Error(e.to_string()),
        }
    }
}
