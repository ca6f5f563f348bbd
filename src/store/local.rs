// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use super::{RemoteStore, StoreError, StoreResult, TxQuery};
use crate::db;
use crate::models::{Category, NewTransaction, Transaction, TransactionPatch, User, UserUpdate};

/// The store contract over a SQLite connection. There is one local profile,
/// and it is always signed in.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    pub fn open_default() -> anyhow::Result<Self> {
        let conn = db::open_or_init()?;
        Ok(Self::from_initialized(conn)?)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Create tables and default categories if missing.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        db::init_schema(&conn)?;
        db::seed_categories(&conn)?;
        Self::from_initialized(conn)
    }

    fn from_initialized(conn: Connection) -> StoreResult<Self> {
        let store = Self { conn };
        store.profile_id()?;
        Ok(store)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn setting(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?)
    }

    fn set_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn profile_id(&self) -> StoreResult<Uuid> {
        if let Some(s) = self.setting("profile_id")? {
            return parse_uuid("profile_id", &s);
        }
        let id = Uuid::new_v4();
        self.set_setting("profile_id", &id.to_string())?;
        debug!(%id, "created local profile");
        Ok(id)
    }

    fn profile(&self) -> StoreResult<User> {
        Ok(User {
            id: self.profile_id()?,
            email: self.setting("profile_email")?.filter(|s| !s.is_empty()),
            full_name: self.setting("profile_full_name")?.filter(|s| !s.is_empty()),
        })
    }
}

fn parse_uuid(column: &'static str, s: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(s).map_err(|_| StoreError::InvalidRow {
        column,
        value: s.to_string(),
    })
}

fn parse_amount(s: &str) -> StoreResult<Decimal> {
    s.parse::<Decimal>().map_err(|_| StoreError::InvalidRow {
        column: "amount",
        value: s.to_string(),
    })
}

fn parse_kind(s: &str) -> StoreResult<crate::models::TxKind> {
    s.parse().map_err(|_| StoreError::InvalidRow {
        column: "type",
        value: s.to_string(),
    })
}

type RawTransaction = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    NaiveDate,
    bool,
    DateTime<Utc>,
);

impl RemoteStore for LocalStore {
    fn select_transactions(&self, query: &TxQuery) -> StoreResult<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, user_id, amount, type, category_id, description, date, recurring, created_at
             FROM transactions WHERE 1=1",
        );
        let mut params_vec: Vec<String> = Vec::new();
        if let Some(from) = query.from {
            sql.push_str(" AND date>=?");
            params_vec.push(from.to_string());
        }
        if let Some(to) = query.to {
            sql.push_str(" AND date<=?");
            params_vec.push(to.to_string());
        }
        let dir = query.order.as_str();
        sql.push_str(&format!(" ORDER BY date {dir}, created_at {dir}"));
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let raw = stmt
            .query_map(rusqlite::params_from_iter(params_vec.iter()), |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                    r.get(7)?,
                    r.get(8)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<RawTransaction>>>()?;

        let mut data = Vec::with_capacity(raw.len());
        for (id, user_id, amount, kind, category, description, date, recurring, created_at) in raw
        {
            data.push(Transaction {
                id: parse_uuid("id", &id)?,
                user_id: parse_uuid("user_id", &user_id)?,
                amount: parse_amount(&amount)?,
                kind: parse_kind(&kind)?,
                category: category
                    .as_deref()
                    .map(|c| parse_uuid("category_id", c))
                    .transpose()?,
                description,
                date,
                recurring,
                created_at,
            });
        }
        debug!(rows = data.len(), "selected transactions");
        Ok(data)
    }

    fn insert_transaction(&self, row: &NewTransaction) -> StoreResult<()> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO transactions(
                id, user_id, amount, type, category_id, description, date, recurring, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id.to_string(),
                row.user_id.to_string(),
                row.amount.to_string(),
                row.kind.as_str(),
                row.category_id.map(|c| c.to_string()),
                row.description,
                row.date,
                row.recurring,
                Utc::now(),
            ],
        )?;
        debug!(%id, "inserted transaction");
        Ok(())
    }

    fn update_transaction(&self, id: Uuid, patch: &TransactionPatch) -> StoreResult<()> {
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(a) = patch.amount {
            sets.push("amount=?");
            values.push(Box::new(a.to_string()));
        }
        if let Some(k) = patch.kind {
            sets.push("type=?");
            values.push(Box::new(k.as_str()));
        }
        if let Some(c) = patch.category_id {
            sets.push("category_id=?");
            values.push(Box::new(c.to_string()));
        }
        if let Some(d) = &patch.description {
            sets.push("description=?");
            values.push(Box::new(d.clone()));
        }
        if let Some(d) = patch.date {
            sets.push("date=?");
            values.push(Box::new(d));
        }
        if let Some(r) = patch.recurring {
            sets.push("recurring=?");
            values.push(Box::new(r));
        }
        if sets.is_empty() {
            return Ok(());
        }
        values.push(Box::new(id.to_string()));
        let sql = format!("UPDATE transactions SET {} WHERE id=?", sets.join(", "));
        let n = self.conn.execute(
            &sql,
            rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
        )?;
        debug!(%id, rows = n, "updated transaction");
        Ok(())
    }

    fn delete_transaction(&self, id: Uuid) -> StoreResult<()> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id.to_string()])?;
        debug!(%id, rows = n, "deleted transaction");
        Ok(())
    }

    fn select_categories(&self) -> StoreResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, type FROM categories ORDER BY type, name")?;
        let raw = stmt
            .query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raw.into_iter()
            .map(|(id, name, kind)| {
                Ok(Category {
                    id: parse_uuid("id", &id)?,
                    name,
                    kind: parse_kind(&kind)?,
                })
            })
            .collect()
    }

    fn current_user(&self) -> StoreResult<Option<User>> {
        Ok(Some(self.profile()?))
    }

    fn update_user(&self, update: &UserUpdate) -> StoreResult<User> {
        if update.password.is_some() {
            return Err(StoreError::Unsupported(
                "password changes need the hosted backend; the local profile has no credentials",
            ));
        }
        if let Some(email) = &update.email {
            self.set_setting("profile_email", email)?;
        }
        if let Some(name) = update.data.as_ref().and_then(|d| d.full_name.as_ref()) {
            self.set_setting("profile_full_name", name)?;
        }
        self.profile()
    }
}
