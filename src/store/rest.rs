// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Hosted backend: PostgREST for rows, GoTrue for auth.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{RemoteStore, StoreError, StoreResult, TxQuery};
use crate::models::{Category, NewTransaction, Transaction, TransactionPatch, User, UserUpdate};

/// Refresh this many seconds before the access token actually expires.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds
    pub expires_at: i64,
    pub user: User,
}

impl Session {
    pub fn expires_soon(&self, now: i64) -> bool {
        self.expires_at - REFRESH_MARGIN_SECS <= now
    }

    pub fn load(path: &Path) -> StoreResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save(&self, path: &Path) -> StoreResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl From<AuthUser> for User {
    fn from(v: AuthUser) -> Self {
        Self {
            id: v.id,
            email: v.email.filter(|e| !e.is_empty()),
            full_name: v.user_metadata.and_then(|m| m.full_name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    expires_at: Option<i64>,
    user: AuthUser,
}

impl From<TokenResponse> for Session {
    fn from(v: TokenResponse) -> Self {
        let expires_at = v
            .expires_at
            .unwrap_or_else(|| Utc::now().timestamp() + v.expires_in);
        Self {
            access_token: v.access_token,
            refresh_token: v.refresh_token,
            expires_at,
            user: v.user.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

/// Outcome of a sign-up. Projects that require email confirmation return the
/// user without a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUp {
    SignedIn(Session),
    ConfirmationRequired(User),
}

/// Query pairs for a transactions select.
pub fn transactions_query(q: &TxQuery) -> Vec<(String, String)> {
    let mut out = vec![("select".to_string(), "*".to_string())];
    if let Some(from) = q.from {
        out.push(("date".into(), format!("gte.{from}")));
    }
    if let Some(to) = q.to {
        out.push(("date".into(), format!("lte.{to}")));
    }
    out.push(("order".into(), format!("date.{}", q.order.as_str())));
    if let Some(limit) = q.limit {
        out.push(("limit".into(), limit.to_string()));
    }
    out
}

/// Map a non-2xx response body to an error. PostgREST reports `message`;
/// GoTrue uses `msg`, `error_description` or `error` depending on endpoint.
pub fn api_error(status: u16, body: &str) -> StoreError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("request failed with status {status}")
            } else {
                trimmed.to_string()
            }
        });
    StoreError::Api { status, message }
}

pub struct RestStore {
    client: Client,
    base_url: String,
    anon_key: String,
    session: RefCell<Option<Session>>,
    session_path: Option<PathBuf>,
}

impl RestStore {
    pub fn new(base_url: &str, anon_key: &str, session: Option<Session>) -> StoreResult<Self> {
        let client = crate::utils::http_client()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            session: RefCell::new(session),
            session_path: None,
        })
    }

    /// Like [`RestStore::new`], but the session is read from and written back
    /// to `path`.
    pub fn with_session_file(base_url: &str, anon_key: &str, path: PathBuf) -> StoreResult<Self> {
        let session = Session::load(&path)?;
        let mut store = Self::new(base_url, anon_key, session)?;
        store.session_path = Some(path);
        Ok(store)
    }

    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn set_session(&self, session: Option<Session>) -> StoreResult<()> {
        if let Some(path) = &self.session_path {
            match &session {
                Some(s) => s.save(path)?,
                None if path.exists() => fs::remove_file(path)?,
                None => {}
            }
        }
        *self.session.borrow_mut() = session;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    /// Current access token, refreshed first when close to expiry.
    fn access_token(&self) -> StoreResult<String> {
        let Some(session) = self.session() else {
            return Err(StoreError::NotSignedIn);
        };
        if !session.expires_soon(Utc::now().timestamp()) {
            return Ok(session.access_token);
        }
        debug!("access token expiring, refreshing session");
        let fresh = self.refresh(&session.refresh_token)?;
        let token = fresh.access_token.clone();
        self.set_session(Some(fresh))?;
        Ok(token)
    }

    fn send(&self, rb: RequestBuilder) -> StoreResult<Response> {
        let resp = rb.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        Err(api_error(status.as_u16(), &body))
    }

    fn decode<T: DeserializeOwned>(resp: Response) -> StoreResult<T> {
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn authed(&self, method: Method, path: &str) -> StoreResult<RequestBuilder> {
        let token = self.access_token()?;
        Ok(self.request(method, path, &token))
    }

    fn token_grant(&self, grant: &str, body: serde_json::Value) -> StoreResult<Session> {
        let rb = self
            .request(Method::POST, "/auth/v1/token", &self.anon_key)
            .query(&[("grant_type", grant)])
            .json(&body);
        let token: TokenResponse = Self::decode(self.send(rb)?)?;
        Ok(token.into())
    }

    fn refresh(&self, refresh_token: &str) -> StoreResult<Session> {
        self.token_grant(
            "refresh_token",
            json!({ "refresh_token": refresh_token }),
        )
    }

    pub fn sign_in(&self, email: &str, password: &str) -> StoreResult<Session> {
        let session = self.token_grant(
            "password",
            json!({ "email": email, "password": password }),
        )?;
        self.set_session(Some(session.clone()))?;
        info!(user = %session.user.id, "signed in");
        Ok(session)
    }

    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> StoreResult<SignUp> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "full_name": full_name },
        });
        let rb = self
            .request(Method::POST, "/auth/v1/signup", &self.anon_key)
            .json(&body);
        match Self::decode::<SignUpResponse>(self.send(rb)?)? {
            SignUpResponse::Session(token) => {
                let session: Session = token.into();
                self.set_session(Some(session.clone()))?;
                Ok(SignUp::SignedIn(session))
            }
            SignUpResponse::User(user) => Ok(SignUp::ConfirmationRequired(user.into())),
        }
    }

    /// Revoke the session remotely when possible; the local copy is always
    /// dropped.
    pub fn sign_out(&self) -> StoreResult<()> {
        if let Some(session) = self.session() {
            let rb = self.request(Method::POST, "/auth/v1/logout", &session.access_token);
            if let Err(e) = self.send(rb) {
                warn!(error = %e, "remote logout failed");
            }
        }
        self.set_session(None)
    }
}

impl RemoteStore for RestStore {
    fn select_transactions(&self, query: &TxQuery) -> StoreResult<Vec<Transaction>> {
        let rb = self
            .authed(Method::GET, "/rest/v1/transactions")?
            .query(&transactions_query(query));
        let rows: Vec<Transaction> = Self::decode(self.send(rb)?)?;
        debug!(rows = rows.len(), "selected transactions");
        Ok(rows)
    }

    fn insert_transaction(&self, row: &NewTransaction) -> StoreResult<()> {
        let rb = self
            .authed(Method::POST, "/rest/v1/transactions")?
            .header("Prefer", "return=minimal")
            .json(&[row]);
        self.send(rb)?;
        Ok(())
    }

    fn update_transaction(&self, id: Uuid, patch: &TransactionPatch) -> StoreResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let rb = self
            .authed(Method::PATCH, "/rest/v1/transactions")?
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(patch);
        self.send(rb)?;
        Ok(())
    }

    fn delete_transaction(&self, id: Uuid) -> StoreResult<()> {
        let rb = self
            .authed(Method::DELETE, "/rest/v1/transactions")?
            .query(&[("id", format!("eq.{id}"))]);
        self.send(rb)?;
        Ok(())
    }

    fn select_categories(&self) -> StoreResult<Vec<Category>> {
        let rb = self
            .authed(Method::GET, "/rest/v1/categories")?
            .query(&[("select", "id,name,type")]);
        Self::decode(self.send(rb)?)
    }

    fn current_user(&self) -> StoreResult<Option<User>> {
        let token = match self.access_token() {
            Ok(t) => t,
            Err(StoreError::NotSignedIn) => return Ok(None),
            Err(e) => return Err(e),
        };
        let rb = self.request(Method::GET, "/auth/v1/user", &token);
        match self.send(rb) {
            Ok(resp) => Ok(Some(Self::decode::<AuthUser>(resp)?.into())),
            Err(StoreError::Api { status: 401, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn update_user(&self, update: &UserUpdate) -> StoreResult<User> {
        let rb = self.authed(Method::PUT, "/auth/v1/user")?.json(update);
        let user: User = Self::decode::<AuthUser>(self.send(rb)?)?.into();
        if let Some(mut session) = self.session() {
            session.user = user.clone();
            self.set_session(Some(session))?;
        }
        Ok(user)
    }
}
