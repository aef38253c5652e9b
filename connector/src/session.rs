/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Session context guarding every API call.
//!
//! A [`Session`] holds the basic-auth credential and the user it belongs to.
//! The request side refuses API calls while no credential is held, the
//! response side drops the credential when the API answers 401. Changes are
//! published through a watch channel so front ends can send the user back to
//! the login flow.

use crate::error::{Error, Result};
use crate::models::User;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Authenticating,
    Authenticated,
    Unauthorized,
}

/// What survives between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub token: Option<String>,
    pub user: Option<User>,
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionRecord>>;
    fn save(&self, record: &SessionRecord) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn load(&self) -> Result<Option<SessionRecord>> {
        (**self).load()
    }

    fn save(&self, record: &SessionRecord) -> Result<()> {
        (**self).save(record)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<SessionRecord>> {
        let record = self
            .record
            .lock()
            .map_err(|e| Error::Store(e.to_string()))?;
        Ok(record.clone())
    }

    fn save(&self, record: &SessionRecord) -> Result<()> {
        let mut stored = self
            .record
            .lock()
            .map_err(|e| Error::Store(e.to_string()))?;
        *stored = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut stored = self
            .record
            .lock()
            .map_err(|e| Error::Store(e.to_string()))?;
        *stored = None;
        Ok(())
    }
}

pub struct Session {
    sender: watch::Sender<SessionSnapshot>,
    store: Box<dyn SessionStore>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("user", &self.user().map(|user| user.name))
            .finish()
    }
}

impl Session {
    /// Starts authenticated when the store yields a usable record.
    pub fn restore(store: Box<dyn SessionStore>) -> Result<Self> {
        let snapshot = match store.load()? {
            Some(record) if !record.token.is_empty() => SessionSnapshot {
                state: SessionState::Authenticated,
                token: Some(record.token),
                user: Some(record.user),
            },
            _ => SessionSnapshot {
                state: SessionState::Disconnected,
                token: None,
                user: None,
            },
        };

        let (sender, _) = watch::channel(snapshot);
        Ok(Self { sender, store })
    }

    pub fn in_memory() -> Self {
        let (sender, _) = watch::channel(SessionSnapshot {
            state: SessionState::Disconnected,
            token: None,
            user: None,
        });

        Self {
            sender,
            store: Box::new(MemoryStore::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.sender.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.sender.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.sender.borrow().state
    }

    pub fn token(&self) -> Option<String> {
        self.sender.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.sender.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    pub fn is_unauthorized(&self) -> bool {
        self.state() == SessionState::Unauthorized
    }

    pub fn is_admin(&self) -> bool {
        let snapshot = self.sender.borrow();
        snapshot.state == SessionState::Authenticated
            && snapshot.user.as_ref().is_some_and(User::is_admin)
    }

    /// Request side: API calls without a credential fail before touching the network.
    pub fn authorize(&self, url: &str, api_root: &str) -> Result<Option<String>> {
        if !url.starts_with(api_root) {
            return Ok(None);
        }

        match self.token() {
            Some(token) => Ok(Some(format!("Basic {}", token))),
            None => Err(Error::missing_token()),
        }
    }

    /// Response side: a 401 ends the session unless it is already disconnected.
    pub fn reject(&self) {
        if self.state() == SessionState::Disconnected {
            return;
        }

        warn!("API rejected the credential, session is now unauthorized");
        self.sender.send_modify(|snapshot| {
            snapshot.state = SessionState::Unauthorized;
            snapshot.token = None;
            snapshot.user = None;
        });

        if let Err(e) = self.store.clear() {
            warn!("Failed to clear persisted session: {}", e);
        }
    }

    pub(crate) fn begin_login(&self, token: String) {
        self.sender.send_modify(|snapshot| {
            snapshot.state = SessionState::Authenticating;
            snapshot.token = Some(token);
            snapshot.user = None;
        });
    }

    pub(crate) fn complete_login(&self, token: String, user: User) -> Result<()> {
        let record = SessionRecord {
            token: token.clone(),
            user: user.clone(),
        };

        self.store.save(&record)?;
        info!(user = %user.name, "Session authenticated");
        self.sender.send_modify(|snapshot| {
            snapshot.state = SessionState::Authenticated;
            snapshot.token = Some(token);
            snapshot.user = Some(user);
        });

        Ok(())
    }

    pub(crate) fn fail_login(&self) {
        self.sender.send_modify(|snapshot| {
            snapshot.state = SessionState::Unauthorized;
            snapshot.token = None;
            snapshot.user = None;
        });
    }

    pub(crate) fn disconnect(&self) -> Result<()> {
        self.store.clear()?;
        info!("Session disconnected");
        self.sender.send_modify(|snapshot| {
            snapshot.state = SessionState::Disconnected;
            snapshot.token = None;
            snapshot.user = None;
        });

        Ok(())
    }
}
