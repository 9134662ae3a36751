//! Session store: token pair and user identity, mirrored between memory and
//! durable storage.
//!
//! Every mutation writes storage first and only then flips the in-memory
//! state. When a write fails part-way, keys already written are put back to
//! their previous values and the in-memory state is left as it was, so the two
//! never disagree once an operation returns.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::TokenSource;
use crate::models::{AuthTokens, User};
use crate::storage::{
    KeyValueStore, StorageError, ACCESS_TOKEN_KEY, LEGACY_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
    pub is_refreshing: bool,
    pub is_loading: bool,
}

impl Session {
    fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("user record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

enum StorageWrite {
    Set(&'static str, String),
    Remove(&'static str),
}

impl StorageWrite {
    fn key(&self) -> &'static str {
        match self {
            StorageWrite::Set(key, _) | StorageWrite::Remove(key) => *key,
        }
    }
}

pub struct SessionStore<S> {
    storage: Arc<S>,
    state: watch::Sender<Session>,
    mutations: Mutex<()>,
}

impl<S> SessionStore<S>
where
    S: KeyValueStore,
{
    /// A fresh store starts in the loading state until `initialize` runs.
    pub fn new(storage: Arc<S>) -> Self {
        let (state, _) = watch::channel(Session::loading());
        Self {
            storage,
            state,
            mutations: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state.borrow().refresh_token.clone()
    }

    pub fn login(&self, tokens: AuthTokens, user: User) -> Result<(), SessionError> {
        let _guard = self.mutations.lock().expect("session mutex poisoned");
        let user_json = serde_json::to_string(&user)?;

        self.apply_writes(vec![
            StorageWrite::Set(ACCESS_TOKEN_KEY, tokens.access_token.clone()),
            match &tokens.refresh_token {
                Some(refresh) => StorageWrite::Set(REFRESH_TOKEN_KEY, refresh.clone()),
                None => StorageWrite::Remove(REFRESH_TOKEN_KEY),
            },
            StorageWrite::Set(USER_KEY, user_json),
        ])?;

        info!(user_id = %user.id.0, role = user.role.label(), "session established");
        self.state.send_modify(|session| {
            session.access_token = Some(tokens.access_token);
            session.refresh_token = tokens.refresh_token;
            session.user = Some(user);
            session.is_refreshing = false;
            session.is_loading = false;
        });
        Ok(())
    }

    /// Login path for deployments that only hand out a single token.
    pub fn legacy_login(&self, token: String, user: User) -> Result<(), SessionError> {
        self.login(
            AuthTokens {
                access_token: token,
                refresh_token: None,
            },
            user,
        )
    }

    /// Restores the persisted session. Never fails: unreadable storage ends in
    /// an unauthenticated, no-longer-loading session.
    pub fn initialize(&self) {
        let _guard = self.mutations.lock().expect("session mutex poisoned");
        let restored = match self.read_persisted() {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "could not restore persisted session");
                Session::default()
            }
        };

        debug!(
            authenticated = restored.is_authenticated(),
            "session initialized"
        );
        self.state.send_replace(Session {
            is_loading: false,
            ..restored
        });
    }

    fn read_persisted(&self) -> Result<Session, SessionError> {
        let mut access_token = self.storage.get(ACCESS_TOKEN_KEY)?;
        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY)?;
        let legacy_token = self.storage.get(LEGACY_TOKEN_KEY)?;

        if let Some(legacy) = legacy_token {
            if access_token.is_none() {
                self.apply_writes(vec![
                    StorageWrite::Set(ACCESS_TOKEN_KEY, legacy.clone()),
                    StorageWrite::Remove(LEGACY_TOKEN_KEY),
                ])?;
                info!("migrated legacy single-token session");
                access_token = Some(legacy);
            } else {
                self.storage.remove(LEGACY_TOKEN_KEY)?;
            }
        }

        let user = match self.storage.get(USER_KEY)? {
            Some(raw) => Some(serde_json::from_str::<User>(&raw)?),
            None => None,
        };

        Ok(Session {
            access_token,
            refresh_token,
            user,
            is_refreshing: false,
            is_loading: false,
        })
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        let _guard = self.mutations.lock().expect("session mutex poisoned");
        self.apply_writes(vec![
            StorageWrite::Remove(ACCESS_TOKEN_KEY),
            StorageWrite::Remove(REFRESH_TOKEN_KEY),
            StorageWrite::Remove(USER_KEY),
            StorageWrite::Remove(LEGACY_TOKEN_KEY),
        ])?;

        info!("session cleared");
        self.state.send_replace(Session::default());
        Ok(())
    }

    /// Replaces the token pair; the user record is left alone.
    pub fn update_tokens(&self, tokens: AuthTokens) -> Result<(), SessionError> {
        let _guard = self.mutations.lock().expect("session mutex poisoned");
        let mut writes = vec![StorageWrite::Set(ACCESS_TOKEN_KEY, tokens.access_token.clone())];
        if let Some(refresh) = &tokens.refresh_token {
            writes.push(StorageWrite::Set(REFRESH_TOKEN_KEY, refresh.clone()));
        }
        self.apply_writes(writes)?;

        self.state.send_modify(|session| {
            session.access_token = Some(tokens.access_token);
            if tokens.refresh_token.is_some() {
                session.refresh_token = tokens.refresh_token;
            }
        });
        Ok(())
    }

    pub fn update_user(&self, user: User) -> Result<(), SessionError> {
        let _guard = self.mutations.lock().expect("session mutex poisoned");
        let user_json = serde_json::to_string(&user)?;
        self.apply_writes(vec![StorageWrite::Set(USER_KEY, user_json)])?;

        self.state.send_modify(|session| session.user = Some(user));
        Ok(())
    }

    pub fn set_refreshing(&self, refreshing: bool) {
        self.state.send_if_modified(|session| {
            let changed = session.is_refreshing != refreshing;
            session.is_refreshing = refreshing;
            changed
        });
    }

    /// Claims the refresh slot. Returns `false` when another caller already
    /// holds it.
    pub fn try_begin_refresh(&self) -> bool {
        self.state.send_if_modified(|session| {
            if session.is_refreshing {
                false
            } else {
                session.is_refreshing = true;
                true
            }
        })
    }

    fn apply_writes(&self, writes: Vec<StorageWrite>) -> Result<(), SessionError> {
        let mut previous = Vec::with_capacity(writes.len());
        for write in &writes {
            previous.push((write.key(), self.storage.get(write.key())?));
        }

        for (applied, write) in writes.iter().enumerate() {
            let result = match write {
                StorageWrite::Set(key, value) => self.storage.set(key, value),
                StorageWrite::Remove(key) => self.storage.remove(key),
            };

            if let Err(err) = result {
                self.restore(&previous[..applied]);
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn restore(&self, previous: &[(&'static str, Option<String>)]) {
        for (key, value) in previous.iter().rev() {
            let outcome = match value {
                Some(value) => self.storage.set(key, value),
                None => self.storage.remove(key),
            };
            if let Err(err) = outcome {
                warn!(key, error = %err, "failed to roll back session key");
            }
        }
    }
}

impl<S> TokenSource for SessionStore<S>
where
    S: KeyValueStore,
{
    fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token.clone()
    }
}
