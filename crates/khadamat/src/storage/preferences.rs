use std::sync::Arc;

use crate::models::UserIntent;

use super::{
    KeyValueStore, StorageError, ONBOARDING_COMPLETED_KEY, POST_LOGIN_REDIRECT_KEY,
    USER_INTENT_KEY,
};

/// Device-local flags that survive logout: onboarding, intent and the
/// route to resume after signing in.
#[derive(Clone)]
pub struct Preferences<S> {
    storage: Arc<S>,
}

impl<S> Preferences<S>
where
    S: KeyValueStore,
{
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub fn onboarding_completed(&self) -> Result<bool, StorageError> {
        Ok(self
            .storage
            .get(ONBOARDING_COMPLETED_KEY)?
            .is_some_and(|value| value == "true"))
    }

    pub fn mark_onboarding_completed(&self) -> Result<(), StorageError> {
        self.storage.set(ONBOARDING_COMPLETED_KEY, "true")
    }

    pub fn user_intent(&self) -> Result<Option<UserIntent>, StorageError> {
        Ok(self
            .storage
            .get(USER_INTENT_KEY)?
            .and_then(|value| UserIntent::parse(&value)))
    }

    pub fn set_user_intent(&self, intent: UserIntent) -> Result<(), StorageError> {
        self.storage.set(USER_INTENT_KEY, intent.as_str())
    }

    pub fn set_post_login_redirect(&self, path: &str) -> Result<(), StorageError> {
        self.storage.set(POST_LOGIN_REDIRECT_KEY, path)
    }

    /// Returns the stored redirect and clears it, so it is honored once.
    pub fn take_post_login_redirect(&self) -> Result<Option<String>, StorageError> {
        let redirect = self.storage.get(POST_LOGIN_REDIRECT_KEY)?;
        if redirect.is_some() {
            self.storage.remove(POST_LOGIN_REDIRECT_KEY)?;
        }
        Ok(redirect.filter(|path| !path.trim().is_empty()))
    }
}
