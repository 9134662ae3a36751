//! Durable key-value storage used by the session store and local preferences.

mod file;
mod memory;
mod preferences;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use preferences::Preferences;

pub const ACCESS_TOKEN_KEY: &str = "khadamat.access_token";
pub const REFRESH_TOKEN_KEY: &str = "khadamat.refresh_token";
pub const USER_KEY: &str = "khadamat.user";
/// Single-token key written by releases that predate refresh tokens.
pub const LEGACY_TOKEN_KEY: &str = "auth_token";
pub const ONBOARDING_COMPLETED_KEY: &str = "khadamat.onboarding_completed";
pub const USER_INTENT_KEY: &str = "khadamat.user_intent";
pub const POST_LOGIN_REDIRECT_KEY: &str = "khadamat.post_login_redirect";

/// String-valued storage abstraction so stores can be exercised in isolation.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
