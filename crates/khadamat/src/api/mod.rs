//! Typed client for the marketplace REST API.
//!
//! `ApiClient` owns transport, auth header injection and envelope decoding;
//! the per-area modules are thin wrappers naming endpoints and payloads.

pub mod admin;
pub mod auth;
mod client;
mod envelope;
pub mod favorites;
pub mod maids;
pub mod notifications;
pub mod offices;
pub mod payments;
pub mod quotations;
pub mod subscriptions;

pub use auth::SignInError;
pub use client::{ApiClient, NoToken, RequestOptions, StaticToken, TokenSource};
pub use envelope::{ApiReply, Envelope};

use crate::i18n::{self, Locale, Message};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },
    #[error("response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response envelope carried no data")]
    MissingData,
    #[error("{0}")]
    Denied(String),
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => *status,
            ApiError::Network(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Text safe to put in front of a user: server messages pass through,
    /// transport and decoding failures collapse to the generic network message.
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            ApiError::Rejected { message, .. } | ApiError::Denied(message) => message.clone(),
            ApiError::Network(_)
            | ApiError::Decode(_)
            | ApiError::MissingData
            | ApiError::InvalidEndpoint(_) => i18n::text(locale, Message::NetworkError).to_string(),
        }
    }
}
