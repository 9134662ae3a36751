use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::{ApiClient, ApiError};
use crate::i18n::{self, Locale, Message};
use crate::models::{AuthTokens, Credentials, LoginResponse, Registration, User, UserRole};
use crate::session::{SessionError, SessionStore};
use crate::storage::KeyValueStore;

pub async fn login(
    client: &ApiClient,
    credentials: &Credentials,
) -> Result<LoginResponse, ApiError> {
    client.post("/auth/login", credentials).await
}

pub async fn register(
    client: &ApiClient,
    registration: &Registration,
) -> Result<LoginResponse, ApiError> {
    client.post("/auth/register", registration).await
}

pub async fn refresh(client: &ApiClient, refresh_token: &str) -> Result<AuthTokens, ApiError> {
    client
        .post("/auth/refresh", &json!({ "refreshToken": refresh_token }))
        .await
}

pub async fn me(client: &ApiClient) -> Result<User, ApiError> {
    client.get("/auth/me").await
}

pub async fn forgot_password(client: &ApiClient, email: &str) -> Result<(), ApiError> {
    #[derive(Serialize)]
    struct Body<'a> {
        email: &'a str,
    }
    client.post("/auth/forgot-password", &Body { email }).await
}

/// Errors from flows that touch both the API and the session store.
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Logs in and persists whichever token shape the API returned.
pub async fn sign_in<S>(
    client: &ApiClient,
    session: &SessionStore<S>,
    credentials: &Credentials,
) -> Result<User, SignInError>
where
    S: KeyValueStore,
{
    let response = login(client, credentials).await?;
    Ok(store_login(session, response)?)
}

/// Dashboard login. Anyone other than a super admin is refused and nothing is
/// written to the session.
pub async fn admin_sign_in<S>(
    client: &ApiClient,
    session: &SessionStore<S>,
    credentials: &Credentials,
    locale: Locale,
) -> Result<User, SignInError>
where
    S: KeyValueStore,
{
    let response = login(client, credentials).await?;
    let role = response.user().role;
    if role != UserRole::SuperAdmin {
        warn!(role = role.label(), "admin login refused");
        return Err(ApiError::Denied(i18n::text(locale, Message::AdminOnly).to_string()).into());
    }
    Ok(store_login(session, response)?)
}

fn store_login<S>(session: &SessionStore<S>, response: LoginResponse) -> Result<User, SessionError>
where
    S: KeyValueStore,
{
    match response {
        LoginResponse::Tokens { tokens, user } => {
            session.login(tokens, user.clone())?;
            Ok(user)
        }
        LoginResponse::Legacy { token, user } => {
            session.legacy_login(token, user.clone())?;
            Ok(user)
        }
    }
}

/// Holds the session's refresh slot; releasing it on drop keeps a cancelled
/// refresh from locking out later ones.
struct RefreshSlot<'a, S>
where
    S: KeyValueStore,
{
    session: &'a SessionStore<S>,
}

impl<S> Drop for RefreshSlot<'_, S>
where
    S: KeyValueStore,
{
    fn drop(&mut self) {
        self.session.set_refreshing(false);
    }
}

/// Exchanges the stored refresh token for a new pair. Returns `Ok(false)`
/// without calling the API when another caller is already refreshing.
pub async fn refresh_session<S>(
    client: &ApiClient,
    session: &SessionStore<S>,
    locale: Locale,
) -> Result<bool, SignInError>
where
    S: KeyValueStore,
{
    if !session.try_begin_refresh() {
        return Ok(false);
    }
    let slot = RefreshSlot { session };

    let Some(refresh_token) = session.refresh_token() else {
        let message = i18n::text(locale, Message::SessionExpired).to_string();
        return Err(ApiError::Denied(message).into());
    };
    let tokens = refresh(client, &refresh_token).await?;
    session.update_tokens(tokens)?;
    drop(slot);

    info!("access token refreshed");
    Ok(true)
}
