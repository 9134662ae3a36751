use serde::{Deserialize, Serialize};

/// Identifier wrapper for marketplace accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Role carried on the user record; drives which surfaces a client may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Office,
    Admin,
    SuperAdmin,
}

impl UserRole {
    pub fn label(self) -> &'static str {
        match self {
            UserRole::Customer => "Customer",
            UserRole::Office => "Recruitment office",
            UserRole::Admin => "Admin",
            UserRole::SuperAdmin => "Super admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub office_id: Option<String>,
}

/// Access/refresh pair issued by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Login payload returned by the API. Older deployments answer with a single
/// `token` field instead of a token pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Tokens { tokens: AuthTokens, user: User },
    Legacy { token: String, user: User },
}

impl LoginResponse {
    pub fn user(&self) -> &User {
        match self {
            LoginResponse::Tokens { user, .. } | LoginResponse::Legacy { user, .. } => user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
}

/// Platform reported when registering a push token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatform {
    Ios,
    Android,
    Web,
}

/// What a newly onboarded user came to do; stored locally to pick the landing flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIntent {
    Hire,
    ListWorkers,
}

impl UserIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            UserIntent::Hire => "hire",
            UserIntent::ListWorkers => "list_workers",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "hire" => Some(UserIntent::Hire),
            "list_workers" => Some(UserIntent::ListWorkers),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_offices: u64,
    pub pending_offices: u64,
    pub total_maids: u64,
    pub unlocks_this_month: u64,
    pub revenue_aed: f64,
}
