use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfficeId(pub String);

/// Review state of a recruitment office registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficeStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl OfficeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OfficeStatus::Pending => "pending",
            OfficeStatus::Approved => "approved",
            OfficeStatus::Rejected => "rejected",
            OfficeStatus::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub id: OfficeId,
    pub name: String,
    pub license_number: String,
    pub emirate: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub status: OfficeStatus,
    #[serde(default)]
    pub subscription_active: bool,
}

/// Registration/edit payload produced by the office onboarding wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeDraft {
    pub name: String,
    pub license_number: String,
    pub emirate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}
