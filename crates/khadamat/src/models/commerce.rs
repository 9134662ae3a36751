use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::maid::MaidId;
use super::office::OfficeId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotationId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    Pending,
    Responded,
    Accepted,
    Declined,
    Expired,
}

impl QuotationStatus {
    pub fn label(self) -> &'static str {
        match self {
            QuotationStatus::Pending => "Pending",
            QuotationStatus::Responded => "Responded",
            QuotationStatus::Accepted => "Accepted",
            QuotationStatus::Declined => "Declined",
            QuotationStatus::Expired => "Expired",
        }
    }
}

/// Terms an office sends back for a quotation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationResponse {
    pub monthly_fee: u32,
    pub recruitment_fee: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: QuotationId,
    pub maid_id: MaidId,
    pub office_id: OfficeId,
    pub customer_id: String,
    pub status: QuotationStatus,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub response: Option<QuotationResponse>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Bnpl,
}

impl PaymentMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "card" => Some(PaymentMethod::Card),
            "bnpl" | "tabby" => Some(PaymentMethod::Bnpl),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    Refunded,
}

/// Checkout handle returned before handing control to the payment provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub payment_id: String,
    pub maid_id: MaidId,
    pub amount: u32,
    pub currency: String,
    pub method: PaymentMethod,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub checkout_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub maid_id: MaidId,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub monthly_price: u32,
    pub max_listings: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan_id: String,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub renews_on: Option<NaiveDate>,
}
