use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::models::{MaidId, PaymentConfirmation, PaymentIntent, PaymentMethod};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnlockRequest<'a> {
    maid_id: &'a MaidId,
    method: PaymentMethod,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest<'a> {
    provider_transaction_id: &'a str,
}

/// Opens a CV-unlock checkout. The returned intent is handed to the card or
/// BNPL provider; `confirm` closes the loop with the provider's transaction id.
pub async fn create_unlock(
    client: &ApiClient,
    maid_id: &MaidId,
    method: PaymentMethod,
) -> Result<PaymentIntent, ApiError> {
    client
        .post("/payments/unlock", &UnlockRequest { maid_id, method })
        .await
}

pub async fn confirm(
    client: &ApiClient,
    payment_id: &str,
    provider_transaction_id: &str,
) -> Result<PaymentConfirmation, ApiError> {
    client
        .post(
            &format!("/payments/{payment_id}/confirm"),
            &ConfirmRequest {
                provider_transaction_id,
            },
        )
        .await
}

/// Ids of every worker the signed-in customer has unlocked.
pub async fn unlocked(client: &ApiClient) -> Result<Vec<MaidId>, ApiError> {
    client.get("/payments/unlocked").await
}
