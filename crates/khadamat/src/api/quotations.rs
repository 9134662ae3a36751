use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::models::{MaidId, Quotation, QuotationId, QuotationResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuotationRequest<'a> {
    maid_id: &'a MaidId,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

/// Asks the worker's office for service terms.
pub async fn request(
    client: &ApiClient,
    maid_id: &MaidId,
    note: Option<&str>,
) -> Result<Quotation, ApiError> {
    client
        .post("/quotations", &QuotationRequest { maid_id, note })
        .await
}

pub async fn mine(client: &ApiClient) -> Result<Vec<Quotation>, ApiError> {
    client.get("/quotations/mine").await
}

pub async fn for_office(client: &ApiClient) -> Result<Vec<Quotation>, ApiError> {
    client.get("/offices/me/quotations").await
}

pub async fn respond(
    client: &ApiClient,
    id: &QuotationId,
    response: &QuotationResponse,
) -> Result<Quotation, ApiError> {
    client
        .post(&format!("/quotations/{}/respond", id.0), response)
        .await
}
