use super::{ApiClient, ApiError};
use crate::models::{MaidSummary, Office, OfficeDraft};

pub async fn register(client: &ApiClient, draft: &OfficeDraft) -> Result<Office, ApiError> {
    client.post("/offices", draft).await
}

pub async fn mine(client: &ApiClient) -> Result<Office, ApiError> {
    client.get("/offices/me").await
}

pub async fn update(client: &ApiClient, draft: &OfficeDraft) -> Result<Office, ApiError> {
    client.put("/offices/me", draft).await
}

pub async fn list_maids(client: &ApiClient) -> Result<Vec<MaidSummary>, ApiError> {
    client.get("/offices/me/maids").await
}
