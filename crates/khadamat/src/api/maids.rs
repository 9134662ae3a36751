use super::{ApiClient, ApiError};
use crate::models::{MaidContact, MaidDraft, MaidFilters, MaidId, MaidProfile, MaidSummary, Page};

pub async fn list(
    client: &ApiClient,
    filters: &MaidFilters,
) -> Result<Page<MaidSummary>, ApiError> {
    client.get_with_query("/maids", filters.to_query()).await
}

pub async fn get(client: &ApiClient, id: &MaidId) -> Result<MaidProfile, ApiError> {
    client.get(&format!("/maids/{id}")).await
}

/// Publishes a new profile under the signed-in office.
pub async fn create(client: &ApiClient, draft: &MaidDraft) -> Result<MaidProfile, ApiError> {
    client.post("/offices/me/maids", draft).await
}

pub async fn update(
    client: &ApiClient,
    id: &MaidId,
    draft: &MaidDraft,
) -> Result<MaidProfile, ApiError> {
    client.put(&format!("/maids/{id}"), draft).await
}

pub async fn delete(client: &ApiClient, id: &MaidId) -> Result<(), ApiError> {
    client.delete(&format!("/maids/{id}")).await
}

/// Contact details; the API refuses this until the CV has been unlocked.
pub async fn contact(client: &ApiClient, id: &MaidId) -> Result<MaidContact, ApiError> {
    client.get(&format!("/maids/{id}/contact")).await
}
