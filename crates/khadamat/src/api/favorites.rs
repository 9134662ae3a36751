use std::future::Future;

use super::{ApiClient, ApiError};
use crate::favorites::FavoritesBackend;
use crate::models::{FavoriteToggle, MaidId, MaidSummary};

pub async fn list(client: &ApiClient) -> Result<Vec<MaidSummary>, ApiError> {
    client.get("/favorites").await
}

/// Flips the server-side favorite flag and reports the resulting state.
pub async fn toggle(client: &ApiClient, maid_id: &MaidId) -> Result<FavoriteToggle, ApiError> {
    client
        .post(&format!("/favorites/{maid_id}/toggle"), &serde_json::json!({}))
        .await
}

impl FavoritesBackend for ApiClient {
    fn toggle(&self, id: &MaidId) -> impl Future<Output = Result<bool, ApiError>> + Send {
        let id = id.clone();
        async move { toggle(self, &id).await.map(|outcome| outcome.is_favorite) }
    }
}
