use serde_json::json;

use super::{ApiClient, ApiError};
use crate::models::{AdminStats, Office, OfficeId, OfficeStatus};

pub async fn stats(client: &ApiClient) -> Result<AdminStats, ApiError> {
    client.get("/admin/stats").await
}

pub async fn offices(
    client: &ApiClient,
    status: Option<OfficeStatus>,
) -> Result<Vec<Office>, ApiError> {
    let query = status
        .map(|status| vec![("status".to_string(), status.as_str().to_string())])
        .unwrap_or_default();
    client.get_with_query("/admin/offices", query).await
}

pub async fn approve_office(client: &ApiClient, id: &OfficeId) -> Result<Office, ApiError> {
    client
        .post(&format!("/admin/offices/{}/approve", id.0), &json!({}))
        .await
}

pub async fn reject_office(
    client: &ApiClient,
    id: &OfficeId,
    reason: &str,
) -> Result<Office, ApiError> {
    client
        .post(
            &format!("/admin/offices/{}/reject", id.0),
            &json!({ "reason": reason }),
        )
        .await
}
