use serde_json::json;

use super::{ApiClient, ApiError};
use crate::models::{Subscription, SubscriptionPlan};

pub async fn plans(client: &ApiClient) -> Result<Vec<SubscriptionPlan>, ApiError> {
    client.get("/subscriptions/plans").await
}

/// `None` when the office has never subscribed.
pub async fn current(client: &ApiClient) -> Result<Option<Subscription>, ApiError> {
    client.get("/subscriptions/current").await
}

pub async fn subscribe(client: &ApiClient, plan_id: &str) -> Result<Subscription, ApiError> {
    client
        .post("/subscriptions", &json!({ "planId": plan_id }))
        .await
}

pub async fn cancel(client: &ApiClient) -> Result<Subscription, ApiError> {
    client.post("/subscriptions/cancel", &json!({})).await
}
