use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiError, RequestOptions};
use crate::models::DevicePlatform;

#[derive(Debug, Serialize)]
struct DeviceToken<'a> {
    token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<DevicePlatform>,
}

pub async fn register(
    client: &ApiClient,
    token: &str,
    platform: DevicePlatform,
) -> Result<(), ApiError> {
    client
        .post(
            "/notifications/devices",
            &DeviceToken {
                token,
                platform: Some(platform),
            },
        )
        .await
}

pub async fn remove(client: &ApiClient, token: &str) -> Result<(), ApiError> {
    let options = RequestOptions::new(Method::DELETE).with_body(&DeviceToken {
        token,
        platform: None,
    })?;
    client
        .request("/notifications/devices", options)
        .await?
        .into_result()
}
