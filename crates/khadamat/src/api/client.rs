use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::envelope::{error_message, ApiReply, Envelope};
use super::ApiError;
use crate::config::ApiConfig;

/// Supplies the bearer token attached to outgoing requests.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Anonymous access.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenSource for NoToken {
    fn access_token(&self) -> Option<String> {
        None
    }
}

/// Fixed token, for tools that already hold one.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            query: Vec::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// JSON-over-HTTPS client for the marketplace API. Single attempt per call.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("khadamat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, &config.base_url, tokens))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        if !endpoint.starts_with('/') {
            return Err(ApiError::InvalidEndpoint(endpoint.to_string()));
        }

        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|_| ApiError::InvalidEndpoint(endpoint.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub async fn request<T>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiReply<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let RequestOptions {
            method,
            body,
            query,
        } = options;
        let url = self.url(endpoint, &query)?;

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(token) = self.tokens.access_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%method, endpoint, status = status.as_u16(), "api response");

        if !status.is_success() {
            let message = error_message(&bytes)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            warn!(%method, endpoint, status = status.as_u16(), %message, "api request rejected");
            return Err(ApiError::Rejected {
                status: Some(status.as_u16()),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        envelope.into_reply()
    }

    pub async fn get<T>(&self, endpoint: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(endpoint, RequestOptions::get())
            .await?
            .into_result()
    }

    pub async fn get_with_query<T>(
        &self,
        endpoint: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(endpoint, RequestOptions::get().with_query(query))
            .await?
            .into_result()
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, endpoint, body).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, endpoint, body).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PATCH, endpoint, body).await
    }

    pub async fn delete<T>(&self, endpoint: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(endpoint, RequestOptions::new(Method::DELETE))
            .await?
            .into_result()
    }

    async fn send_json<T, B>(&self, method: Method, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions {
            method,
            body: Some(serde_json::to_value(body)?),
            query: Vec::new(),
        };
        self.request(endpoint, options).await?.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_http(reqwest::Client::new(), base, Arc::new(NoToken))
    }

    #[test]
    fn url_joins_base_and_query() {
        let api = client("https://api.khadamat.ae/v1/");
        let url = api
            .url(
                "/maids",
                &[
                    ("nationality".to_string(), "PH".to_string()),
                    ("languages".to_string(), "en,ar".to_string()),
                ],
            )
            .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://api.khadamat.ae/v1/maids?nationality=PH&languages=en%2Car"
        );
    }

    #[test]
    fn url_rejects_relative_endpoints() {
        let api = client("https://api.khadamat.ae");
        assert!(matches!(
            api.url("maids", &[]),
            Err(ApiError::InvalidEndpoint(_))
        ));
    }
}
