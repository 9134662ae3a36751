use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::ApiError;

/// Wire shape every endpoint answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Decoded envelope: callers cannot reach `data` without matching on success.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    Ok(T),
    Err { message: String },
}

pub(crate) const FALLBACK_ERROR: &str = "Something went wrong. Please try again.";

impl<T> Envelope<T>
where
    T: DeserializeOwned,
{
    pub fn into_reply(self) -> Result<ApiReply<T>, ApiError> {
        if !self.success {
            let message = self
                .error
                .or(self.message)
                .unwrap_or_else(|| FALLBACK_ERROR.to_string());
            return Ok(ApiReply::Err { message });
        }

        match self.data {
            Some(data) => Ok(ApiReply::Ok(data)),
            // Endpoints without a payload decode into `()` or `Option<_>`.
            None => serde_json::from_value(Value::Null)
                .map(ApiReply::Ok)
                .map_err(|_| ApiError::MissingData),
        }
    }
}

impl<T> ApiReply<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiReply::Ok(_))
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiReply::Ok(data) => Ok(data),
            ApiReply::Err { message } => Err(ApiError::Rejected {
                status: None,
                message,
            }),
        }
    }
}

/// Pulls the best human-readable message out of an error body.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode<T: DeserializeOwned>(value: serde_json::Value) -> ApiReply<T> {
        let envelope: Envelope<T> = serde_json::from_value(value).expect("envelope decodes");
        envelope.into_reply().expect("reply builds")
    }

    #[test]
    fn failure_prefers_error_then_message() {
        let reply: ApiReply<u32> = decode(json!({
            "success": false,
            "error": "Maid not found",
            "message": "ignored"
        }));
        assert_eq!(
            reply,
            ApiReply::Err {
                message: "Maid not found".to_string()
            }
        );

        let reply: ApiReply<u32> = decode(json!({ "success": false, "message": "Try later" }));
        assert_eq!(
            reply,
            ApiReply::Err {
                message: "Try later".to_string()
            }
        );

        let reply: ApiReply<u32> = decode(json!({ "success": false }));
        assert_eq!(
            reply,
            ApiReply::Err {
                message: FALLBACK_ERROR.to_string()
            }
        );
    }

    #[test]
    fn missing_data_is_only_fine_for_unit_payloads() {
        let unit: ApiReply<()> = decode(json!({ "success": true }));
        assert!(unit.is_ok());

        let envelope: Envelope<u32> =
            serde_json::from_value(json!({ "success": true })).expect("decodes");
        assert!(matches!(envelope.into_reply(), Err(ApiError::MissingData)));
    }

    #[test]
    fn payloads_without_a_default_decode() {
        #[derive(Debug, PartialEq, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Receipt {
            payment_id: String,
        }

        let reply: ApiReply<Receipt> = decode(json!({
            "success": true,
            "data": { "paymentId": "pay-1" }
        }));
        assert_eq!(
            reply,
            ApiReply::Ok(Receipt {
                payment_id: "pay-1".to_string()
            })
        );

        let envelope: Envelope<Receipt> =
            serde_json::from_slice(br#"{"success":true}"#).expect("missing data decodes");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn error_message_ignores_blank_and_non_json_bodies() {
        assert_eq!(
            error_message(br#"{"error":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(error_message(br#"{"error":"  "}"#), None);
        assert_eq!(error_message(b"<html>502</html>"), None);
    }
}
