use super::{INotifier, NotifierError, SendReceipt};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tapp_plus_domain::ReminderChannel;
use tracing::warn;

pub const NOTIFIER_KEY_HEADER: &str = "tapp-notifier-key";
/// Lets the gateway drop retries of a message it already accepted
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    channel: ReminderChannel,
    recipient: &'a str,
    message: &'a str,
    idempotency_key: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    provider_msg_id: String,
}

/// Posts reminders to an HTTP gateway that fans out to the actual email, sms
/// and push providers
pub struct WebhookNotifier {
    client: Client,
    url: String,
    key: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: String, key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            key,
        }
    }

    fn build_request(
        &self,
        channel: ReminderChannel,
        recipient: &str,
        message: &str,
        idempotency_key: &str,
    ) -> RequestBuilder {
        let body = SendRequest {
            channel,
            recipient,
            message,
            idempotency_key,
        };
        let mut req = self
            .client
            .post(&self.url)
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(&body);
        if let Some(key) = &self.key {
            req = req.header(NOTIFIER_KEY_HEADER, key);
        }
        req
    }
}

/// Rate limits, timeouts and server errors are worth retrying, any other
/// client error will fail again
fn classify_status(status: StatusCode) -> Option<bool> {
    if status.is_success() {
        return None;
    }
    let transient = status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS;
    Some(!transient)
}

#[async_trait::async_trait]
impl INotifier for WebhookNotifier {
    async fn send(
        &self,
        channel: ReminderChannel,
        recipient: &str,
        message: &str,
        idempotency_key: &str,
    ) -> Result<SendReceipt, NotifierError> {
        let res = self
            .build_request(channel, recipient, message, idempotency_key)
            .send()
            .await
            .map_err(|e| NotifierError::Transient(e.to_string()))?;

        let status = res.status();
        if let Some(permanent) = classify_status(status) {
            let text = res.text().await.unwrap_or_default();
            warn!("Notifier gateway responded with {}: {}", status, text);
            let error = format!("Gateway responded with {}", status);
            return Err(if permanent {
                NotifierError::Permanent(error)
            } else {
                NotifierError::Transient(error)
            });
        }

        let res = res
            .json::<SendResponse>()
            .await
            .map_err(|e| NotifierError::Transient(format!("Invalid gateway response: {}", e)))?;
        Ok(SendReceipt {
            provider_msg_id: res.provider_msg_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_gateway_statuses() {
        assert_eq!(classify_status(StatusCode::OK), None);
        assert_eq!(classify_status(StatusCode::BAD_REQUEST), Some(true));
        assert_eq!(classify_status(StatusCode::UNPROCESSABLE_ENTITY), Some(true));
        assert_eq!(classify_status(StatusCode::TOO_MANY_REQUESTS), Some(false));
        assert_eq!(classify_status(StatusCode::REQUEST_TIMEOUT), Some(false));
        assert_eq!(classify_status(StatusCode::BAD_GATEWAY), Some(false));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_transient() {
        // Nothing listens on the discard port
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/send".into(), None);
        let res = notifier
            .send(ReminderChannel::Email, "ada@example.com", "Hello", "key-1")
            .await;
        assert!(matches!(res, Err(NotifierError::Transient(_))));
    }

    #[test]
    fn request_carries_the_idempotency_key() {
        let notifier = WebhookNotifier::new(
            "http://localhost:9000/send".into(),
            Some("gateway-secret".into()),
        );
        let req = notifier
            .build_request(ReminderChannel::Sms, "+4712345678", "Hello", "key-1")
            .build()
            .expect("To build request");
        let headers = req.headers();
        assert_eq!(
            headers.get(IDEMPOTENCY_KEY_HEADER).and_then(|v| v.to_str().ok()),
            Some("key-1")
        );
        assert_eq!(
            headers.get(NOTIFIER_KEY_HEADER).and_then(|v| v.to_str().ok()),
            Some("gateway-secret")
        );
        let body = req
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| String::from_utf8_lossy(b).to_string())
            .unwrap_or_default();
        assert!(body.contains(r#""idempotencyKey":"key-1""#));
    }
}
