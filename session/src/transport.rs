//! HTTP client for the analysis webhook.

use std::time::Duration;

use serde_json::json;

use crate::config::WebhookConfig;
use crate::error::{Result, SessionError};
use crate::session::AnalysisSession;

const USER_AGENT: &str = concat!("coach-analysis/", env!("CARGO_PKG_VERSION"));

/// Requests analyses from the webhook.
///
/// Each call POSTs `{"clientId": "<id>"}` and returns the response body as
/// text, whatever its shape; turning it into a record is the normalizer's
/// job.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http_client: reqwest::Client,
    webhook_url: String,
}

impl AnalysisClient {
    /// Builds a client for the configured webhook.
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            webhook_url: config.url.clone(),
        })
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// Requests an analysis for `client_id` and returns the raw body.
    ///
    /// # Errors
    ///
    /// [`Transport`](SessionError::Transport) when the request cannot be sent
    /// or the body cannot be read, [`ServiceStatus`](SessionError::ServiceStatus)
    /// for a non-success status.
    pub async fn request_analysis(&self, client_id: &str) -> Result<String> {
        tracing::debug!(client = %client_id, url = %self.webhook_url, "requesting analysis");

        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&json!({ "clientId": client_id }))
            .send()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                client = %client_id,
                status = status.as_u16(),
                "analysis request failed"
            );
            return Err(SessionError::ServiceStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        tracing::info!(client = %client_id, bytes = body.len(), "analysis received");
        Ok(body)
    }

    /// Requests a fresh analysis and loads it into `session`.
    ///
    /// The request is tokened, so a response that arrives after a newer
    /// request was issued on the same session is dropped. Returns whether the
    /// response was applied. On error the session is left as it was.
    pub async fn refresh(&self, session: &mut AnalysisSession, client_id: &str) -> Result<bool> {
        let token = session.begin_request();
        let body = self.request_analysis(client_id).await?;
        Ok(session.apply_response(token, Some(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AnalysisClient {
        AnalysisClient::new(&WebhookConfig {
            url: format!("{}/webhook/analyze-client", server.uri()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_posts_client_id_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook/analyze-client"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "clientId": "C002" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "On Track",
                "confidence": 88
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server).request_analysis("C002").await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["confidence"], 88);
    }

    #[tokio::test]
    async fn test_error_status_is_service_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("workflow crashed"))
            .mount(&server)
            .await;

        let err = client_for(&server).request_analysis("C001").await.unwrap_err();
        assert!(err.is_request_failure());
        match err {
            SessionError::ServiceStatus { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "workflow crashed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_transport_error() {
        let client = AnalysisClient::new(&WebhookConfig {
            url: "http://127.0.0.1:9/webhook".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let err = client.request_analysis("C001").await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
    }

    #[tokio::test]
    async fn test_refresh_loads_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("Status: Yellow\nReasoning: Sleep dipped this week."),
            )
            .mount(&server)
            .await;

        let mut session = AnalysisSession::for_client("C004");
        let applied = client_for(&server)
            .refresh(&mut session, "C004")
            .await
            .unwrap();
        assert!(applied);
        let analysis = session.display().unwrap();
        assert_eq!(analysis.status, "Yellow");
        assert_eq!(analysis.reasoning, "Sleep dipped this week.");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_current_analysis() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut session = AnalysisSession::for_client("C001");
        session.load(Some(r#"{"status":"Green"}"#.to_string()));
        assert!(client_for(&server).refresh(&mut session, "C001").await.is_err());
        assert_eq!(session.display().unwrap().status, "Green");
    }
}
