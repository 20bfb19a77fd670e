//! Webhook client.
//!
//! [`ReplySource`] is the seam between the turn driver and the network: it
//! opens the reply stream for one turn. [`WebhookClient`] is the HTTP
//! implementation.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use mutumwa_core::Domain;
use mutumwa_streaming::ReplyStream;
use reqwest::Client;

use crate::config::WebhookConfig;
use crate::error::{WebhookError, WebhookResult};
use crate::request::TurnRequest;

/// Raw reply body: the response bytes as they arrive.
pub type ReplyBody = BoxStream<'static, Result<Bytes, std::io::Error>>;

/// A reply stream for one turn.
pub type WebhookReplyStream = ReplyStream<ReplyBody>;

/// Something that can answer a turn with a streamed reply.
#[async_trait]
pub trait ReplySource: Send + Sync {
    /// Send the turn and return the reply stream once the response has
    /// started. Fails if the request cannot be sent or is rejected.
    async fn open(&self, domain: &Domain, request: &TurnRequest) -> WebhookResult<WebhookReplyStream>;
}

/// HTTP client for chat webhooks.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    config: WebhookConfig,
}

impl WebhookClient {
    /// Create a client from configuration.
    pub fn new(config: WebhookConfig) -> WebhookResult<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| WebhookError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a client with an existing `reqwest` client.
    pub fn with_client(client: Client, config: WebhookConfig) -> Self {
        Self { client, config }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// Look up a domain in the configured registry.
    pub fn domain(&self, value: &str) -> WebhookResult<&Domain> {
        Ok(self.config.domains.get(value)?)
    }
}

#[async_trait]
impl ReplySource for WebhookClient {
    async fn open(&self, domain: &Domain, request: &TurnRequest) -> WebhookResult<WebhookReplyStream> {
        let timeout = self.config.timeout();

        tracing::info!(
            domain = %domain.value,
            session_id = %request.session_id,
            language = %request.target_language,
            "sending turn to webhook"
        );

        let response = self
            .client
            .post(domain.webhook_url.clone())
            .timeout(timeout)
            .multipart(request.to_form())
            .send()
            .await
            .map_err(|e| WebhookError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "webhook rejected turn");
            return Err(WebhookError::http(status.as_u16(), body));
        }

        let body: ReplyBody = response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed();

        Ok(ReplyStream::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutumwa_core::{DomainRegistry, Language, SessionId, UserId};
    use mutumwa_streaming::MessageUpdate;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn turn(text: &str) -> TurnRequest {
        TurnRequest::new(
            text,
            Language::new("shona"),
            SessionId::from("s-1"),
            UserId::from("u-1"),
        )
        .unwrap()
    }

    fn client_for(server: &MockServer) -> WebhookClient {
        let config = WebhookConfig::default()
            .with_webhook_base(&format!("{}/webhook", server.uri()))
            .unwrap();
        WebhookClient::new(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = WebhookClient::new(WebhookConfig::default()).unwrap();
        assert_eq!(client.domain("zesa").unwrap().label, "ZESA");
        assert!(matches!(client.domain("nope"), Err(WebhookError::Core(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = WebhookConfig {
            timeout_seconds: 0,
            ..WebhookConfig::default()
        };
        assert!(WebhookClient::new(config).is_err());
    }

    #[tokio::test]
    async fn test_open_posts_multipart_and_streams_reply() {
        let server = MockServer::start().await;
        let body = concat!(
            "{\"type\":\"begin\"}\n",
            "{\"type\":\"item\",\"content\":\"Mhoro\"}\n",
            "{\"type\":\"item\",\"content\":\"{\\\"output\\\":\\\"Mhoro, makadii?\\\"}\"}\n",
            "{\"type\":\"end\"}\n",
        );

        Mock::given(method("POST"))
            .and(path("/webhook/general"))
            .and(body_string_contains("name=\"targetLanguage\""))
            .and(body_string_contains("shona"))
            .and(body_string_contains("name=\"sessionId\""))
            .and(body_string_contains("name=\"userId\""))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let domain = client.domain("general").unwrap().clone();
        let replies = client.open(&domain, &turn("Hi")).await.unwrap();

        let updates: Vec<MessageUpdate> = replies.map(|u| u.unwrap()).collect().await;
        assert_eq!(updates.len(), 4);
        assert_eq!(updates[2].text(), Some("Mhoro, makadii?"));
        assert!(updates[3].is_final());
    }

    #[tokio::test]
    async fn test_open_routes_to_selected_domain() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook/zesa"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let domain = client.domain("zesa").unwrap().clone();
        let replies = client.open(&domain, &turn("tokens?")).await.unwrap();
        let updates: Vec<_> = replies.collect().await;
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("workflow crashed"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let domain = client.domain("general").unwrap().clone();
        let err = client.open(&domain, &turn("Hi")).await.unwrap_err();

        match err {
            WebhookError::Http { status, ref body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "workflow crashed");
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_webhook_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let config = WebhookConfig::default()
            .with_webhook_base(&format!("{}/webhook", server.uri()))
            .unwrap()
            .with_timeout(Duration::from_secs(1));
        let client = WebhookClient::new(config).unwrap();
        let domain = client.domain("general").unwrap().clone();

        let err = client.open(&domain, &turn("Hi")).await.unwrap_err();
        assert!(matches!(err, WebhookError::Timeout(d) if d == Duration::from_secs(1)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_registry_without_server_is_connection_error() {
        let domains = DomainRegistry::builtin("http://127.0.0.1:9/webhook").unwrap();
        let client = WebhookClient::new(WebhookConfig::default().with_domains(domains)).unwrap();
        let domain = client.domain("general").unwrap().clone();

        let err = client.open(&domain, &turn("Hi")).await.unwrap_err();
        assert!(err.is_transport());
    }
}
