use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::TrendingConfig;
use crate::query::QueryPayload;

const USER_AGENT: &str = "catchup-github-trending";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("ClientBuild: {source}")]
    ClientBuild { source: reqwest::Error },

    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("Status: {status}: {body}")]
    Status { status: u16, body: String },
}

/// Sends one query payload and returns the raw response body.
///
/// Dropping the returned future abandons the request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, payload: &QueryPayload) -> Result<String, TransportError>;
}

/// [`Transport`] over reqwest, POSTing to the configured GraphQL endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &TrendingConfig, token: Option<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|source| TransportError::ClientBuild { source })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, payload: &QueryPayload) -> Result<String, TransportError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, QueryPayload::CONTENT_TYPE)
            .json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| TransportError::RequestSend { source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| TransportError::ResponseRead { source })?;

        debug!(status = status.as_u16(), bytes = body.len(), "graphql response received");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
