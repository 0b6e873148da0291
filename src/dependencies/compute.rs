use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, header::CONTENT_LENGTH};
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use crate::{
    config::{ComputeConfig, Credentials},
    error::TransportError,
    models::{AttachRequest, Operation},
};

/// Long-polling `operations.wait` returns after at most two minutes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(150);

/// Dependency that sends attach requests and follows the resulting operation.
#[async_trait]
pub trait InstanceDiskAttacher {
    /// Send `instances.attachDisk` and return the operation it started.
    async fn attach_disk(&self, request: &AttachRequest) -> Result<Operation, TransportError>;

    /// Block until the operation is `DONE`. A finished operation carrying errors fails.
    async fn wait_for_operation(
        &self,
        operation: Operation,
        project: &str,
        zone: &str,
    ) -> Result<Operation, TransportError>;
}

/// Compute API client over HTTPS.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl ComputeClient {
    pub fn new(config: ComputeConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("compute-cli/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            credentials: config.credentials,
        })
    }

    fn attach_disk_url(&self, request: &AttachRequest) -> Result<Url, TransportError> {
        let mut url = self.endpoint([
            "projects",
            request.project.as_str(),
            "zones",
            request.zone.as_str(),
            "instances",
            request.instance.as_str(),
            "attachDisk",
        ])?;

        if let Some(force_attach) = request.force_attach {
            url.query_pairs_mut()
                .append_pair("forceAttach", &force_attach.to_string());
        }

        Ok(url)
    }

    fn wait_operation_url(
        &self,
        operation: &str,
        project: &str,
        zone: &str,
    ) -> Result<Url, TransportError> {
        self.endpoint([
            "projects", project, "zones", zone, "operations", operation, "wait",
        ])
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn access_token(&self) -> Result<String, TransportError> {
        match &self.credentials {
            Credentials::AccessToken(token) => Ok(token.clone()),
            Credentials::AccessTokenFile(path) => {
                let token = tokio::fs::read_to_string(path)
                    .await
                    .map_err(TransportError::Credentials)?;
                match token.trim() {
                    "" => Err(TransportError::MissingCredentials),
                    token => Ok(token.to_string()),
                }
            }
            Credentials::None => Err(TransportError::MissingCredentials),
        }
    }

    /// Authorize and send a request that returns an operation.
    async fn send(&self, request: RequestBuilder) -> Result<Operation, TransportError> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(api_error(status, &body));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl InstanceDiskAttacher for ComputeClient {
    async fn attach_disk(&self, request: &AttachRequest) -> Result<Operation, TransportError> {
        let url = self.attach_disk_url(request)?;
        debug!(%url, "sending attach disk request");

        let operation = self
            .send(self.http.post(url).json(&request.attached_disk))
            .await?;
        debug!(name = %operation.name, status = ?operation.status, "operation started");

        Ok(operation)
    }

    async fn wait_for_operation(
        &self,
        operation: Operation,
        project: &str,
        zone: &str,
    ) -> Result<Operation, TransportError> {
        let mut operation = operation;

        while !operation.is_done() {
            trace!(name = %operation.name, status = ?operation.status, "waiting for operation");
            let url = self.wait_operation_url(&operation.name, project, zone)?;
            operation = self
                .send(self.http.post(url).header(CONTENT_LENGTH, 0))
                .await?;
        }

        let operation = finished_operation(operation)?;
        debug!(name = %operation.name, "operation done");
        Ok(operation)
    }
}

/// A `DONE` operation carrying errors is a failure.
fn finished_operation(operation: Operation) -> Result<Operation, TransportError> {
    let errors = operation.error_messages();
    if errors.is_empty() {
        Ok(operation)
    } else {
        Err(TransportError::OperationFailed {
            name: operation.name,
            errors,
        })
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Decode the Google API error envelope, falling back to the raw body.
fn api_error(status: StatusCode, body: &str) -> TransportError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    TransportError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use mockall::mock;

    mock! {
        pub ComputeApi {}

        #[async_trait]
        impl InstanceDiskAttacher for ComputeApi {
            async fn attach_disk(&self, request: &AttachRequest) -> Result<Operation, TransportError>;
            async fn wait_for_operation(&self, operation: Operation, project: &str, zone: &str) -> Result<Operation, TransportError>;
        }
    }
}
