use std::time::Duration;

use checker_core::{server_error_message, ClassificationResult, SelectedImage};
use checker_logging::{checker_debug, checker_warn};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::Url;

use crate::{FailureKind, SubmitError};

pub const CHECK_IMAGE_PATH: &str = "check-image";
pub const HEALTH_PATH: &str = "health";
const FILE_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    /// Base URL of the classification service, e.g. `http://127.0.0.1:8080`.
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_response_bytes: 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// Send one image to the classification endpoint.
    async fn submit(&self, image: &SelectedImage) -> Result<ClassificationResult, SubmitError>;

    /// Ask the service for its health status string.
    async fn health(&self) -> Result<String, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
    client: reqwest::Client,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn url_for(&self, path: &str) -> Result<Url, SubmitError> {
        let base = self.settings.endpoint.trim_end_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|err| SubmitError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, SubmitError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(&self, image: &SelectedImage) -> Result<ClassificationResult, SubmitError> {
        let url = self.url_for(CHECK_IMAGE_PATH)?;
        let bytes = tokio::fs::read(&image.path).await.map_err(|err| {
            SubmitError::new(
                FailureKind::Io,
                format!("Could not read {}: {err}", image.path.display()),
            )
        })?;
        checker_debug!(
            "POST {} file={} bytes={} type={}",
            url,
            image.file_name(),
            bytes.len(),
            image.media_type
        );

        let part = Part::bytes(bytes)
            .file_name(image.file_name())
            .mime_str(&image.media_type)
            .map_err(|err| SubmitError::new(FailureKind::Io, err.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // A body we cannot read is treated like one without a detail.
            let body = self.read_body(response).await.unwrap_or_default();
            let message = server_error_message(&body);
            checker_warn!("check-image returned {}: {}", status, message);
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let body = self.read_body(response).await?;
        ClassificationResult::from_json(&body).map_err(|err| {
            SubmitError::new(
                FailureKind::MalformedResponse,
                format!("Invalid response from server: {err}"),
            )
        })
    }

    async fn health(&self) -> Result<String, SubmitError> {
        let url = self.url_for(HEALTH_PATH)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = self.read_body(response).await?;
        let payload: Value = serde_json::from_slice(&body).map_err(|err| {
            SubmitError::new(FailureKind::MalformedResponse, err.to_string())
        })?;
        payload
            .get("status")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| SubmitError::new(FailureKind::MalformedResponse, "missing status"))
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> SubmitError {
    SubmitError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, err.to_string());
    }
    SubmitError::new(FailureKind::Network, err.to_string())
}
