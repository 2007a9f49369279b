use std::path::Path;
use std::time::Duration;

use reqwest::multipart;

use crate::types::{ErrorBody, UploadResponse};
use crate::{ApiError, StatusReport, TaskId};

/// Backend base URL used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Connection settings for the backend API.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Thin typed client over the two backend endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submits the file at `path` as a multipart upload and returns the
    /// task handle the backend assigns to it.
    pub async fn upload_document(&self, path: &Path) -> Result<TaskId, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ApiError::File(format!("could not read {}: {err}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();

        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/api/upload_document", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the server-supplied detail; a malformed or missing
            // body degrades to the HTTP status line.
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail);
            return Err(ApiError::UploadRejected {
                status: status.as_u16(),
                message: detail.unwrap_or_else(|| status.to_string()),
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|err| ApiError::MalformedResponse(err.to_string()))?;
        match body.task_id {
            Some(id) if !id.is_empty() => Ok(TaskId::new(id)),
            _ => Err(ApiError::MissingTaskId),
        }
    }

    /// Fetches one validated status report for `task`.
    pub async fn task_status(&self, task: &TaskId) -> Result<StatusReport, ApiError> {
        let response = self
            .http
            .get(format!("{}/api/task_status/{task}", self.base_url))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        response
            .json::<StatusReport>()
            .await
            .map_err(|err| ApiError::MalformedResponse(err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Network(format!("request timed out: {err}"));
    }
    ApiError::Network(err.to_string())
}
