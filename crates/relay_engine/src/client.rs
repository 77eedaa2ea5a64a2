use std::time::Duration;

use relay_logging::relay_warn;
use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;

use crate::{ResultEntry, StatusError, StatusReport, SubmitError, UploadBody, UploadPart};

/// Where and how to reach the remote agent service.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    /// Route accepting the multipart batch, relative to `base_url`.
    pub submit_route: String,
    /// Route answering status queries; the job id is appended as a path segment.
    pub status_route: String,
    pub connect_timeout: Duration,
    /// Per-request ceiling; a slow status query fails transiently and the
    /// poll loop carries on.
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.know360.io/finance_agent".to_string(),
            submit_route: "process-invoices-batch/".to_string(),
            status_route: "job-status".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait::async_trait]
pub trait AgentClient: Send + Sync {
    /// Bundles all parts into one request and returns the assigned job id.
    async fn submit_batch(&self, parts: &[UploadPart]) -> Result<String, SubmitError>;

    /// One status query for a previously submitted job.
    async fn job_status(&self, remote_id: &str) -> Result<StatusReport, StatusError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAgentClient {
    settings: ServiceSettings,
}

impl ReqwestAgentClient {
    pub fn new(settings: ServiceSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
    }

    fn endpoint(&self, route: &str) -> Result<reqwest::Url, url::ParseError> {
        let joined = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), route);
        reqwest::Url::parse(&joined)
    }
}

#[async_trait::async_trait]
impl AgentClient for ReqwestAgentClient {
    async fn submit_batch(&self, parts: &[UploadPart]) -> Result<String, SubmitError> {
        let endpoint = self
            .endpoint(&self.settings.submit_route)
            .map_err(|err| SubmitError::InvalidUrl(err.to_string()))?;
        let client = self
            .build_client()
            .map_err(|err| SubmitError::Network(err.to_string()))?;

        let mut form = multipart::Form::new();
        for part in parts {
            let piece = match &part.body {
                UploadBody::Bytes(bytes) => multipart::Part::bytes(bytes.to_vec()),
                UploadBody::Text(text) => multipart::Part::text(text.clone()),
            }
            .file_name(part.display_name.clone());
            form = form.part("files", piece);
        }

        let response = client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_submit_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        #[derive(Deserialize)]
        struct SubmitResponse {
            job_id: String,
        }
        let parsed: SubmitResponse = response
            .json()
            .await
            .map_err(|err| SubmitError::InvalidResponse(err.to_string()))?;
        Ok(parsed.job_id)
    }

    async fn job_status(&self, remote_id: &str) -> Result<StatusReport, StatusError> {
        let route = format!(
            "{}/{}",
            self.settings.status_route.trim_end_matches('/'),
            remote_id
        );
        let endpoint = self
            .endpoint(&route)
            .map_err(|err| StatusError::InvalidUrl(err.to_string()))?;
        let client = self
            .build_client()
            .map_err(|err| StatusError::Network(err.to_string()))?;

        let response = client.get(endpoint).send().await.map_err(map_status_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatusError::HttpStatus(status.as_u16()));
        }

        let raw: RawStatus = response
            .json()
            .await
            .map_err(|err| StatusError::InvalidResponse(err.to_string()))?;
        parse_status(raw)
    }
}

fn map_submit_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::Timeout;
    }
    SubmitError::Network(err.to_string())
}

fn map_status_error(err: reqwest::Error) -> StatusError {
    if err.is_timeout() {
        return StatusError::Timeout;
    }
    StatusError::Network(err.to_string())
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    error: Option<String>,
    status: Option<String>,
    progress: Option<f64>,
    result: Option<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    categorized_data: Option<Vec<Value>>,
}

/// Maps the loosely-typed status body onto `StatusReport`. An explicit error
/// field wins over whatever `status` says.
fn parse_status(raw: RawStatus) -> Result<StatusReport, StatusError> {
    if let Some(message) = raw.error {
        return Ok(StatusReport::ServiceError { message });
    }
    match raw.status.as_deref() {
        Some("completed") => {
            let entries = raw
                .result
                .and_then(|result| result.categorized_data)
                .unwrap_or_default();
            Ok(StatusReport::Completed {
                entries: entries.into_iter().filter_map(parse_entry).collect(),
            })
        }
        Some("failed") => Ok(StatusReport::Failed { message: None }),
        Some("pending") | Some("processing") => Ok(StatusReport::InProgress {
            progress: raw.progress.map(|value| value.clamp(0.0, 100.0) as u8),
        }),
        other => Err(StatusError::InvalidResponse(format!(
            "unknown status {other:?}"
        ))),
    }
}

/// The identity key varies in casing across the service's agents.
const FILE_NAME_KEYS: &[&str] = &["FileName", "file_name", "fileName"];

fn parse_entry(fields: Value) -> Option<ResultEntry> {
    let file_name = FILE_NAME_KEYS
        .iter()
        .find_map(|key| fields.get(key).and_then(Value::as_str).map(str::to_string));
    match file_name {
        Some(file_name) => Some(ResultEntry { file_name, fields }),
        None => {
            relay_warn!("Dropping result entry without a file name field");
            None
        }
    }
}
