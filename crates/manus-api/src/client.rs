//! HTTP implementation of [`Backend`]
//!
//! Thin reqwest wrapper: build the request, read the body, hand it to
//! [`protocol::parse_envelope`]. HTTP status codes alone never decide
//! success; the JSON envelope does. Only a body that is not JSON falls back
//! to reporting the HTTP status.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use tokio::io::AsyncWriteExt;
use url::Url;

use manus_core::prelude::*;
use manus_core::{ProjectStructure, SessionId, StagedFile};

use crate::backend::Backend;
use crate::contract::{AnalysisContract, TaskRequest, TaskSubmission};
use crate::protocol::{
    self, decode, FileContent, HealthReport, SessionFilesResponse, StatusResponse,
    UploadResponse, STATUS_SUCCESS,
};

/// Characters left alone by a URI component encoder
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Connection settings for [`HttpBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub base_url: String,
    pub contract: AnalysisContract,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            contract: AnalysisContract::default(),
            request_timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    contract: AnalysisContract,
}

impl HttpBackend {
    pub fn new(config: &HttpBackendConfig) -> Result<Self> {
        let mut raw = config.base_url.trim().to_string();
        // Url::join replaces the last segment unless the base ends in '/'
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)
            .map_err(|e| Error::config(format!("invalid server URL '{}': {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("manus-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            contract: config.contract,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn contract(&self) -> AnalysisContract {
        self.contract
    }

    /// Resolve an API path against the base URL
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::config(format!("invalid endpoint '{}': {}", path, e)))
    }

    fn session_endpoint(&self, prefix: &str, session_id: &SessionId, suffix: &str) -> Result<Url> {
        self.endpoint(&format!(
            "{}/{}{}",
            prefix,
            encode_component(session_id.as_str()),
            suffix
        ))
    }
}

/// Percent-encode a value for use as a single path segment
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::transport("request timed out")
    } else if e.is_connect() {
        Error::transport(format!("cannot connect to server: {}", e))
    } else {
        Error::transport(e.to_string())
    }
}

/// Read a response body and validate its envelope
async fn read_envelope(response: Response, success_marker: &str, fallback: &str) -> Result<serde_json::Value> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    match protocol::parse_envelope(&body, success_marker, fallback) {
        Err(Error::Protocol { .. }) if !status.is_success() => Err(Error::http(
            status.as_u16(),
            status.canonical_reason().unwrap_or("request failed"),
        )),
        other => other,
    }
}

async fn file_part(file: &StagedFile) -> Result<Part> {
    let handle = tokio::fs::File::open(&file.path).await?;
    let length = handle.metadata().await?.len();
    Ok(Part::stream_with_length(Body::from(handle), length).file_name(file.name.clone()))
}

impl Backend for HttpBackend {
    async fn upload(&self, files: &[StagedFile]) -> Result<UploadResponse> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file_part(file).await?);
        }

        let url = self.endpoint("api/upload")?;
        debug!("POST {} ({} files)", url, files.len());
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        decode(read_envelope(response, STATUS_SUCCESS, "Upload failed").await?)
    }

    async fn submit_task(
        &self,
        session_id: &SessionId,
        description: &str,
    ) -> Result<TaskSubmission> {
        let url = self.endpoint(self.contract.endpoint())?;
        debug!("POST {} (contract: {})", url, self.contract);
        let response = self
            .client
            .post(url)
            .json(&TaskRequest {
                session_id: session_id.as_str(),
                task_description: description,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let envelope = read_envelope(response, STATUS_SUCCESS, "Analysis failed to start").await?;
        self.contract.interpret(envelope)
    }

    async fn analysis_status(&self, session_id: &SessionId) -> Result<StatusResponse> {
        let url = self.session_endpoint("api/status", session_id, "")?;
        trace!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        decode(read_envelope(response, STATUS_SUCCESS, "Failed to get analysis status").await?)
    }

    async fn session_files(&self, session_id: &SessionId) -> Result<ProjectStructure> {
        let url = self.session_endpoint("api/sessions", session_id, "/files")?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        let files: SessionFilesResponse =
            decode(read_envelope(response, STATUS_SUCCESS, "Failed to load files").await?)?;
        Ok(files.project_structure)
    }

    async fn file_content(&self, session_id: &SessionId, path: &str) -> Result<FileContent> {
        let suffix = format!("/file/{}", encode_component(path));
        let url = self.session_endpoint("api/sessions", session_id, &suffix)?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        decode(read_envelope(response, STATUS_SUCCESS, "Failed to load file content").await?)
    }

    async fn download(&self, session_id: &SessionId, dest: &Path) -> Result<u64> {
        let url = self.session_endpoint("api/download", session_id, "")?;
        debug!("GET {} -> {}", url, dest.display());
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(value) => Error::backend(protocol::failure_message(&value, "Download failed")),
                Err(_) => Error::http(
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("download failed"),
                ),
            });
        }

        let written = match stream_to_file(response, dest).await {
            Ok(written) => written,
            Err(e) => {
                // Never leave a truncated archive behind
                let _ = tokio::fs::remove_file(dest).await;
                return Err(e);
            }
        };
        info!("Downloaded {} bytes to {}", written, dest.display());
        Ok(written)
    }

    async fn health(&self) -> Result<HealthReport> {
        let url = self.endpoint("api/health")?;
        trace!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&body).map_err(|_| {
            Error::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unexpected health response"),
            )
        })
    }
}

async fn stream_to_file(response: Response, dest: &Path) -> Result<u64> {
    let mut out = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(transport_error)?;
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    Ok(written)
}
