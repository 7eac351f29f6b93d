use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::filename::filename_from_disposition;
use crate::layout::{LayoutTransform, PreserveLayout};
use crate::{
    AccessibilityResult, BackendInfo, BackendSettings, ClientError, ConversionOutput, EngineEvent,
    Stage, SubmissionId, CHECK_TRANSPORT_MESSAGE,
};

const DOWNLOAD_TOKEN_HEADER: &str = "x-download-token";
const EXPIRES_IN_HEADER: &str = "x-expires-in";

pub trait ProgressSink: Send + Sync {
    fn emit(&self, stage: Stage);
}

/// Forwards conversion stages of one submission to the engine event channel.
pub struct ChannelProgressSink {
    submission: SubmissionId,
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(submission: SubmissionId, tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { submission, tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, stage: Stage) {
        let _ = self.tx.send(EngineEvent::Progress {
            submission: self.submission,
            stage,
        });
    }
}

/// The calls the UI makes against the conversion backend.
#[async_trait::async_trait]
pub trait BackendClient: Send + Sync {
    /// `GET /`: reports the backend name and version.
    async fn health(&self) -> Result<BackendInfo, ClientError>;

    /// `POST /check-url`: never fails, every outcome is folded into the result.
    async fn check_accessible(&self, url: &str) -> AccessibilityResult;

    /// `POST /convert`: returns the rendered PDF.
    async fn convert(
        &self,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<ConversionOutput, ClientError>;
}

#[derive(Serialize)]
struct UrlRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ErrorPayload {
    detail: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    base_url: Url,
    client: reqwest::Client,
    layout: Arc<dyn LayoutTransform>,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, ClientError> {
        Self::with_layout(settings, Arc::new(PreserveLayout))
    }

    pub fn with_layout(
        settings: BackendSettings,
        layout: Arc<dyn LayoutTransform>,
    ) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Ok(Self {
            settings,
            base_url,
            client,
            layout,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))
    }

    async fn post_url(
        &self,
        path: &str,
        url: &str,
        timeout: Duration,
    ) -> Result<reqwest::Response, ClientError> {
        let endpoint = self.endpoint(path)?;
        let body = serde_json::to_vec(&UrlRequest { url })
            .map_err(|err| ClientError::InvalidResponse(err.to_string()))?;
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await
    }

    async fn read_body(
        &self,
        response: reqwest::Response,
        sink: &dyn ProgressSink,
    ) -> Result<Bytes, ClientError> {
        let max_bytes = self.settings.max_pdf_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ClientError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        let mut generating = false;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if !generating {
                sink.emit(Stage::Generating);
                generating = true;
            }
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ClientError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(body))
    }
}

#[async_trait::async_trait]
impl BackendClient for ReqwestBackend {
    async fn health(&self) -> Result<BackendInfo, ClientError> {
        let endpoint = self.endpoint("")?;
        let response = self
            .client
            .get(endpoint)
            .timeout(self.settings.check_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| ClientError::InvalidResponse(err.to_string()))
    }

    async fn check_accessible(&self, url: &str) -> AccessibilityResult {
        match self
            .post_url("check-url", url, self.settings.check_timeout)
            .await
        {
            Ok(_) => {
                engine_debug!("check-url accepted {}", url);
                AccessibilityResult::accessible()
            }
            Err(ClientError::Rejected { status, detail }) => {
                engine_info!("check-url rejected {} with status {}", url, status);
                AccessibilityResult {
                    accessible: false,
                    error: detail,
                }
            }
            Err(err) => {
                engine_warn!("check-url failed for {}: {}", url, err);
                AccessibilityResult::rejected(CHECK_TRANSPORT_MESSAGE)
            }
        }
    }

    async fn convert(
        &self,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<ConversionOutput, ClientError> {
        sink.emit(Stage::Fetching);
        let response = self
            .post_url("convert", url, self.settings.convert_timeout)
            .await?;
        sink.emit(Stage::Processing);

        let headers = response.headers().clone();
        let body = self.read_body(response, sink).await?;
        let bytes = self.layout.apply(body);

        let output = ConversionOutput {
            filename: filename_from_disposition(header_str(&headers, CONTENT_DISPOSITION.as_str())),
            content_type: header_str(&headers, CONTENT_TYPE.as_str()).map(str::to_owned),
            download_token: header_str(&headers, DOWNLOAD_TOKEN_HEADER).map(str::to_owned),
            expires_in: header_str(&headers, EXPIRES_IN_HEADER).map(str::to_owned),
            source_url: url.to_string(),
            bytes,
        };
        engine_info!(
            "converted {} into {} ({} bytes)",
            url,
            output.filename,
            output.bytes.len()
        );
        Ok(output)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut base =
        Url::parse(raw.trim()).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl(format!(
            "unsupported scheme {}",
            base.scheme()
        )));
    }
    // Endpoints are joined relative to the base path.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // An unreadable error body is treated like one without a detail.
    let body = response.bytes().await.unwrap_or_default();
    Err(ClientError::Rejected {
        status: status.as_u16(),
        detail: extract_detail(&body),
    })
}

/// Reads the string `detail` of an error payload; other shapes yield `None`.
fn extract_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorPayload>(body)
        .ok()?
        .detail?
        .as_str()
        .filter(|detail| !detail.is_empty())
        .map(str::to_owned)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::Timeout(err.to_string());
    }
    ClientError::Network(err.to_string())
}
