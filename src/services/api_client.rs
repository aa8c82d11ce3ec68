use std::future::Future;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::{
    AnalyzeRequest, ApiErrorBody, ComplexityReport, ProblemDraft, SignupRequest,
};

pub const ANALYZE_PATH: &str = "/analyze-complexity";
pub const PROBLEMS_PATH: &str = "/problems";
pub const SIGNUP_PATH: &str = "/auth/signup";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{}", rate_limit_message(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    #[error("Request failed ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Could not reach the server: {0}")]
    Network(String),

    #[error("Unexpected response from the server: {0}")]
    Decode(String),
}

fn rate_limit_message(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(seconds) => {
            format!("Too many requests. Please try again in {seconds} seconds.")
        }
        None => "Too many requests. Please wait a moment and try again.".to_string(),
    }
}

/// Maps a non-2xx status and its optional error body onto an [`ApiError`].
pub fn classify_error(
    status: u16,
    body: Option<ApiErrorBody>,
    header_retry_after: Option<u64>,
) -> ApiError {
    let body = body.unwrap_or_default();
    if status == StatusCode::TOO_MANY_REQUESTS.as_u16() {
        let retry_after = body
            .retry_after
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| secs.ceil() as u64)
            .or(header_retry_after);
        return ApiError::RateLimited { retry_after };
    }

    let message = body
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or("Unknown error")
                .to_string()
        });
    ApiError::Backend { status, message }
}

/// Anything able to carry an analysis request to the backend.
pub trait AnalysisTransport {
    fn analyze(
        &self,
        request: &AnalyzeRequest,
    ) -> impl Future<Output = Result<ComplexityReport, ApiError>> + Send;
}

/// JSON client for the platform backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("codearena/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(path, body).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn post_expect_success<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(path, body).await.map(|_| ())
    }

    async fn send<B>(&self, path: &str, body: &B) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                error!("POST {} failed: {}", url, err);
                ApiError::Network(err.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            info!("POST {} -> {}", url, status);
            return Ok(response);
        }

        let header_retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let body = response.json::<ApiErrorBody>().await.ok();
        let err = classify_error(status.as_u16(), body, header_retry_after);
        warn!("POST {} -> {}: {}", url, status, err);
        Err(err)
    }

    pub async fn create_problem(&self, draft: &ProblemDraft) -> Result<(), ApiError> {
        self.post_expect_success(PROBLEMS_PATH, draft).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        self.post_expect_success(SIGNUP_PATH, request).await
    }
}

impl AnalysisTransport for ApiClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<ComplexityReport, ApiError> {
        self.post_json(ANALYZE_PATH, request).await
    }
}
