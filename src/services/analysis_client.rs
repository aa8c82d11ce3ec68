use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::{AnalyzeRequest, ComplexityReport};
use crate::services::api_client::{AnalysisTransport, ApiError};
use crate::services::request_throttle::RequestThrottle;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Please enter some code to analyze.")]
    EmptyCode,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AnalysisError {
    /// Text shown in the analyzer panel.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::EmptyCode => self.to_string(),
            AnalysisError::Api(err @ ApiError::RateLimited { .. }) => err.to_string(),
            AnalysisError::Api(err) => format!("Failed to analyze code complexity. {err}"),
        }
    }
}

/// Sends analysis requests through `T`, never faster than its throttle allows.
pub struct ComplexityAnalyzer<T> {
    transport: T,
    throttle: RequestThrottle,
}

impl<T: AnalysisTransport> ComplexityAnalyzer<T> {
    pub fn new(transport: T, throttle: RequestThrottle) -> Self {
        Self {
            transport,
            throttle,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn analyze(
        &mut self,
        request: &AnalyzeRequest,
    ) -> Result<ComplexityReport, AnalysisError> {
        if request.code.trim().is_empty() {
            warn!("Rejecting analysis request with blank code");
            return Err(AnalysisError::EmptyCode);
        }

        self.throttle.acquire().await;
        info!(
            "Sending complexity analysis: language={}, code_len={}",
            request.language,
            request.code.len()
        );

        match self.transport.analyze(request).await {
            Ok(report) => {
                info!(
                    "Analysis finished: time={}, space={}",
                    report.time_complexity, report.space_complexity
                );
                Ok(report)
            }
            Err(err) => {
                error!("Analysis failed: {}", err);
                Err(AnalysisError::Api(err))
            }
        }
    }
}
