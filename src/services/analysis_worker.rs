use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{info, warn};

use crate::models::{AnalyzeRequest, ComplexityReport, Sample};
use crate::services::analysis_client::ComplexityAnalyzer;
use crate::services::api_client::AnalysisTransport;
use crate::services::sample_generator;

#[derive(Debug)]
pub enum AnalysisEvent {
    Started,
    Finished {
        report: ComplexityReport,
        samples: Vec<Sample>,
    },
    Failed {
        message: String,
    },
}

/// UI-side handle to the background analysis thread.
pub struct AnalysisWorker {
    jobs: Sender<AnalyzeRequest>,
    events: Receiver<AnalysisEvent>,
}

impl AnalysisWorker {
    /// Queues a request. Returns `false` when the worker thread is gone.
    pub fn submit(&self, request: AnalyzeRequest) -> bool {
        self.jobs.send(request).is_ok()
    }

    pub fn events(&self) -> &Receiver<AnalysisEvent> {
        &self.events
    }
}

/// Runs `analyzer` on its own thread; requests are handled one at a time.
pub fn spawn_analysis_worker<T>(mut analyzer: ComplexityAnalyzer<T>) -> AnalysisWorker
where
    T: AnalysisTransport + Send + 'static,
{
    let (job_tx, job_rx) = mpsc::channel::<AnalyzeRequest>();
    let (tx, rx) = mpsc::channel::<AnalysisEvent>();

    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                let _ = tx.send(AnalysisEvent::Failed {
                    message: format!("failed to initialize analysis runtime: {err}"),
                });
                return;
            }
        };

        while let Ok(request) = job_rx.recv() {
            let _ = tx.send(AnalysisEvent::Started);
            let event = match runtime.block_on(analyzer.analyze(&request)) {
                Ok(report) => {
                    let samples = sample_generator::generate_samples(&report.time_complexity);
                    AnalysisEvent::Finished { report, samples }
                }
                Err(err) => AnalysisEvent::Failed {
                    message: err.user_message(),
                },
            };
            if tx.send(event).is_err() {
                warn!("Analysis event receiver dropped, stopping worker");
                break;
            }
        }

        info!("Analysis worker stopped");
    });

    AnalysisWorker {
        jobs: job_tx,
        events: rx,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::services::api_client::ApiError;
    use crate::services::request_throttle::RequestThrottle;

    struct StaticTransport(Result<ComplexityReport, ApiError>);

    impl AnalysisTransport for StaticTransport {
        async fn analyze(&self, _request: &AnalyzeRequest) -> Result<ComplexityReport, ApiError> {
            self.0.clone()
        }
    }

    fn request(code: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            code: code.to_string(),
            language: "cpp".to_string(),
            problem: String::new(),
        }
    }

    fn next_terminal(worker: &AnalysisWorker) -> AnalysisEvent {
        loop {
            match worker
                .events()
                .recv_timeout(Duration::from_secs(5))
                .unwrap()
            {
                AnalysisEvent::Started => continue,
                event => return event,
            }
        }
    }

    #[test]
    fn success_carries_samples_for_reported_complexity() {
        let report = ComplexityReport {
            time_complexity: "O(1) - Constant".to_string(),
            space_complexity: "O(1)".to_string(),
            explanation: String::new(),
            breakdown: Vec::new(),
        };
        let worker = spawn_analysis_worker(ComplexityAnalyzer::new(
            StaticTransport(Ok(report.clone())),
            RequestThrottle::new(Duration::ZERO),
        ));
        assert!(worker.submit(request("int main() {}")));

        match next_terminal(&worker) {
            AnalysisEvent::Finished {
                report: got,
                samples,
            } => {
                assert_eq!(got, report);
                assert_eq!(samples.len(), 10);
                assert!(samples.iter().all(|s| (1.0..=11.0).contains(&s.execution_time)));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn failures_arrive_as_user_messages() {
        let worker = spawn_analysis_worker(ComplexityAnalyzer::new(
            StaticTransport(Err(ApiError::RateLimited { retry_after: None })),
            RequestThrottle::new(Duration::ZERO),
        ));
        assert!(worker.submit(request("")));
        match next_terminal(&worker) {
            AnalysisEvent::Failed { message } => {
                assert_eq!(message, "Please enter some code to analyze.")
            }
            other => panic!("unexpected event {other:?}"),
        }

        assert!(worker.submit(request("x")));
        match next_terminal(&worker) {
            AnalysisEvent::Failed { message } => assert!(message.starts_with("Too many requests")),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
