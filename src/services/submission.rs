use std::future::Future;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::{error, info};

use crate::services::api_client::ApiError;

/// Runs a one-shot backend call on a background thread and reports the
/// outcome as a user-facing message.
pub fn spawn_submission<F>(what: &'static str, request: F) -> Receiver<Result<(), String>>
where
    F: Future<Output = Result<(), ApiError>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                error!("Failed to start runtime for {}: {}", what, err);
                let _ = tx.send(Err(format!("failed to start {what}: {err}")));
                return;
            }
        };

        let outcome = runtime.block_on(request).map_err(|err| err.to_string());
        match &outcome {
            Ok(()) => info!("{} submitted", what),
            Err(message) => error!("{} failed: {}", what, message),
        }
        let _ = tx.send(outcome);
    });

    rx
}
