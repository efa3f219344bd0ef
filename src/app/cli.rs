use std::future::Future;

use tokio::io::{BufWriter, Stdout};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use super::error::AppError;

/// Reusable CLI application runner that handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP) as cooperative cancellation
/// - Stdout buffering
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM, 129 = SIGHUP)
pub struct CliApp {
    name: String,
}

impl CliApp {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the application body with a buffered stdout writer and a
    /// cancellation token that is triggered by the first termination signal
    ///
    /// The body is not interrupted; it is expected to observe the token and
    /// wind down on its own. The body must flush the writer before returning.
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub async fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(BufWriter<Stdout>, CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let writer = BufWriter::new(tokio::io::stdout());
        let cancel = CancellationToken::new();
        let signals = tokio::spawn(wait_for_signal(cancel.clone()));

        let result = main_fn(writer, cancel.clone()).await;

        let signal_code = if cancel.is_cancelled() {
            Some(signals.await.unwrap_or(130))
        } else {
            signals.abort();
            None
        };

        match (result, signal_code) {
            (Ok(()), None) => std::process::exit(0),
            (Ok(()), Some(code)) => std::process::exit(code),
            (Err(e), code) => {
                error!(app = %self.name, error = %e, "Command failed");
                eprintln!("Error: {}", e);
                std::process::exit(code.unwrap_or(1));
            }
        }
    }
}

/// Wait for a termination signal, cancel the token and return the exit code
/// to use (128 + signal number)
async fn wait_for_signal(cancel: CancellationToken) -> i32 {
    let code = signal_exit_code().await;
    warn!(code, "Termination signal received, cancelling");
    cancel.cancel();
    code
}

#[cfg(unix)]
async fn signal_exit_code() -> i32 {
    use tokio::signal::unix::{SignalKind, signal};

    let (mut sigterm, mut sigint, mut sighup) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
        signal(SignalKind::hangup()),
    ) {
        (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
        _ => {
            warn!("Failed to install Unix signal handlers, falling back to Ctrl+C");
            return ctrl_c_exit_code().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => 143,
        _ = sigint.recv() => 130,
        _ = sighup.recv() => 129,
    }
}

#[cfg(not(unix))]
async fn signal_exit_code() -> i32 {
    ctrl_c_exit_code().await
}

async fn ctrl_c_exit_code() -> i32 {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        // Never resolve: without a handler there is nothing to wait for.
        std::future::pending::<()>().await;
    }
    130
}
