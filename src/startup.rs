use crate::config::Config;
use crate::db;
use crate::state::ServiceState;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPhase {
    Connecting,
    Listening,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database connection failed: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("CORS configuration failed: {0}")]
    Cors(#[from] rocket_cors::Error),
    #[error("HTTP server failed: {0}")]
    Launch(#[from] Box<rocket::Error>),
}

impl From<rocket::Error> for StartupError {
    fn from(err: rocket::Error) -> Self {
        // A rocket::Error panics on drop unless inspected, even when the
        // failure log below is filtered out.
        let _ = err.kind();
        StartupError::Launch(Box::new(err))
    }
}

/// Drives `Connecting -> Listening` or `Connecting -> Failed`. The listener
/// is only handed control once the connection attempt has succeeded, and the
/// phase stays `Connecting` until the listener reports it has bound.
pub struct StartupSequencer {
    phase: Arc<watch::Sender<StartupPhase>>,
}

/// Handed to the listener so it can report a successful bind.
#[derive(Clone)]
pub struct ListeningNotifier {
    phase: Arc<watch::Sender<StartupPhase>>,
}

impl ListeningNotifier {
    pub fn mark_listening(&self) {
        self.phase.send_if_modified(|phase| {
            if *phase == StartupPhase::Connecting {
                *phase = StartupPhase::Listening;
                true
            } else {
                false
            }
        });
    }
}

impl StartupSequencer {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(StartupPhase::Connecting);
        Self {
            phase: Arc::new(phase),
        }
    }

    pub fn phase(&self) -> StartupPhase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<StartupPhase> {
        self.phase.subscribe()
    }

    pub async fn run<D, E, C, L, F>(&self, connect: C, listen: L) -> Result<(), StartupError>
    where
        C: Future<Output = Result<D, E>>,
        E: std::error::Error + Send + Sync + 'static,
        L: FnOnce(D, ListeningNotifier) -> F,
        F: Future<Output = Result<(), StartupError>>,
    {
        let connection = match connect.await {
            Ok(connection) => connection,
            Err(err) => return Err(self.fail(StartupError::Database(Box::new(err)))),
        };
        tracing::info!("Connected to MongoDB");

        let notifier = ListeningNotifier {
            phase: self.phase.clone(),
        };
        listen(connection, notifier)
            .await
            .map_err(|err| self.fail(err))
    }

    fn fail(&self, err: StartupError) -> StartupError {
        tracing::error!(error = %err, "Failed to start server");
        self.phase.send_replace(StartupPhase::Failed);
        err
    }
}

impl Default for StartupSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Publishes `Listening` once Rocket has bound its socket.
fn report_listening(rocket: Rocket<Build>, notifier: ListeningNotifier) -> Rocket<Build> {
    rocket.attach(AdHoc::on_liftoff("Startup Phase", move |_| {
        Box::pin(async move { notifier.mark_listening() })
    }))
}

/// Connects to MongoDB, then launches the HTTP server and runs until shutdown.
pub async fn serve(config: Config, state: ServiceState) -> Result<(), StartupError> {
    tracing::info!(
        port = config.port,
        log_level = %config.log_level_name(),
        started_at = %state.started_at(),
        "starting server"
    );

    let Config {
        port,
        mongo_uri,
        connect_timeout,
        log,
    } = config;

    let sequencer = StartupSequencer::new();
    let result = sequencer
        .run(
            db::connect(&mongo_uri, connect_timeout),
            |client, notifier| async move {
                let rocket = crate::rocket(state, port, &log)?.manage(client);
                report_listening(rocket, notifier).launch().await?;
                Ok::<(), StartupError>(())
            },
        )
        .await;
    if result.is_ok() {
        tracing::info!(phase = ?sequencer.phase(), "server stopped");
    }
    result
}
