use crate::config::LogSettings;
use std::backtrace::Backtrace;
use std::sync::Once;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const SERVICE_NAME: &str = "backend";

static TELEMETRY_INIT: Once = Once::new();
static PANIC_HOOK_INIT: Once = Once::new();

/// Where log records are written. Commands that print their own output to
/// stdout log to stderr so the two never interleave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

/// Installs the global subscriber. `RUST_LOG` wins over `LOG_LEVEL` when set.
/// The returned guard flushes buffered output on drop and must be held for
/// the life of the process.
pub fn init(settings: &LogSettings, target: LogTarget) -> Option<WorkerGuard> {
    let mut guard = None;

    TELEMETRY_INIT.call_once(|| {
        if let Err(err) = tracing_log::LogTracer::init() {
            eprintln!("failed to set log tracer: {err}");
        }

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(settings)));

        let (writer, worker_guard) = match target {
            LogTarget::Stdout => tracing_appender::non_blocking(std::io::stdout()),
            LogTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        };

        let init_result = if settings.is_development() {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_ansi(true).with_writer(writer))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(writer))
                .try_init()
        };

        match init_result {
            Ok(()) => guard = Some(worker_guard),
            Err(err) => eprintln!("failed to initialize tracing subscriber: {err}"),
        }
    });

    install_panic_hook();
    guard
}

/// Routes panics through the logger with their message and a backtrace.
/// Handler panics end in the 500 catcher, which never sees the payload, so
/// this is the only place the detail is recorded. The previous hook still
/// runs afterwards.
pub fn install_panic_hook() {
    PANIC_HOOK_INIT.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(
                error = %info,
                stack = %Backtrace::force_capture(),
                "Unhandled error"
            );
            previous(info);
        }));
    });
}

fn default_directives(settings: &LogSettings) -> String {
    format!(
        "{level},rocket=warn,hyper=warn,mongodb=warn",
        level = settings.level
    )
    .to_ascii_lowercase()
}

/// Span carrying the fields every startup event is tagged with.
pub fn service_span(settings: &LogSettings) -> tracing::Span {
    tracing::info_span!(
        "service",
        service = SERVICE_NAME,
        environment = settings.environment_label(),
    )
}
