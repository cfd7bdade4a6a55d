use crate::config::LogSettings;
use crate::state::ServiceState;
use rocket::local::asynchronous::Client;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt};

pub(crate) fn log_settings(environment: &str) -> LogSettings {
    LogSettings::from_lookup(|key| (key == "NODE_ENV").then(|| environment.to_string()))
}

pub(crate) async fn client() -> Client {
    let rocket = crate::rocket(ServiceState::new(), 0, &log_settings("test"))
        .expect("valid rocket instance");
    Client::tracked(rocket).await.expect("valid client")
}

#[derive(Debug, Clone)]
pub(crate) struct MockRoute {
    path: &'static str,
    status: u16,
    body: &'static str,
}

impl MockRoute {
    pub(crate) fn json(path: &'static str, status: u16, body: &'static str) -> Self {
        Self { path, status, body }
    }

    fn response(&self) -> String {
        http_response(self.status, self.body)
    }
}

fn http_response(status: u16, body: &str) -> String {
    format!(
        "HTTP/1.1 {status} MOCK\r\n\
         Connection: close\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\r\n{body}",
        body.len()
    )
}

/// Serves canned responses keyed by request path; anything else gets a 404.
pub(crate) async fn mock_backend(routes: Vec<MockRoute>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };

            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let n = tokio::io::AsyncReadExt::read(&mut socket, &mut buf)
                    .await
                    .unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/");

                let response = routes
                    .iter()
                    .find(|route| route.path == path)
                    .map(MockRoute::response)
                    .unwrap_or_else(|| http_response(404, r#"{"error":"Not found"}"#));
                let _ = tokio::io::AsyncWriteExt::write_all(&mut socket, response.as_bytes()).await;
            });
        }
    });

    format!("http://{addr}")
}

/// Base URL of a local port with nothing listening on it.
pub(crate) async fn unused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind unused-port listener");
    let addr = listener.local_addr().expect("unused-port address");
    drop(listener);
    format!("http://{addr}")
}

/// Log output captured from the current thread's subscriber.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        let bytes = self.0.lock().expect("log buffer lock");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs a plain-text subscriber for the current thread only. Logs stop
/// being captured when the guard drops.
pub(crate) fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_ansi(false)
            .with_writer(move || writer.clone()),
    );
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
