use super::DbClient;
use mongodb::options::ClientOptions;
use std::time::Duration;

const APP_NAME: &str = "mern_demo_api";

pub(super) async fn create(
    uri: &str,
    timeout: Duration,
) -> Result<DbClient, mongodb::error::Error> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some(APP_NAME.to_string());
    options.server_selection_timeout = Some(timeout);
    options.connect_timeout = Some(timeout);

    // Only the hosts are logged; the URI may carry credentials.
    let hosts: Vec<String> = options.hosts.iter().map(ToString::to_string).collect();
    tracing::info!(
        hosts = ?hosts,
        timeout_ms = timeout.as_millis() as u64,
        "database client created"
    );

    DbClient::with_options(options)
}
