mod client;
mod ping;

use std::time::Duration;

pub type DbClient = mongodb::Client;

/// Builds a client for `uri` and confirms the deployment answers before
/// returning it. The driver connects lazily, so without the ping a bad URI
/// host would only surface on the first query.
pub async fn connect(uri: &str, timeout: Duration) -> Result<DbClient, mongodb::error::Error> {
    let client = client::create(uri, timeout).await?;
    ping::run(&client).await?;
    Ok(client)
}
