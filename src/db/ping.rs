use super::DbClient;
use mongodb::bson::doc;

pub(super) async fn run(client: &DbClient) -> Result<(), mongodb::error::Error> {
    tracing::debug!("pinging database");
    client.database("admin").run_command(doc! { "ping": 1 }).await?;
    Ok(())
}
