//! Terminal counterpart of the web frontend: fetches the welcome message and
//! the health report concurrently and renders both cards.

mod client;
mod view;

pub use client::{BackendClient, ClientError, FetchError};
pub use view::{DashboardView, HealthCard};

/// Runs both fetches concurrently and applies each result on its own.
pub async fn load(client: &BackendClient) -> DashboardView {
    let mut view = DashboardView::default();
    let (welcome, health) = tokio::join!(client.fetch_welcome(), client.fetch_health());
    view.apply_welcome(welcome);
    view.apply_health(health);
    view
}

pub async fn run(base_url: &str) -> Result<(), ClientError> {
    let client = BackendClient::new(base_url)?;
    tracing::info!(base_url = %client.base_url(), "loading dashboard");

    println!("{}", DashboardView::default().render());
    println!();

    let view = load(&client).await;
    println!("{}", view.render());
    Ok(())
}
