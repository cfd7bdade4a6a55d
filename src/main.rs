#[macro_use]
extern crate rocket;

mod catchers;
mod cli;
mod config;
mod dashboard;
mod db;
mod error;
mod fairings;
mod routes;
mod startup;
mod state;
mod telemetry;
mod types;

#[cfg(test)]
mod test_helpers;

use clap::Parser;
use rocket::fairing::AdHoc;
use rocket_cors::{AllowedHeaders, AllowedMethods, AllowedOrigins, CorsOptions};
use state::ServiceState;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::process::ExitCode;
use tracing::Instrument;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(routes::health::get_health, routes::welcome::get_welcome),
    components(schemas(error::ErrorResponse)),
    tags(
        (name = "Health", description = "Liveness reporting"),
        (name = "Welcome", description = "Static welcome message"),
    ),
    info(
        title = "MERN Demo API",
        version = "0.1.0",
        description = "Health and welcome endpoints of the MERN demo backend",
    )
)]
struct ApiDoc;

fn configure_cors() -> CorsOptions {
    let allowed_methods: AllowedMethods = ["Get", "Head", "Put", "Patch", "Post", "Delete"]
        .iter()
        .filter_map(|s| std::str::FromStr::from_str(s).ok())
        .collect();

    CorsOptions {
        allowed_origins: AllowedOrigins::all(),
        allowed_methods,
        allowed_headers: AllowedHeaders::all(),
        allow_credentials: false,
        expose_headers: HashSet::from([fairings::REQUEST_ID_HEADER.to_string()]),
        ..Default::default()
    }
}

fn rocket(
    state: ServiceState,
    port: u16,
    log: &config::LogSettings,
) -> Result<rocket::Rocket<rocket::Build>, rocket_cors::Error> {
    let cors = configure_cors().to_cors()?;

    let config = rocket::Config {
        address: Ipv4Addr::UNSPECIFIED.into(),
        port,
        log_level: rocket::config::LogLevel::Normal,
        ..rocket::Config::default()
    };

    Ok(rocket::custom(config)
        .manage(state)
        .mount("/", routes::health::routes())
        .mount("/", routes::welcome::routes())
        .mount(
            "/",
            SwaggerUi::new("/swagger/<tail..>").url("/api-doc/openapi.json", ApiDoc::openapi()),
        )
        .register("/", catchers::catchers())
        .attach(fairings::RequestLogger::new(log))
        .attach(cors)
        .attach(AdHoc::on_liftoff("Listening Log", |rocket| {
            Box::pin(async move {
                let port = rocket.config().port;
                tracing::info!(port, "Server running on port {port}");
            })
        })))
}

#[rocket::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let cli = cli::Cli::parse();
    let log_target = cli
        .command
        .as_ref()
        .map_or(telemetry::LogTarget::Stdout, cli::Command::log_target);

    let log_settings = config::LogSettings::from_env();
    let _guard = telemetry::init(&log_settings, log_target);
    let state = ServiceState::new();

    match cli.command {
        None => {
            cli::print_usage();
            ExitCode::SUCCESS
        }
        Some(cli::Command::Serve) => {
            let config = match config::Config::from_env() {
                Ok(config) => config,
                Err(err) => {
                    tracing::error!(error = %err, "Failed to start server");
                    return ExitCode::FAILURE;
                }
            };

            let span = telemetry::service_span(&log_settings);
            match startup::serve(config, state).instrument(span).await {
                Ok(()) => ExitCode::SUCCESS,
                // The sequencer has already logged the cause.
                Err(_) => ExitCode::FAILURE,
            }
        }
        Some(cli::Command::Dashboard { base_url }) => match dashboard::run(&base_url).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                tracing::error!(error = %err, "dashboard failed");
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rocket::http::{Header, Status};
    use rocket::local::blocking::Client;

    fn client_with(state: ServiceState) -> Client {
        let rocket = rocket(state, 0, &test_helpers::log_settings("test")).expect("valid rocket");
        Client::tracked(rocket).expect("valid rocket instance")
    }

    fn client() -> Client {
        client_with(ServiceState::new())
    }

    fn json(response: rocket::local::blocking::LocalResponse<'_>) -> serde_json::Value {
        serde_json::from_str(&response.into_string().unwrap()).unwrap()
    }

    #[test]
    fn test_health_endpoint() {
        let client = client();
        let response = client.get("/health").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let body = json(response);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
        assert!(body["uptime"].as_f64().expect("uptime is a number") >= 0.0);
    }

    #[test]
    fn test_health_timestamp_not_before_start() {
        let state = ServiceState::new();
        let started_at = state.started_at();
        let client = client_with(state);

        let body = json(client.get("/health").dispatch());
        let timestamp = body["timestamp"].as_str().expect("timestamp string");
        let parsed = DateTime::parse_from_rfc3339(timestamp).expect("valid RFC 3339 date");
        assert!(parsed.with_timezone(&Utc) >= started_at);
    }

    #[test]
    fn test_uptime_does_not_decrease() {
        let client = client();
        let first = json(client.get("/health").dispatch())["uptime"].as_f64().unwrap();
        let second = json(client.get("/health").dispatch())["uptime"].as_f64().unwrap();
        assert!(second >= first);
    }

    #[test]
    fn test_welcome_endpoint() {
        let client = client();
        let response = client.get("/api").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            json(response),
            serde_json::json!({"message": "Welcome to MERN Demo API"})
        );
    }

    #[test]
    fn test_unknown_api_path_is_json_404() {
        let client = client();
        let response = client.get("/api/users").dispatch();
        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(json(response), serde_json::json!({"error": "Not found"}));
    }

    #[test]
    fn test_cors_allows_any_origin() {
        let client = client();
        let response = client
            .get("/api")
            .header(Header::new("Origin", "http://localhost:5173"))
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert!(response
            .headers()
            .get_one("Access-Control-Allow-Origin")
            .is_some());
    }

    #[test]
    fn test_responses_carry_request_id() {
        let client = client();
        let response = client.get("/health").dispatch();
        assert!(response
            .headers()
            .get_one(fairings::REQUEST_ID_HEADER)
            .is_some());
    }

    #[test]
    fn test_openapi_document_lists_endpoints() {
        let client = client();
        let response = client.get("/api-doc/openapi.json").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let body = json(response);
        assert!(body["paths"]["/health"].is_object());
        assert!(body["paths"]["/api"].is_object());
    }

    #[rocket::async_test]
    async fn test_async_client_serves_both_endpoints() {
        let client = test_helpers::client().await;
        let health = client.get("/health").dispatch().await;
        assert_eq!(health.status(), Status::Ok);
        let welcome = client.get("/api").dispatch().await;
        assert_eq!(welcome.status(), Status::Ok);
    }
}
