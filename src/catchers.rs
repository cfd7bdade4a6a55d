use crate::error::{ErrorResponse, INTERNAL_ERROR_MESSAGE};
use crate::fairings::request_span_for;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Catcher;
use rocket::Request;

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Json<ErrorResponse> {
    request_span_for(req).in_scope(|| tracing::warn!("route not found"));
    Json(ErrorResponse::new("Not found"))
}

/// Reached when a handler panics or fails without producing a response.
#[catch(500)]
pub fn internal_server_error(req: &Request<'_>) -> Json<ErrorResponse> {
    request_span_for(req).in_scope(|| tracing::error!("Unhandled error"));
    Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE))
}

#[catch(default)]
pub fn default_catcher(status: Status, req: &Request<'_>) -> (Status, Json<ErrorResponse>) {
    let span = request_span_for(req);
    span.in_scope(|| {
        if status.code >= 500 {
            tracing::error!(status = status.code, "request failed");
        } else {
            tracing::warn!(status = status.code, "request failed");
        }
    });

    let message = if status.code >= 500 {
        INTERNAL_ERROR_MESSAGE
    } else {
        status.reason_lossy()
    };
    (status, Json(ErrorResponse::new(message)))
}

pub fn catchers() -> Vec<Catcher> {
    rocket::catchers![not_found, internal_server_error, default_catcher]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::local::blocking::Client;

    #[get("/panics")]
    fn panics() -> &'static str {
        panic!("handler blew up with private detail")
    }

    #[get("/teapot")]
    fn teapot() -> Status {
        Status::ImATeapot
    }

    fn client() -> Client {
        let rocket = rocket::build()
            .mount("/", rocket::routes![panics, teapot])
            .register("/", catchers());
        Client::tracked(rocket).expect("valid rocket instance")
    }

    fn body(response: rocket::local::blocking::LocalResponse<'_>) -> serde_json::Value {
        serde_json::from_str(&response.into_string().unwrap()).unwrap()
    }

    #[test]
    fn test_unknown_route_returns_json_404() {
        let client = client();
        let response = client.get("/nope").dispatch();
        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(body(response), serde_json::json!({"error": "Not found"}));
    }

    #[test]
    fn test_panicking_handler_returns_generic_500() {
        let client = client();
        let response = client.get("/panics").dispatch();
        assert_eq!(response.status(), Status::InternalServerError);
        assert_eq!(
            body(response),
            serde_json::json!({"error": "Internal server error"})
        );
    }

    #[test]
    fn test_default_catcher_uses_reason() {
        let client = client();
        let response = client.get("/teapot").dispatch();
        assert_eq!(response.status(), Status::ImATeapot);
        assert_eq!(body(response), serde_json::json!({"error": "I'm a teapot"}));
    }
}
