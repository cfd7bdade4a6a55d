use crate::types::welcome::WelcomeMessage;
use rocket::serde::json::Json;
use rocket::Route;

#[utoipa::path(
    get,
    path = "/api",
    tag = "Welcome",
    responses(
        (status = 200, description = "Fixed welcome message", body = WelcomeMessage),
    )
)]
#[get("/api")]
pub async fn get_welcome() -> Json<WelcomeMessage> {
    Json(WelcomeMessage::default())
}

pub fn routes() -> Vec<Route> {
    rocket::routes![get_welcome]
}
