use actix_web::{HttpResponse, Responder};

pub(crate) async fn process() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Countries, States, and Cities API",
    }))
}
