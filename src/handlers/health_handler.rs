use actix_web::{get, web, HttpRequest, HttpResponse};

use crate::{app_state::AppState, middleware::get_request_id};

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
async fn health_check_ready(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let store_health = state.store.health_check().await;

    if let Err(err) = &store_health {
        log::error!(
            "[{}] Readiness probe failed: {}",
            get_request_id(&req).unwrap_or_default(),
            err
        );
    }

    let response = serde_json::json!({
        "status": if store_health.is_ok() { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "store": if store_health.is_ok() { "ok" } else { "error" }
        }
    });

    if store_health.is_ok() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[get("/health/live")]
async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
