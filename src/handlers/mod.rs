pub mod dashboard_handler;
pub mod health_handler;
pub mod progress_handler;

use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::auth::validate_bearer;

pub use dashboard_handler::get_dashboard;
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use progress_handler::{
    get_assessment_history, get_at_risk_students, get_class_progress, get_gradebook_csv,
    get_my_progress, get_student_progress,
};

/// Public health probes plus the bearer-protected `/api` scope.
///
/// Expects `web::Data<AppState>` and `web::Data<JwtService>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(
            web::scope("/api")
                .wrap(HttpAuthentication::bearer(validate_bearer))
                .service(get_assessment_history)
                .service(get_my_progress)
                .service(get_class_progress)
                .service(get_at_risk_students)
                .service(get_student_progress)
                .service(get_gradebook_csv)
                .service(get_dashboard),
        );
}
