// src/routes.rs

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    docs,
    handlers::{self, admin, answer, questionnaire},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Operational routes under `/intelliq_api`, admin routes under `/intelliq_api/admin`.
/// * Unknown routes answer 404 `{"message": "Endpoint not found."}`.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_routes = Router::new()
        .route("/healthcheck", get(admin::healthcheck))
        .route("/questionnaire_upd", post(admin::questionnaire_upd))
        .route("/resetall", post(admin::reset_all))
        .route("/resetq/{questionnaireID}", post(admin::reset_questionnaire));

    let operational_routes = Router::new()
        .route(
            "/questionnaire/{questionnaireID}",
            get(questionnaire::get_questionnaire),
        )
        .route(
            "/question/{questionnaireID}/{questionID}",
            get(questionnaire::get_question),
        )
        .route(
            "/doanswer/{questionnaireID}/{questionID}/{session}/{optionID}",
            post(answer::do_answer),
        )
        .route(
            "/getsessionanswers/{questionnaireID}/{session}",
            get(answer::get_session_answers),
        )
        .route(
            "/getquestionanswers/{questionnaireID}/{questionID}",
            get(answer::get_question_answers),
        )
        .route(
            "/exportanswers/{questionnaireID}",
            get(answer::export_answers),
        )
        .route("/openapi.json", get(docs::openapi_json));

    Router::new()
        .nest("/intelliq_api/admin", admin_routes)
        .nest("/intelliq_api", operational_routes)
        .fallback(handlers::endpoint_not_found)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
