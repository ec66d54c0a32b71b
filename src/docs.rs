// src/docs.rs

use axum::Json;
use utoipa::OpenApi;

use crate::{
    handlers::{admin, answer, questionnaire},
    models::{
        answer::{
            AnswerRecord, AnswerSubmitted, ExportedAnswer, QuestionAnswer, QuestionAnswers,
            SessionAnswer, SessionAnswers,
        },
        questionnaire::{
            Question, QuestionOption, QuestionSummary, QuestionView, Questionnaire,
            QuestionnaireView,
        },
        status::{AdminStatus, HealthStatus, MessageBody},
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "IntelliQ API", description = "Questionnaires, questions and answers"),
    paths(
        questionnaire::get_questionnaire,
        questionnaire::get_question,
        answer::do_answer,
        answer::get_session_answers,
        answer::get_question_answers,
        answer::export_answers,
        admin::healthcheck,
        admin::questionnaire_upd,
        admin::reset_all,
        admin::reset_questionnaire,
    ),
    components(schemas(
        Questionnaire,
        Question,
        QuestionOption,
        QuestionnaireView,
        QuestionSummary,
        QuestionView,
        AnswerRecord,
        AnswerSubmitted,
        SessionAnswers,
        SessionAnswer,
        QuestionAnswers,
        QuestionAnswer,
        ExportedAnswer,
        MessageBody,
        AdminStatus,
        HealthStatus,
    )),
    tags(
        (name = "operational", description = "Questionnaire browsing and answering"),
        (name = "admin", description = "Import, reset and health")
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
