// src/handlers/questionnaire.rs

use axum::{
    extract::{Path, Query, State},
    response::Response,
};

use crate::{
    error::AppError,
    models::{
        questionnaire::{QuestionView, QuestionnaireView},
        status::MessageBody,
    },
    state::AppState,
    utils::format::{FormatParams, render_one},
};

/// Retrieves a questionnaire with its questions sorted by id (options left out).
#[utoipa::path(
    get,
    path = "/intelliq_api/questionnaire/{questionnaireID}",
    params(
        ("questionnaireID" = String, Path, description = "Questionnaire id"),
        FormatParams
    ),
    responses(
        (status = 200, description = "Questionnaire", body = QuestionnaireView),
        (status = 402, description = "No questionnaire found.", body = MessageBody),
        (status = 500, description = "Store failure")
    ),
    tag = "operational"
)]
pub async fn get_questionnaire(
    State(state): State<AppState>,
    Path(questionnaire_id): Path<String>,
    Query(params): Query<FormatParams>,
) -> Result<Response, AppError> {
    let questionnaire = state
        .questionnaires
        .find_questionnaire(&questionnaire_id)
        .await?
        .ok_or(AppError::NoContent("No questionnaire found.".to_string()))?;

    render_one(params.format(), QuestionnaireView::from(&questionnaire))
}

/// Retrieves one question with its options sorted by id.
#[utoipa::path(
    get,
    path = "/intelliq_api/question/{questionnaireID}/{questionID}",
    params(
        ("questionnaireID" = String, Path, description = "Questionnaire id"),
        ("questionID" = String, Path, description = "Question id"),
        FormatParams
    ),
    responses(
        (status = 200, description = "Question", body = QuestionView),
        (status = 402, description = "No question found.", body = MessageBody),
        (status = 500, description = "Store failure")
    ),
    tag = "operational"
)]
pub async fn get_question(
    State(state): State<AppState>,
    Path((questionnaire_id, question_id)): Path<(String, String)>,
    Query(params): Query<FormatParams>,
) -> Result<Response, AppError> {
    let questionnaire = state
        .questionnaires
        .find_questionnaire(&questionnaire_id)
        .await?;

    let view = questionnaire
        .as_ref()
        .and_then(|q| q.question(&question_id))
        .map(|question| QuestionView::new(&questionnaire_id, question))
        .ok_or(AppError::NoContent("No question found.".to_string()))?;

    render_one(params.format(), view)
}
