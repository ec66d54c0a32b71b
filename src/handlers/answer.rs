// src/handlers/answer.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    models::{
        answer::{AnswerSubmission, AnswerSubmitted, ExportedAnswer, QuestionAnswers, SessionAnswers},
        status::MessageBody,
    },
    state::AppState,
    utils::format::{FormatParams, render_many, render_one},
};

/// Submits one answer of a session.
///
/// * The question/option pair must exist in the questionnaire.
/// * A session's first answer may not skip a required question.
/// * Later answers must follow the option chosen on a preceding question.
#[utoipa::path(
    post,
    path = "/intelliq_api/doanswer/{questionnaireID}/{questionID}/{session}/{optionID}",
    params(
        ("questionnaireID" = String, Path, description = "Questionnaire id"),
        ("questionID" = String, Path, description = "Question id"),
        ("session" = String, Path, description = "Client supplied session id"),
        ("optionID" = String, Path, description = "Chosen option id")
    ),
    responses(
        (status = 200, description = "Answer Submited.", body = AnswerSubmitted),
        (status = 402, description = "Submission rejected by the question flow", body = MessageBody),
        (status = 500, description = "Store failure")
    ),
    tag = "operational"
)]
pub async fn do_answer(
    State(state): State<AppState>,
    Path(submission): Path<AnswerSubmission>,
) -> Result<impl IntoResponse, AppError> {
    let answer = state.validator().validate_and_record(&submission).await?;

    Ok(Json(AnswerSubmitted {
        message: "Answer Submited.".to_string(),
        answer,
    }))
}

/// Lists a session's answers, sorted by question id.
#[utoipa::path(
    get,
    path = "/intelliq_api/getsessionanswers/{questionnaireID}/{session}",
    params(
        ("questionnaireID" = String, Path, description = "Questionnaire id"),
        ("session" = String, Path, description = "Session id"),
        FormatParams
    ),
    responses(
        (status = 200, description = "Session answers", body = SessionAnswers),
        (status = 402, description = "No answers found.", body = MessageBody),
        (status = 500, description = "Store failure")
    ),
    tag = "operational"
)]
pub async fn get_session_answers(
    State(state): State<AppState>,
    Path((questionnaire_id, session)): Path<(String, String)>,
    Query(params): Query<FormatParams>,
) -> Result<Response, AppError> {
    let answers = state.answers.find_answers(&questionnaire_id, &session).await?;
    if answers.is_empty() {
        return Err(AppError::NoContent("No answers found.".to_string()));
    }

    render_one(
        params.format(),
        SessionAnswers::new(&questionnaire_id, &session, &answers),
    )
}

/// Lists every session's answer to one question, in submission order.
#[utoipa::path(
    get,
    path = "/intelliq_api/getquestionanswers/{questionnaireID}/{questionID}",
    params(
        ("questionnaireID" = String, Path, description = "Questionnaire id"),
        ("questionID" = String, Path, description = "Question id"),
        FormatParams
    ),
    responses(
        (status = 200, description = "Question answers", body = QuestionAnswers),
        (status = 402, description = "No answers found.", body = MessageBody),
        (status = 500, description = "Store failure")
    ),
    tag = "operational"
)]
pub async fn get_question_answers(
    State(state): State<AppState>,
    Path((questionnaire_id, question_id)): Path<(String, String)>,
    Query(params): Query<FormatParams>,
) -> Result<Response, AppError> {
    let answers = state
        .answers
        .find_question_answers(&questionnaire_id, &question_id)
        .await?;
    if answers.is_empty() {
        return Err(AppError::NoContent("No answers found.".to_string()));
    }

    render_one(
        params.format(),
        QuestionAnswers::new(&questionnaire_id, &question_id, &answers),
    )
}

/// Exports every answer of a questionnaire as `(questionID, ans)` rows.
#[utoipa::path(
    get,
    path = "/intelliq_api/exportanswers/{questionnaireID}",
    params(
        ("questionnaireID" = String, Path, description = "Questionnaire id"),
        FormatParams
    ),
    responses(
        (status = 200, description = "Answers sorted by question id", body = [ExportedAnswer]),
        (status = 402, description = "No questionnaire found.", body = MessageBody),
        (status = 500, description = "Store failure")
    ),
    tag = "operational"
)]
pub async fn export_answers(
    State(state): State<AppState>,
    Path(questionnaire_id): Path<String>,
    Query(params): Query<FormatParams>,
) -> Result<Response, AppError> {
    let answers = state
        .answers
        .find_questionnaire_answers(&questionnaire_id)
        .await?;
    if answers.is_empty() {
        return Err(AppError::NoContent("No questionnaire found.".to_string()));
    }

    render_many(params.format(), ExportedAnswer::collect(&answers))
}
