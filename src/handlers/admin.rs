// src/handlers/admin.rs

use std::path::Path as FsPath;

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    config::{Config, StoreBackend},
    error::AppError,
    models::{
        questionnaire::QuestionnaireUpload,
        status::{AdminStatus, HealthStatus, MessageBody},
    },
    state::AppState,
    utils::redact::redact_connection_url,
};

/// Reports whether the store answers, together with the (redacted) connection string.
#[utoipa::path(
    get,
    path = "/intelliq_api/admin/healthcheck",
    responses(
        (status = 200, description = "Store reachable", body = HealthStatus),
        (status = 500, description = "Store unreachable", body = HealthStatus)
    ),
    tag = "admin"
)]
pub async fn healthcheck(
    State(state): State<AppState>,
    State(config): State<Config>,
) -> impl IntoResponse {
    let dbconnection = match (config.store_backend, &config.database_url) {
        (StoreBackend::Postgres, Some(url)) => redact_connection_url(url),
        _ => "memory://local".to_string(),
    };

    match state.questionnaires.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "OK".to_string(),
                dbconnection,
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthStatus {
                    status: "failed".to_string(),
                    dbconnection,
                }),
            )
        }
    }
}

/// Imports questionnaires from an uploaded JSON file (multipart field `file`).
///
/// The file holds one questionnaire or an array of them. The raw upload is
/// kept in the upload directory.
#[utoipa::path(
    post,
    path = "/intelliq_api/admin/questionnaire_upd",
    responses(
        (status = 200, description = "Questionnaires imported", body = AdminStatus),
        (status = 400, description = "File is not a valid questionnaire", body = AdminStatus),
        (status = 422, description = "No file provided.", body = AdminStatus),
        (status = 500, description = "Store failure", body = AdminStatus)
    ),
    tag = "admin"
)]
pub async fn questionnaire_upd(
    State(state): State<AppState>,
    State(config): State<Config>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let no_file = || AppError::admin(StatusCode::UNPROCESSABLE_ENTITY, "No file provided.");

    let mut multipart = multipart.map_err(|_| no_file())?;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::admin(StatusCode::BAD_REQUEST, e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("questionnaire.json").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::admin(StatusCode::BAD_REQUEST, e))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(no_file)?;
    if bytes.is_empty() {
        return Err(no_file());
    }

    keep_upload(&config.upload_dir, &file_name, &bytes).await?;

    let questionnaires = serde_json::from_slice::<QuestionnaireUpload>(&bytes)
        .map_err(|e| AppError::admin(StatusCode::BAD_REQUEST, e))?
        .into_vec();

    for q in &questionnaires {
        if let Err(validation_errors) = q.validate() {
            return Err(AppError::admin(
                StatusCode::BAD_REQUEST,
                format!("questionnaire '{}': {}", q.id, validation_errors),
            ));
        }
    }

    let count = state
        .questionnaires
        .insert_questionnaires(questionnaires)
        .await
        .map_err(|e| AppError::admin(StatusCode::INTERNAL_SERVER_ERROR, e))?;
    tracing::info!("Imported {} questionnaire(s) from {}", count, file_name);

    Ok(Json(AdminStatus::ok()))
}

/// Name of a kept upload: `<timestamp>-<base name>`.
///
/// The timestamp is RFC 3339 (UTC, milliseconds) with the time separators
/// written as `-`, since `:` is not allowed in file names everywhere.
fn upload_file_name(at: DateTime<Utc>, file_name: &str) -> String {
    // Drop any directory part the client sent along.
    let base_name = FsPath::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("questionnaire.json");
    format!("{}-{}", at.format("%Y-%m-%dT%H-%M-%S%.3fZ"), base_name)
}

async fn keep_upload(dir: &FsPath, file_name: &str, bytes: &[u8]) -> Result<(), AppError> {
    let target = dir.join(upload_file_name(Utc::now(), file_name));

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::admin(StatusCode::INTERNAL_SERVER_ERROR, e))?;
    tokio::fs::write(&target, bytes)
        .await
        .map_err(|e| AppError::admin(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    tracing::debug!("Upload kept at {}", target.display());
    Ok(())
}

/// Deletes every questionnaire and every answer.
#[utoipa::path(
    post,
    path = "/intelliq_api/admin/resetall",
    responses(
        (status = 200, description = "Everything deleted", body = AdminStatus),
        (status = 500, description = "Store failure", body = AdminStatus)
    ),
    tag = "admin"
)]
pub async fn reset_all(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    // Answers go first so a failure never leaves answers without their questionnaire.
    let answers = state
        .answers
        .delete_all_answers()
        .await
        .map_err(|e| AppError::admin(StatusCode::INTERNAL_SERVER_ERROR, e))?;
    let questionnaires = state
        .questionnaires
        .delete_all_questionnaires()
        .await
        .map_err(|e| AppError::admin(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    tracing::info!(
        "Reset: {} questionnaire(s) and {} answer(s) deleted",
        questionnaires,
        answers
    );
    Ok(Json(AdminStatus::ok()))
}

/// Deletes every answer of one questionnaire.
#[utoipa::path(
    post,
    path = "/intelliq_api/admin/resetq/{questionnaireID}",
    params(("questionnaireID" = String, Path, description = "Questionnaire id")),
    responses(
        (status = 200, description = "Answers deleted", body = AdminStatus),
        (status = 402, description = "No questionnaire found.", body = MessageBody),
        (status = 500, description = "Store failure", body = AdminStatus)
    ),
    tag = "admin"
)]
pub async fn reset_questionnaire(
    State(state): State<AppState>,
    Path(questionnaire_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let exists = state
        .questionnaires
        .find_questionnaire(&questionnaire_id)
        .await
        .map_err(|e| AppError::admin(StatusCode::INTERNAL_SERVER_ERROR, e))?
        .is_some();
    if !exists {
        return Err(AppError::NoContent("No questionnaire found.".to_string()));
    }

    let deleted = state
        .answers
        .delete_answers(&questionnaire_id)
        .await
        .map_err(|e| AppError::admin(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    tracing::info!("Answers deleted for {}: {}", questionnaire_id, deleted);
    Ok(Json(AdminStatus::ok()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::{
        flow::graph::tests::diamond,
        models::answer::{AnswerRecord, NewAnswer},
        store::{AnswerStore, QuestionnaireStore, StoreError, memory::MemoryStore},
    };

    /// Answer store whose deletes always fail.
    struct BrokenAnswers;

    #[async_trait]
    impl AnswerStore for BrokenAnswers {
        async fn find_answers(&self, _: &str, _: &str) -> Result<Vec<AnswerRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn find_question_answers(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Vec<AnswerRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn find_questionnaire_answers(
            &self,
            _: &str,
        ) -> Result<Vec<AnswerRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn insert_answer(&self, _: NewAnswer) -> Result<AnswerRecord, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        async fn delete_answers(&self, _: &str) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        async fn delete_all_answers(&self) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn upload_names_carry_a_timestamp_and_the_base_name() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(
            upload_file_name(at, "questionnaire.json"),
            "2025-03-14T09-26-53.000Z-questionnaire.json"
        );
        assert_eq!(
            upload_file_name(at, "../../etc/q.json"),
            "2025-03-14T09-26-53.000Z-q.json"
        );
        assert_eq!(
            upload_file_name(at, ".."),
            "2025-03-14T09-26-53.000Z-questionnaire.json"
        );
    }

    #[tokio::test]
    async fn failed_reset_keeps_questionnaires() {
        let questionnaires = Arc::new(MemoryStore::default());
        questionnaires
            .insert_questionnaires(vec![diamond()])
            .await
            .unwrap();
        let state = AppState {
            questionnaires: questionnaires.clone(),
            answers: Arc::new(BrokenAnswers),
            config: Config::in_memory(std::env::temp_dir()),
        };

        let result = reset_all(State(state)).await;
        assert!(result.is_err());
        assert!(
            questionnaires
                .find_questionnaire("QQ000")
                .await
                .unwrap()
                .is_some()
        );
    }
}
