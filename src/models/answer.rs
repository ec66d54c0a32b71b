// src/models/answer.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Represents the 'answers' table in the database.
/// One row per submitted answer; rows are never updated.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct AnswerRecord {
    pub id: i64,

    #[serde(rename = "questionnaireIDRef")]
    pub questionnaire_id: String,

    #[serde(rename = "qIDRef")]
    pub question_id: String,

    /// The chosen option id.
    #[serde(rename = "ans")]
    pub option_id: String,

    pub session: String,

    #[schema(value_type = String)]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// An answer about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub questionnaire_id: String,
    pub question_id: String,
    pub option_id: String,
    pub session: String,
}

/// Path parameters of `POST /doanswer/...`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmission {
    #[serde(rename = "questionnaireID")]
    pub questionnaire_id: String,
    #[serde(rename = "questionID")]
    pub question_id: String,
    pub session: String,
    #[serde(rename = "optionID")]
    pub option_id: String,
}

impl From<&AnswerSubmission> for NewAnswer {
    fn from(s: &AnswerSubmission) -> Self {
        Self {
            questionnaire_id: s.questionnaire_id.clone(),
            question_id: s.question_id.clone(),
            option_id: s.option_id.clone(),
            session: s.session.clone(),
        }
    }
}

/// DTO returned after a successful submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerSubmitted {
    pub message: String,
    pub answer: AnswerRecord,
}

/// `GET /getsessionanswers`: every answer of one session, sorted by question id.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionAnswers {
    #[serde(rename = "questionnaireID")]
    pub questionnaire_id: String,
    pub session: String,
    pub answers: Vec<SessionAnswer>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionAnswer {
    #[serde(rename = "qID")]
    pub question_id: String,
    #[serde(rename = "ans")]
    pub option_id: String,
}

impl SessionAnswers {
    pub fn new(questionnaire_id: &str, session: &str, records: &[AnswerRecord]) -> Self {
        let mut answers: Vec<SessionAnswer> = records
            .iter()
            .map(|a| SessionAnswer {
                question_id: a.question_id.clone(),
                option_id: a.option_id.clone(),
            })
            .collect();
        answers.sort_by(|a, b| a.question_id.cmp(&b.question_id));

        Self {
            questionnaire_id: questionnaire_id.to_string(),
            session: session.to_string(),
            answers,
        }
    }
}

/// `GET /getquestionanswers`: every answer given to one question, in submission order.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionAnswers {
    #[serde(rename = "questionnaireID")]
    pub questionnaire_id: String,
    #[serde(rename = "questionID")]
    pub question_id: String,
    pub answers: Vec<QuestionAnswer>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionAnswer {
    pub session: String,
    #[serde(rename = "ans")]
    pub option_id: String,
}

impl QuestionAnswers {
    pub fn new(questionnaire_id: &str, question_id: &str, records: &[AnswerRecord]) -> Self {
        Self {
            questionnaire_id: questionnaire_id.to_string(),
            question_id: question_id.to_string(),
            answers: records
                .iter()
                .map(|a| QuestionAnswer {
                    session: a.session.clone(),
                    option_id: a.option_id.clone(),
                })
                .collect(),
        }
    }
}

/// One row of `GET /exportanswers`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExportedAnswer {
    #[serde(rename = "questionID")]
    pub question_id: String,
    #[serde(rename = "ans")]
    pub option_id: String,
}

impl ExportedAnswer {
    /// Builds the export, sorted by question id.
    pub fn collect(records: &[AnswerRecord]) -> Vec<Self> {
        let mut rows: Vec<Self> = records
            .iter()
            .map(|a| Self {
                question_id: a.question_id.clone(),
                option_id: a.option_id.clone(),
            })
            .collect();
        rows.sort_by(|a, b| a.question_id.cmp(&b.question_id));
        rows
    }
}
