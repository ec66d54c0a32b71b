// src/store/mod.rs

//! Persistence collaborators used by the handlers and the answer validator.
//!
//! Both traits are object safe so the application state can hold them as
//! `Arc<dyn ...>` built once at start-up.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    flow::graph::QuestionGraph,
    models::{
        answer::{AnswerRecord, NewAnswer},
        questionnaire::{Question, Questionnaire},
    },
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Serialization(err.to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

#[async_trait]
pub trait QuestionnaireStore: Send + Sync {
    /// The most recently imported questionnaire with this id.
    async fn find_questionnaire(&self, id: &str) -> Result<Option<Questionnaire>, StoreError>;

    /// Bulk import. Returns the number of questionnaires stored.
    async fn insert_questionnaires(
        &self,
        questionnaires: Vec<Questionnaire>,
    ) -> Result<usize, StoreError>;

    async fn delete_all_questionnaires(&self) -> Result<u64, StoreError>;

    /// Checks that the backing database answers.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Questions owning an option whose successor is `question_id`.
    async fn find_predecessors(
        &self,
        questionnaire_id: &str,
        question_id: &str,
    ) -> Result<Vec<Question>, StoreError> {
        let Some(questionnaire) = self.find_questionnaire(questionnaire_id).await? else {
            return Ok(Vec::new());
        };
        let graph = QuestionGraph::build(&questionnaire);
        Ok(graph.predecessors(question_id).into_iter().cloned().collect())
    }
}

#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// A session's answers to one questionnaire, in insertion order.
    async fn find_answers(
        &self,
        questionnaire_id: &str,
        session: &str,
    ) -> Result<Vec<AnswerRecord>, StoreError>;

    /// Every answer given to one question, in insertion order.
    async fn find_question_answers(
        &self,
        questionnaire_id: &str,
        question_id: &str,
    ) -> Result<Vec<AnswerRecord>, StoreError>;

    /// Every answer of a questionnaire, in insertion order.
    async fn find_questionnaire_answers(
        &self,
        questionnaire_id: &str,
    ) -> Result<Vec<AnswerRecord>, StoreError>;

    async fn insert_answer(&self, answer: NewAnswer) -> Result<AnswerRecord, StoreError>;

    async fn delete_answers(&self, questionnaire_id: &str) -> Result<u64, StoreError>;

    async fn delete_all_answers(&self) -> Result<u64, StoreError>;
}
