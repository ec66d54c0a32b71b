// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, types::Json};

use crate::{
    models::{
        answer::{AnswerRecord, NewAnswer},
        questionnaire::{Question, Questionnaire},
    },
    store::{AnswerStore, QuestionnaireStore, StoreError},
};

/// Postgres-backed store. The pool is created once in `main` and shared.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Helper struct for reading the 'questionnaires' table.
#[derive(FromRow)]
struct QuestionnaireRow {
    questionnaire_id: String,
    title: String,
    keywords: Json<Vec<String>>,
    questions: Json<Vec<Question>>,
}

impl From<QuestionnaireRow> for Questionnaire {
    fn from(row: QuestionnaireRow) -> Self {
        Self {
            id: row.questionnaire_id,
            title: row.title,
            keywords: row.keywords.0,
            questions: row.questions.0,
        }
    }
}

#[async_trait]
impl QuestionnaireStore for PgStore {
    async fn find_questionnaire(&self, id: &str) -> Result<Option<Questionnaire>, StoreError> {
        let row = sqlx::query_as::<_, QuestionnaireRow>(
            r#"
            SELECT questionnaire_id, title, keywords, questions
            FROM questionnaires
            WHERE questionnaire_id = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch questionnaire {}: {:?}", id, e);
            StoreError::from(e)
        })?;

        Ok(row.map(Questionnaire::from))
    }

    async fn insert_questionnaires(
        &self,
        questionnaires: Vec<Questionnaire>,
    ) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;

        for q in &questionnaires {
            sqlx::query(
                r#"
                INSERT INTO questionnaires (questionnaire_id, title, keywords, questions)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&q.id)
            .bind(&q.title)
            .bind(Json(&q.keywords))
            .bind(Json(&q.questions))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert questionnaire {}: {:?}", q.id, e);
                StoreError::from(e)
            })?;
        }

        tx.commit().await?;
        Ok(questionnaires.len())
    }

    async fn delete_all_questionnaires(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM questionnaires")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_predecessors(
        &self,
        questionnaire_id: &str,
        question_id: &str,
    ) -> Result<Vec<Question>, StoreError> {
        let rows: Vec<(Json<Question>,)> = sqlx::query_as(
            r#"
            SELECT q.question
            FROM (
                SELECT questions
                FROM questionnaires
                WHERE questionnaire_id = $1
                ORDER BY id DESC
                LIMIT 1
            ) latest
            CROSS JOIN LATERAL jsonb_array_elements(latest.questions)
                WITH ORDINALITY AS q(question, position)
            WHERE EXISTS (
                SELECT 1
                FROM jsonb_array_elements(q.question -> 'options') AS opt
                WHERE opt ->> 'nextqID' = $2
            )
            ORDER BY q.position
            "#,
        )
        .bind(questionnaire_id)
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(Json(q),)| q).collect())
    }
}

#[async_trait]
impl AnswerStore for PgStore {
    async fn find_answers(
        &self,
        questionnaire_id: &str,
        session: &str,
    ) -> Result<Vec<AnswerRecord>, StoreError> {
        let answers = sqlx::query_as::<_, AnswerRecord>(
            r#"
            SELECT id, questionnaire_id, question_id, option_id, session, created_at
            FROM answers
            WHERE questionnaire_id = $1 AND session = $2
            ORDER BY id
            "#,
        )
        .bind(questionnaire_id)
        .bind(session)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch session answers: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(answers)
    }

    async fn find_question_answers(
        &self,
        questionnaire_id: &str,
        question_id: &str,
    ) -> Result<Vec<AnswerRecord>, StoreError> {
        let answers = sqlx::query_as::<_, AnswerRecord>(
            r#"
            SELECT id, questionnaire_id, question_id, option_id, session, created_at
            FROM answers
            WHERE questionnaire_id = $1 AND question_id = $2
            ORDER BY id
            "#,
        )
        .bind(questionnaire_id)
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    async fn find_questionnaire_answers(
        &self,
        questionnaire_id: &str,
    ) -> Result<Vec<AnswerRecord>, StoreError> {
        let answers = sqlx::query_as::<_, AnswerRecord>(
            r#"
            SELECT id, questionnaire_id, question_id, option_id, session, created_at
            FROM answers
            WHERE questionnaire_id = $1
            ORDER BY id
            "#,
        )
        .bind(questionnaire_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    async fn insert_answer(&self, answer: NewAnswer) -> Result<AnswerRecord, StoreError> {
        let record = sqlx::query_as::<_, AnswerRecord>(
            r#"
            INSERT INTO answers (questionnaire_id, question_id, option_id, session)
            VALUES ($1, $2, $3, $4)
            RETURNING id, questionnaire_id, question_id, option_id, session, created_at
            "#,
        )
        .bind(&answer.questionnaire_id)
        .bind(&answer.question_id)
        .bind(&answer.option_id)
        .bind(&answer.session)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert answer: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(record)
    }

    async fn delete_answers(&self, questionnaire_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM answers WHERE questionnaire_id = $1")
            .bind(questionnaire_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all_answers(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM answers").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
