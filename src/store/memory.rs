// src/store/memory.rs

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    models::{
        answer::{AnswerRecord, NewAnswer},
        questionnaire::Questionnaire,
    },
    store::{AnswerStore, QuestionnaireStore, StoreError},
};

/// Process-local store. Used by the test-suite and for `STORE=memory` runs.
/// Contents are lost on shutdown.
#[derive(Debug, Default)]
pub struct MemoryStore {
    questionnaires: RwLock<Vec<Questionnaire>>,
    answers: RwLock<Vec<AnswerRecord>>,
    next_answer_id: AtomicI64,
}

#[async_trait]
impl QuestionnaireStore for MemoryStore {
    async fn find_questionnaire(&self, id: &str) -> Result<Option<Questionnaire>, StoreError> {
        let questionnaires = self.questionnaires.read().await;
        Ok(questionnaires.iter().rev().find(|q| q.id == id).cloned())
    }

    async fn insert_questionnaires(
        &self,
        questionnaires: Vec<Questionnaire>,
    ) -> Result<usize, StoreError> {
        let count = questionnaires.len();
        self.questionnaires.write().await.extend(questionnaires);
        Ok(count)
    }

    async fn delete_all_questionnaires(&self) -> Result<u64, StoreError> {
        let mut questionnaires = self.questionnaires.write().await;
        let count = questionnaires.len() as u64;
        questionnaires.clear();
        Ok(count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl AnswerStore for MemoryStore {
    async fn find_answers(
        &self,
        questionnaire_id: &str,
        session: &str,
    ) -> Result<Vec<AnswerRecord>, StoreError> {
        let answers = self.answers.read().await;
        Ok(answers
            .iter()
            .filter(|a| a.questionnaire_id == questionnaire_id && a.session == session)
            .cloned()
            .collect())
    }

    async fn find_question_answers(
        &self,
        questionnaire_id: &str,
        question_id: &str,
    ) -> Result<Vec<AnswerRecord>, StoreError> {
        let answers = self.answers.read().await;
        Ok(answers
            .iter()
            .filter(|a| a.questionnaire_id == questionnaire_id && a.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn find_questionnaire_answers(
        &self,
        questionnaire_id: &str,
    ) -> Result<Vec<AnswerRecord>, StoreError> {
        let answers = self.answers.read().await;
        Ok(answers
            .iter()
            .filter(|a| a.questionnaire_id == questionnaire_id)
            .cloned()
            .collect())
    }

    async fn insert_answer(&self, answer: NewAnswer) -> Result<AnswerRecord, StoreError> {
        let record = AnswerRecord {
            id: self.next_answer_id.fetch_add(1, Ordering::Relaxed) + 1,
            questionnaire_id: answer.questionnaire_id,
            question_id: answer.question_id,
            option_id: answer.option_id,
            session: answer.session,
            created_at: chrono::Utc::now(),
        };
        self.answers.write().await.push(record.clone());
        Ok(record)
    }

    async fn delete_answers(&self, questionnaire_id: &str) -> Result<u64, StoreError> {
        let mut answers = self.answers.write().await;
        let before = answers.len();
        answers.retain(|a| a.questionnaire_id != questionnaire_id);
        Ok((before - answers.len()) as u64)
    }

    async fn delete_all_answers(&self) -> Result<u64, StoreError> {
        let mut answers = self.answers.write().await;
        let count = answers.len() as u64;
        answers.clear();
        Ok(count)
    }
}
