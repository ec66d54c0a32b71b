// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    flow::validator::AnswerFlowValidator,
    store::{AnswerStore, QuestionnaireStore},
};

#[derive(Clone)]
pub struct AppState {
    pub questionnaires: Arc<dyn QuestionnaireStore>,
    pub answers: Arc<dyn AnswerStore>,
    pub config: Config,
}

impl AppState {
    /// Builds the state from a single store serving both roles.
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: QuestionnaireStore + AnswerStore + 'static,
    {
        Self {
            questionnaires: store.clone(),
            answers: store,
            config,
        }
    }

    pub fn validator(&self) -> AnswerFlowValidator {
        AnswerFlowValidator::new(self.questionnaires.clone(), self.answers.clone())
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
