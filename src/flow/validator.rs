// src/flow/validator.rs

use std::{fmt, sync::Arc};

use crate::{
    flow::graph::QuestionGraph,
    models::answer::{AnswerRecord, AnswerSubmission, NewAnswer},
    store::{AnswerStore, QuestionnaireStore, StoreError},
};

/// Why a submission was refused. Each reason has a fixed user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Questionnaire, question or option does not exist.
    InvalidFields,
    /// First submission of a session skips a required question.
    RequiredFirst,
    /// Question is not reachable from the session's recorded path.
    Unreachable,
}

impl RejectionReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::InvalidFields => "Please check again your answer fields.",
            RejectionReason::RequiredFirst => "Please answer required questions first.",
            RejectionReason::Unreachable => "Cannot answer that question.",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("answer rejected: {0}")]
    Rejected(RejectionReason),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<RejectionReason> for FlowError {
    fn from(reason: RejectionReason) -> Self {
        FlowError::Rejected(reason)
    }
}

/// Validates answer submissions against the question flow and records them.
///
/// Stateless: the questionnaire and the session history are loaded fresh on
/// every call, so questionnaire replacements between submissions are honoured.
#[derive(Clone)]
pub struct AnswerFlowValidator {
    questionnaires: Arc<dyn QuestionnaireStore>,
    answers: Arc<dyn AnswerStore>,
}

impl AnswerFlowValidator {
    pub fn new(questionnaires: Arc<dyn QuestionnaireStore>, answers: Arc<dyn AnswerStore>) -> Self {
        Self {
            questionnaires,
            answers,
        }
    }

    /// Decides whether `question_id`/`option_id` may be answered, given the
    /// session's earlier answers to the same questionnaire (insertion order).
    pub fn validate(
        graph: &QuestionGraph<'_>,
        history: &[AnswerRecord],
        question_id: &str,
        option_id: &str,
    ) -> Result<(), RejectionReason> {
        if !graph.contains_option(question_id, option_id) {
            return Err(RejectionReason::InvalidFields);
        }

        if history.is_empty() {
            if graph.is_first(question_id) || !graph.required_before(question_id) {
                return Ok(());
            }
            return Err(RejectionReason::RequiredFirst);
        }

        // Some predecessor must have been answered with an option leading here.
        // With merging branches only the predecessor the session actually took counts.
        let reachable = graph.predecessors(question_id).into_iter().any(|prev| {
            history
                .iter()
                .rev()
                .find(|a| a.question_id == prev.id)
                .is_some_and(|latest| {
                    graph.next(&prev.id, &latest.option_id) == Some(question_id)
                })
        });

        if reachable {
            Ok(())
        } else {
            Err(RejectionReason::Unreachable)
        }
    }

    pub async fn validate_and_record(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<AnswerRecord, FlowError> {
        let questionnaire = self
            .questionnaires
            .find_questionnaire(&submission.questionnaire_id)
            .await?
            .ok_or(RejectionReason::InvalidFields)?;
        let graph = QuestionGraph::build(&questionnaire);

        let history = self
            .answers
            .find_answers(&submission.questionnaire_id, &submission.session)
            .await?;

        if let Err(reason) = Self::validate(
            &graph,
            &history,
            &submission.question_id,
            &submission.option_id,
        ) {
            tracing::debug!(
                questionnaire = %submission.questionnaire_id,
                question = %submission.question_id,
                session = %submission.session,
                "Answer rejected: {}",
                reason
            );
            return Err(reason.into());
        }

        // Re-answering is allowed; both rows are kept.
        if history.iter().any(|a| a.question_id == submission.question_id) {
            tracing::warn!(
                questionnaire = %submission.questionnaire_id,
                question = %submission.question_id,
                session = %submission.session,
                "Session answered the same question again"
            );
        }

        let record = self.answers.insert_answer(NewAnswer::from(submission)).await?;
        tracing::info!(
            questionnaire = %record.questionnaire_id,
            question = %record.question_id,
            session = %record.session,
            "Answer Submited."
        );

        Ok(record)
    }
}
