// src/flow/graph.rs

use std::collections::{HashMap, HashSet};

use crate::models::questionnaire::{Question, Questionnaire};

/// Explicit adjacency structure of a questionnaire's question flow.
///
/// Edges are labelled by option: `(question, option) -> next question`.
/// Built once per load; borrows from the questionnaire it was built from.
#[derive(Debug)]
pub struct QuestionGraph<'a> {
    questionnaire: &'a Questionnaire,
    edges: HashMap<(&'a str, &'a str), &'a str>,
    incoming: HashMap<&'a str, Vec<(&'a str, &'a str)>>,
}

impl<'a> QuestionGraph<'a> {
    pub fn build(questionnaire: &'a Questionnaire) -> Self {
        let mut edges = HashMap::new();
        let mut incoming: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();

        for question in &questionnaire.questions {
            for option in &question.options {
                let next = option.next_question_id.as_str();
                edges
                    .entry((question.id.as_str(), option.id.as_str()))
                    .or_insert(next);
                incoming
                    .entry(next)
                    .or_default()
                    .push((question.id.as_str(), option.id.as_str()));
            }
        }

        Self {
            questionnaire,
            edges,
            incoming,
        }
    }

    /// Entry point of the flow (index 0).
    pub fn first_question(&self) -> Option<&'a Question> {
        self.questionnaire.questions.first()
    }

    pub fn is_first(&self, question_id: &str) -> bool {
        self.first_question().is_some_and(|q| q.id == question_id)
    }

    pub fn contains_option(&self, question_id: &str, option_id: &str) -> bool {
        self.edges.contains_key(&(question_id, option_id))
    }

    /// Successor reached by choosing `option_id` on `question_id`.
    pub fn next(&self, question_id: &str, option_id: &str) -> Option<&'a str> {
        self.edges.get(&(question_id, option_id)).copied()
    }

    /// Every question with at least one option pointing at `question_id`,
    /// in questionnaire order.
    pub fn predecessors(&self, question_id: &str) -> Vec<&'a Question> {
        let Some(sources) = self.incoming.get(question_id) else {
            return Vec::new();
        };
        let ids: HashSet<&str> = sources.iter().map(|(q, _)| *q).collect();

        self.questionnaire
            .questions
            .iter()
            .filter(|q| ids.contains(q.id.as_str()))
            .collect()
    }

    /// True when a required question sits before `question_id` in the
    /// questionnaire's linear order.
    pub fn required_before(&self, question_id: &str) -> bool {
        self.questionnaire
            .questions
            .iter()
            .take_while(|q| q.id != question_id)
            .any(|q| q.required)
    }
}
