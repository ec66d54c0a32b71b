// src/flow/mod.rs

//! Question-flow rules for answer submissions.

pub mod graph;
pub mod validator;

pub use graph::QuestionGraph;
pub use validator::{AnswerFlowValidator, FlowError, RejectionReason};
