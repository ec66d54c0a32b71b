// src/models/mod.rs

pub mod answer;
pub mod questionnaire;
pub mod status;
