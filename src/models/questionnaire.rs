// src/models/questionnaire.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A questionnaire document, as imported from file and as stored.
/// Field names on the wire follow the questionnaire file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Questionnaire {
    #[serde(rename = "questionnaireID")]
    #[validate(length(min = 1, max = 100))]
    pub id: String,

    #[serde(rename = "questionnaireTitle")]
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    /// Ordered questions. Index 0 is the entry point of the flow.
    #[validate(custom(function = validate_questions), nested)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Question {
    #[serde(rename = "qID")]
    #[validate(length(min = 1, max = 100))]
    pub id: String,

    #[serde(rename = "qtext")]
    pub text: String,

    /// Only the literal "TRUE" (or JSON `true`) marks a question as required.
    #[serde(with = "required_flag")]
    #[schema(value_type = String, example = "TRUE")]
    pub required: bool,

    #[serde(rename = "type")]
    pub question_type: String,

    #[validate(custom(function = validate_options))]
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionOption {
    #[serde(rename = "optID")]
    pub id: String,

    #[serde(rename = "opttxt")]
    pub text: String,

    /// Successor pointer: the question to ask after this option is chosen.
    #[serde(rename = "nextqID")]
    pub next_question_id: String,
}

impl Questionnaire {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// Body of an import file: a single questionnaire or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuestionnaireUpload {
    Many(Vec<Questionnaire>),
    One(Box<Questionnaire>),
}

impl QuestionnaireUpload {
    pub fn into_vec(self) -> Vec<Questionnaire> {
        match self {
            QuestionnaireUpload::Many(list) => list,
            QuestionnaireUpload::One(q) => vec![*q],
        }
    }
}

fn validate_questions(questions: &[Question]) -> Result<(), ValidationError> {
    if questions.is_empty() {
        return Err(ValidationError::new("questions_cannot_be_empty"));
    }
    let mut seen = HashSet::new();
    for q in questions {
        if !seen.insert(q.id.as_str()) {
            return Err(ValidationError::new("duplicate_question_id"));
        }
    }
    Ok(())
}

fn validate_options(options: &[QuestionOption]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for opt in options {
        if opt.id.is_empty() {
            return Err(ValidationError::new("option_id_cannot_be_empty"));
        }
        if !seen.insert(opt.id.as_str()) {
            return Err(ValidationError::new("duplicate_option_id"));
        }
    }
    Ok(())
}

/// Serde adapter for the `required` flag.
/// Reads `true`/`false` or a string (only "TRUE" counts), writes "TRUE"/"FALSE".
pub(crate) mod required_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(required: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(as_str(*required))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Text(String),
        }

        Ok(match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => b,
            Flag::Text(text) => text == "TRUE",
        })
    }

    pub fn as_str(required: bool) -> &'static str {
        if required { "TRUE" } else { "FALSE" }
    }
}

/// Read model for `GET /questionnaire/{id}`: options are left out and
/// questions are sorted by id.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionnaireView {
    #[serde(rename = "questionnaireID")]
    pub questionnaire_id: String,
    #[serde(rename = "questionnaireTitle")]
    pub title: String,
    pub keywords: Vec<String>,
    pub questions: Vec<QuestionSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionSummary {
    #[serde(rename = "qID")]
    pub id: String,
    #[serde(rename = "qtext")]
    pub text: String,
    #[serde(with = "required_flag")]
    #[schema(value_type = String)]
    pub required: bool,
    #[serde(rename = "type")]
    pub question_type: String,
}

impl From<&Questionnaire> for QuestionnaireView {
    fn from(q: &Questionnaire) -> Self {
        let mut questions: Vec<QuestionSummary> = q
            .questions
            .iter()
            .map(|question| QuestionSummary {
                id: question.id.clone(),
                text: question.text.clone(),
                required: question.required,
                question_type: question.question_type.clone(),
            })
            .collect();
        questions.sort_by(|a, b| a.id.cmp(&b.id));

        Self {
            questionnaire_id: q.id.clone(),
            title: q.title.clone(),
            keywords: q.keywords.clone(),
            questions,
        }
    }
}

/// Read model for `GET /question/{questionnaire}/{question}`, options sorted by id.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionView {
    #[serde(rename = "questionnaireID")]
    pub questionnaire_id: String,
    #[serde(rename = "qID")]
    pub id: String,
    #[serde(rename = "qtext")]
    pub text: String,
    #[serde(with = "required_flag")]
    #[schema(value_type = String)]
    pub required: bool,
    #[serde(rename = "type")]
    pub question_type: String,
    pub options: Vec<QuestionOption>,
}

impl QuestionView {
    pub fn new(questionnaire_id: &str, question: &Question) -> Self {
        let mut options = question.options.clone();
        options.sort_by(|a, b| a.id.cmp(&b.id));

        Self {
            questionnaire_id: questionnaire_id.to_string(),
            id: question.id.clone(),
            text: question.text.clone(),
            required: question.required,
            question_type: question.question_type.clone(),
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = r#"{
        "questionnaireID": "QQ000",
        "questionnaireTitle": "My first research questionnaire",
        "keywords": ["footbal", "islands", "timezone"],
        "questions": [
            {
                "qID": "Q01", "qtext": "What is your favourite colour?", "required": "TRUE", "type": "question",
                "options": [{ "optID": "Q01A1", "opttxt": "Green", "nextqID": "Q02" }]
            },
            {
                "qID": "Q02", "qtext": "Do you like football?", "required": "true", "type": "profile",
                "options": [{ "optID": "Q02A1", "opttxt": "Yes", "nextqID": "-" }]
            }
        ]
    }"#;

    #[test]
    fn only_upper_case_true_marks_a_question_required() {
        let q: Questionnaire = serde_json::from_str(FILE).unwrap();
        assert!(q.questions[0].required);
        assert!(!q.questions[1].required);

        let q: Question = serde_json::from_value(serde_json::json!({
            "qID": "Q09", "qtext": "t", "required": true, "type": "question", "options": []
        }))
        .unwrap();
        assert!(q.required);
    }

    #[test]
    fn required_flag_is_written_back_as_text() {
        let q: Questionnaire = serde_json::from_str(FILE).unwrap();
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["questions"][0]["required"], "TRUE");
        assert_eq!(value["questions"][1]["required"], "FALSE");
        assert_eq!(value["questions"][0]["options"][0]["nextqID"], "Q02");
    }

    #[test]
    fn upload_accepts_single_document_or_list() {
        let one: QuestionnaireUpload = serde_json::from_str(FILE).unwrap();
        assert_eq!(one.into_vec().len(), 1);

        let many: QuestionnaireUpload = serde_json::from_str(&format!("[{FILE},{FILE}]")).unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }

    #[test]
    fn validation_rejects_duplicate_ids() {
        let mut q: Questionnaire = serde_json::from_str(FILE).unwrap();
        assert!(q.validate().is_ok());

        q.questions[1].id = "Q01".to_string();
        assert!(q.validate().is_err());

        let mut q: Questionnaire = serde_json::from_str(FILE).unwrap();
        let dup = q.questions[0].options[0].clone();
        q.questions[0].options.push(dup);
        assert!(q.validate().is_err());

        q.questions.clear();
        assert!(q.validate().is_err());
    }

    #[test]
    fn views_sort_by_id() {
        let mut q: Questionnaire = serde_json::from_str(FILE).unwrap();
        q.questions.reverse();
        q.questions[1].options.insert(
            0,
            QuestionOption {
                id: "Q01A2".to_string(),
                text: "Red".to_string(),
                next_question_id: "-".to_string(),
            },
        );

        let view = QuestionnaireView::from(&q);
        let ids: Vec<_> = view.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, ["Q01", "Q02"]);

        let view = QuestionView::new("QQ000", q.question("Q01").unwrap());
        let ids: Vec<_> = view.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["Q01A1", "Q01A2"]);
    }
}
