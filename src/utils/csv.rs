// src/utils/csv.rs

use crate::{
    error::AppError,
    models::{
        answer::{ExportedAnswer, QuestionAnswers, SessionAnswers},
        questionnaire::{QuestionView, QuestionnaireView, required_flag},
    },
};

/// A value that renders as one CSV row.
/// Nested lists go into a single cell as JSON.
pub trait CsvRecord {
    fn headers() -> &'static [&'static str];

    fn fields(&self) -> Result<Vec<String>, serde_json::Error>;
}

/// Renders a header row followed by one row per record.
pub fn to_csv<T: CsvRecord>(records: &[T]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(T::headers())
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    for record in records {
        let fields = record
            .fields()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        writer
            .write_record(&fields)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| AppError::InternalServerError(e.to_string()))
}

impl CsvRecord for QuestionnaireView {
    fn headers() -> &'static [&'static str] {
        &["questionnaireID", "questionnaireTitle", "keywords", "questions"]
    }

    fn fields(&self) -> Result<Vec<String>, serde_json::Error> {
        Ok(vec![
            self.questionnaire_id.clone(),
            self.title.clone(),
            serde_json::to_string(&self.keywords)?,
            serde_json::to_string(&self.questions)?,
        ])
    }
}

impl CsvRecord for QuestionView {
    fn headers() -> &'static [&'static str] {
        &["questionnaireID", "qID", "qtext", "required", "type", "options"]
    }

    fn fields(&self) -> Result<Vec<String>, serde_json::Error> {
        let options: Vec<[&str; 3]> = self
            .options
            .iter()
            .map(|o| [o.id.as_str(), o.text.as_str(), o.next_question_id.as_str()])
            .collect();

        Ok(vec![
            self.questionnaire_id.clone(),
            self.id.clone(),
            self.text.clone(),
            required_flag::as_str(self.required).to_string(),
            self.question_type.clone(),
            serde_json::to_string(&options)?,
        ])
    }
}

impl CsvRecord for SessionAnswers {
    fn headers() -> &'static [&'static str] {
        &["questionnaireID", "session", "answers"]
    }

    fn fields(&self) -> Result<Vec<String>, serde_json::Error> {
        let answers: Vec<[&str; 2]> = self
            .answers
            .iter()
            .map(|a| [a.question_id.as_str(), a.option_id.as_str()])
            .collect();

        Ok(vec![
            self.questionnaire_id.clone(),
            self.session.clone(),
            serde_json::to_string(&answers)?,
        ])
    }
}

impl CsvRecord for QuestionAnswers {
    fn headers() -> &'static [&'static str] {
        &["questionnaireID", "questionID", "answers"]
    }

    fn fields(&self) -> Result<Vec<String>, serde_json::Error> {
        let answers: Vec<[&str; 2]> = self
            .answers
            .iter()
            .map(|a| [a.session.as_str(), a.option_id.as_str()])
            .collect();

        Ok(vec![
            self.questionnaire_id.clone(),
            self.question_id.clone(),
            serde_json::to_string(&answers)?,
        ])
    }
}

impl CsvRecord for ExportedAnswer {
    fn headers() -> &'static [&'static str] {
        &["questionID", "ans"]
    }

    fn fields(&self) -> Result<Vec<String>, serde_json::Error> {
        Ok(vec![self.question_id.clone(), self.option_id.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_then_rows() {
        let rows = vec![
            ExportedAnswer {
                question_id: "Q01".to_string(),
                option_id: "Q01A1".to_string(),
            },
            ExportedAnswer {
                question_id: "Q02".to_string(),
                option_id: "Q02A2".to_string(),
            },
        ];

        let out = to_csv(&rows).unwrap();
        assert_eq!(out, "questionID,ans\nQ01,Q01A1\nQ02,Q02A2\n");
    }

    #[test]
    fn nested_lists_are_quoted_json() {
        let answers = SessionAnswers {
            questionnaire_id: "QQ000".to_string(),
            session: "AAAA".to_string(),
            answers: vec![crate::models::answer::SessionAnswer {
                question_id: "Q01".to_string(),
                option_id: "Q01A1".to_string(),
            }],
        };

        let out = to_csv(std::slice::from_ref(&answers)).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("questionnaireID,session,answers"));
        assert_eq!(lines.next(), Some(r#"QQ000,AAAA,"[[""Q01"",""Q01A1""]]""#));
    }
}
