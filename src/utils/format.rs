// src/utils/format.rs

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::{
    error::AppError,
    utils::csv::{CsvRecord, to_csv},
};

/// Output selector accepted by every read endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
}

/// Query parameters: `?format=json|csv`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FormatParams {
    /// `csv` for CSV output; anything else means JSON.
    pub format: Option<String>,
}

impl FormatParams {
    pub fn format(&self) -> ResponseFormat {
        match self.format.as_deref() {
            Some("csv") => ResponseFormat::Csv,
            _ => ResponseFormat::Json,
        }
    }
}

/// Renders one record: a JSON object, or a one-row CSV table.
pub fn render_one<T>(format: ResponseFormat, record: T) -> Result<Response, AppError>
where
    T: Serialize + CsvRecord,
{
    match format {
        ResponseFormat::Json => Ok(Json(record).into_response()),
        ResponseFormat::Csv => csv_response(to_csv(std::slice::from_ref(&record))?),
    }
}

/// Renders a list: a JSON array, or a CSV table with one row per record.
pub fn render_many<T>(format: ResponseFormat, records: Vec<T>) -> Result<Response, AppError>
where
    T: Serialize + CsvRecord,
{
    match format {
        ResponseFormat::Json => Ok(Json(records).into_response()),
        ResponseFormat::Csv => csv_response(to_csv(&records)?),
    }
}

fn csv_response(body: String) -> Result<Response, AppError> {
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response())
}
