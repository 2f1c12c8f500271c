use crate::data::{patch::PatchError, validation::StudentValidationErrors};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;
use std::{collections::BTreeMap, num::ParseIntError};

pub type CollegeResult<T> = Result<T, CollegeError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CollegeError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse body limit {:?}", original))]
    ParseBodyLimit {
        source: ParseIntError,
        original: String,
    },
    #[snafu(display("Unable to find timezone {:?}", tz))]
    InvalidTimezone { source: jiff::Error, tz: String },
    #[snafu(display("Unable to listen on {}", address))]
    BindListener {
        source: std::io::Error,
        address: String,
    },
    #[snafu(display("Error serving app"))]
    Serve { source: std::io::Error },
    #[snafu(display("The student id must be a positive integer, got {}", id))]
    NonPositiveId { id: i32 },
    #[snafu(display("Unable to parse student id {:?}", original))]
    ParseId {
        source: ParseIntError,
        original: String,
    },
    #[snafu(display("The student name must not be empty"))]
    EmptyName,
    #[snafu(display("The student with id {} not found", id))]
    MissingStudent { id: i32 },
    #[snafu(display("The student with name {} not found", name))]
    MissingStudentByName { name: String },
    #[snafu(display("One or more validation errors occurred."))]
    Validation { errors: StudentValidationErrors },
    #[snafu(display("Invalid student path: {}", source.body_text()))]
    MalformedPath { source: PathRejection },
    #[snafu(display("Invalid request body: {}", source.body_text()))]
    MalformedBody { source: JsonRejection },
    #[snafu(display("Unable to apply patch: {}", source))]
    Patch { source: PatchError },
    #[snafu(display("Ran out of student ids after {}", last))]
    IdsExhausted { last: i32 },
    #[snafu(display("A request handler panicked"))]
    HandlerPanicked,
}

#[derive(Serialize)]
struct ProblemDetails {
    title: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<&'static str, Vec<&'static str>>>,
}

impl IntoResponse for CollegeError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        let status_code = match &self {
            Self::BadEnvVar { .. } | Self::ParseBodyLimit { .. } | Self::InvalidTimezone { .. } => {
                ISE
            }
            Self::BindListener { .. } | Self::Serve { .. } => ISE,
            Self::NonPositiveId { .. } | Self::ParseId { .. } | Self::EmptyName => BI,
            Self::MalformedPath { .. } => BI,
            Self::MissingStudent { .. } | Self::MissingStudentByName { .. } => NF,
            Self::Validation { .. } => BI,
            Self::MalformedBody { source } => match source {
                JsonRejection::BytesRejection(bytes) => bytes.status(),
                _ => BI,
            },
            Self::Patch { .. } => BI,
            Self::IdsExhausted { .. } | Self::HandlerPanicked => ISE,
        };

        let title = if status_code.is_server_error() {
            error!(?self, "Internal error!");
            "An internal error occurred".to_string()
        } else {
            warn!(%self, "Rejected request");
            self.to_string()
        };

        let errors = match &self {
            Self::Validation { errors } => Some(errors.by_field()),
            _ => None,
        };

        let body = ProblemDetails {
            title,
            status: status_code.as_u16(),
            errors,
        };
        (status_code, Json(body)).into_response()
    }
}
