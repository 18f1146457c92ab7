use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use polybites_api_types::{ErrorBody, ErrorDetail};

use crate::application::error::{ErrorReport, ServiceError};
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const INTERNAL: &str = "internal_error";
}

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
    /// Diagnostic chain for the response logger. Never serialised.
    chain: Vec<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
            chain: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, codes::FORBIDDEN, message, None)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn internal(error: &dyn std::error::Error) -> Self {
        let report = ErrorReport::from_error(
            "infra::http::api",
            StatusCode::INTERNAL_SERVER_ERROR,
            error,
        );
        Self {
            chain: report.messages,
            ..Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL,
                INTERNAL_MESSAGE,
                None,
            )
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(DomainError::NotFound { entity }) => {
                ApiError::not_found(format!("{} not found", capitalize(entity)))
            }
            ServiceError::Domain(DomainError::Validation { message }) => {
                ApiError::bad_request(message, None)
            }
            ServiceError::Domain(DomainError::Forbidden { message }) => ApiError::forbidden(message),
            ServiceError::Repo(RepoError::NotFound) => ApiError::not_found("Resource not found"),
            ServiceError::Repo(RepoError::Duplicate { constraint }) => ApiError::new(
                StatusCode::CONFLICT,
                codes::DUPLICATE,
                "Resource already exists",
                Some(constraint),
            ),
            ServiceError::Repo(RepoError::InvalidInput { message }) => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_INPUT,
                "Invalid input",
                Some(message),
            ),
            other => ApiError::internal(&other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let messages = if self.chain.is_empty() {
            vec![format!(
                "{}: {}",
                self.code,
                self.hint.as_deref().unwrap_or(&self.message)
            )]
        } else {
            self.chain
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport {
            source: "infra::http::api",
            status: self.status,
            messages,
        }
        .attach(&mut response);
        response
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
