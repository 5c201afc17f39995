use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

use crate::validation::ValidationErrors;

/// Shown to callers for every internal failure; the detail stays in the logs.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
    pub fields: Option<ValidationErrors>,
}

impl Error {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: None,
        }
    }

    pub fn is_internal(&self) -> bool {
        (1..=99).contains(&self.code)
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 103
    }
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        validation_error(errors)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_MESSAGE),
            102 => (StatusCode::UNPROCESSABLE_ENTITY, self.message.as_str()),
            103 => (StatusCode::NOT_FOUND, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = self.code, message = %self.message, "request failed");
        }

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
            "fields": self.fields,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_state_error() -> Error {
    Error::new(100, "invalid state")
}

pub fn invalid_input_error() -> Error {
    Error::new(101, "invalid input")
}

pub fn validation_error(errors: ValidationErrors) -> Error {
    Error {
        code: 102,
        message: "booking details are incomplete or invalid".into(),
        fields: Some(errors),
    }
}

pub fn not_found_error() -> Error {
    Error::new(103, "not found")
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error::new(1, "environment variable error")
}

pub fn config_error(key: &str) -> Error {
    Error::new(1, format!("invalid configuration value for {}", key))
}

pub fn database_error<T: Debug>(err: T) -> Error {
    Error::new(2, format!("database error: {:?}", err))
}

pub fn server_error<T: Debug>(err: T) -> Error {
    Error::new(3, format!("server error: {:?}", err))
}

pub fn simulated_failure_error() -> Error {
    Error::new(4, "simulated backend failure")
}

pub fn reference_exhausted_error() -> Error {
    Error::new(5, "no free booking reference")
}

#[test]
fn maps_codes_to_status() {
    let internal: Error = env::VarError::NotPresent.into();
    assert!(internal.is_internal());
    assert_eq!(
        internal.into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );

    assert_eq!(
        invalid_state_error().into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        validation_error(ValidationErrors::default())
            .into_response()
            .status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        not_found_error().into_response().status(),
        StatusCode::NOT_FOUND
    );
}
