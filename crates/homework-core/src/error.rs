//! Error types for the homework status relay.
//!
//! Each component returns only the kinds it owns. [`CycleError`] is the
//! union that the poll loop catches and turns into a failure notification.

use thiserror::Error;

/// Errors raised while fetching the status payload.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint could not be reached at all (DNS, refused, timeout, TLS).
    #[error("request to {url} failed (headers: {headers}, params: {params}): {cause}")]
    Connection {
        url: String,
        /// Header listing with the secret redacted.
        headers: String,
        params: String,
        cause: String,
    },

    /// The endpoint answered with something other than 200 OK.
    #[error("unexpected API response code: {0}")]
    UnexpectedStatus(u16),

    /// The response body is not valid JSON.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// The payload or a homework record lacks the expected structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("not a mapping")]
    NotAMapping,

    #[error("missing homeworks key")]
    MissingHomeworks,

    #[error("homeworks is not a list")]
    HomeworksNotAList,

    #[error("homework record is not a mapping")]
    RecordNotAMapping,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` is not a string")]
    FieldNotAString(&'static str),
}

/// Errors raised while turning a homework record into a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The record's status code has no verdict.
    #[error("unknown homework status: {0}")]
    UnknownStatus(String),
}

/// The chat channel rejected or failed to send a message.
#[derive(Debug, Error)]
#[error("failed to send message: {0}")]
pub struct DeliveryError(pub String);

/// Any failure inside a single poll cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Startup configuration errors. These stop the process before polling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required secrets are absent or empty.
    #[error("required credentials missing: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// A tunable could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Result type for cycle operations.
pub type Result<T> = std::result::Result<T, CycleError>;
