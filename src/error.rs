use mongodb::error::Error as DbError;
use rocket::{
    http::{Status, StatusClass},
    response::Responder,
    serde::json::Json,
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::common::{ParseChoiceError, ParseEmailError};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while handling a request.
#[derive(Debug, Error)]
pub enum Error {
    /// The email was missing or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The choice was outside the fixed choice set.
    #[error("Invalid choice: {0}")]
    InvalidChoice(String),
    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The participant has already cast their one vote.
    #[error("Already voted: {0}")]
    AlreadyVoted(String),
    /// The store rejected or failed the operation; the caller may retry.
    #[error("Store unavailable: {0}")]
    Store(#[from] DbError),
}

impl Error {
    /// The machine-readable code identifying this kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::InvalidChoice(_) => "InvalidChoice",
            Self::NotFound(_) => "NotFound",
            Self::AlreadyVoted(_) => "AlreadyVoted",
            Self::Store(_) => "StoreUnavailable",
        }
    }

    /// The HTTP status this error answers with.
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidInput(_) | Self::InvalidChoice(_) => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
            Self::AlreadyVoted(_) => Status::Conflict,
            Self::Store(_) => Status::ServiceUnavailable,
        }
    }
}

impl From<ParseEmailError> for Error {
    fn from(err: ParseEmailError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<ParseChoiceError> for Error {
    fn from(err: ParseChoiceError) -> Self {
        Self::InvalidChoice(err.to_string())
    }
}

/// The JSON body attached to every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable taxonomy name, e.g. `AlreadyVoted`.
    pub code: String,
    /// Human-readable description.
    pub error: String,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        match status.class() {
            StatusClass::ServerError => error!("{self}"),
            _ => warn!("{self}"),
        }
        let body = Json(ErrorResponse {
            code: self.code().to_string(),
            error: self.to_string(),
        });
        let mut response = body.respond_to(req)?;
        response.set_status(status);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_the_taxonomy() {
        let cases = [
            (Error::InvalidInput("x".into()), Status::BadRequest),
            (Error::InvalidChoice("x".into()), Status::BadRequest),
            (Error::NotFound("x".into()), Status::NotFound),
            (Error::AlreadyVoted("x".into()), Status::Conflict),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status);
        }
    }

    #[test]
    fn codes_match_the_taxonomy() {
        assert_eq!(Error::InvalidInput("x".into()).code(), "InvalidInput");
        assert_eq!(Error::InvalidChoice("x".into()).code(), "InvalidChoice");
        assert_eq!(Error::NotFound("x".into()).code(), "NotFound");
        assert_eq!(Error::AlreadyVoted("x".into()).code(), "AlreadyVoted");
    }

    #[test]
    fn parse_errors_convert_to_the_right_variants() {
        let error: Error = "oops".parse::<crate::model::common::Email>().unwrap_err().into();
        assert_eq!(error.code(), "InvalidInput");

        let error: Error = "oops"
            .parse::<crate::model::common::Choice>()
            .unwrap_err()
            .into();
        assert_eq!(error.code(), "InvalidChoice");
    }
}
