use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::actix_multipart::MultipartError;
use crate::dotenv::Error as DotError;
use crate::jsonwebtoken::errors::Error as JsonWebTokenError;
use crate::response::{redirect_with_notice, Level, Notice};
use crate::sqlx::migrate::MigrateError;
use crate::thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Invalid credentials!")]
    InvalidCredentials,

    #[error("Account pending admin approval.")]
    PendingApproval,

    #[error("Registration failed. Roll number may already exist.")]
    DuplicateRollNumber,

    #[error("Election not found or no longer active.")]
    ElectionNotFound,

    #[error("Access denied: you can only vote in {0} department elections.")]
    NotEligible(String),

    #[error("You have already voted in this election!")]
    AlreadyVoted,

    #[error("The selected candidate does not stand in this election.")]
    InvalidCandidate,

    #[error("User not found.")]
    UserNotFound,

    #[error("Please log in first.")]
    LoginRequired,

    #[error("Access denied.")]
    AccessDenied,

    #[error("Error deleting election.")]
    ReferentialDeleteFailure,

    #[error("Photo upload failed: {0}")]
    UploadFailure(String),

    #[error("{0}")]
    BusinessError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] MigrateError),

    #[error("session token error: {0}")]
    JWTError(#[from] JsonWebTokenError),

    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("dotenv error: {0}")]
    DotEnvError(#[from] DotError),
}

impl From<MultipartError> for Error {
    fn from(e: MultipartError) -> Self {
        Error::UploadFailure(e.to_string())
    }
}

impl Error {
    /// Infrastructure failures are never shown verbatim to the client.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::ConfigError(_) | Error::DatabaseError(_) | Error::MigrateError(_) | Error::JWTError(_) | Error::IOError(_) | Error::DotEnvError(_)
        )
    }

    pub fn level(&self) -> Level {
        match self {
            Error::PendingApproval | Error::AlreadyVoted | Error::LoginRequired => Level::Warning,
            _ => Level::Danger,
        }
    }

    pub fn notice(&self) -> Notice {
        if self.is_internal() {
            log::error!("{}", self);
            return Notice::new(Level::Danger, "Something went wrong, please try again.");
        }
        Notice::new(self.level(), self.to_string())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        redirect_with_notice("/", self.notice())
    }
}

/// An error paired with the page the client is sent back to.
#[derive(Debug, ThisError)]
#[error("{error}")]
pub struct Rejection {
    pub error: Error,
    pub location: String,
}

impl Rejection {
    pub fn new(error: Error, location: impl Into<String>) -> Self {
        Self { error, location: location.into() }
    }
}

impl From<Error> for Rejection {
    fn from(error: Error) -> Self {
        Rejection::new(error, "/")
    }
}

impl ResponseError for Rejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        redirect_with_notice(&self.location, self.error.notice())
    }
}

pub trait OrRedirect<T> {
    fn or_redirect(self, location: &str) -> Result<T, Rejection>;
}

impl<T, E> OrRedirect<T> for Result<T, E>
where
    E: Into<Error>,
{
    fn or_redirect(self, location: &str) -> Result<T, Rejection> {
        self.map_err(|e| Rejection::new(e.into(), location))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::http::header;

    #[test]
    fn test_domain_error_keeps_its_message() {
        let notice = Error::AlreadyVoted.notice();
        assert_eq!(notice.level, Level::Warning);
        assert_eq!(notice.message, "You have already voted in this election!");
    }

    #[test]
    fn test_internal_error_is_hidden() {
        let notice = Error::DatabaseError(sqlx::Error::RowNotFound).notice();
        assert_eq!(notice.level, Level::Danger);
        assert!(!notice.message.contains("database"));
    }

    #[test]
    fn test_rejection_redirects_to_location() {
        let res: Result<(), Error> = Err(Error::ElectionNotFound);
        let rejection = res.or_redirect("/student_dashboard").unwrap_err();
        let resp = rejection.error_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/student_dashboard");
        assert!(resp.cookies().any(|c| c.name() == crate::response::FLASH_COOKIE));
    }
}
