//! Error types for sending emails

use thiserror::Error;
use tracing::debug;

use crate::domain::{
    emails::{EmailAddressError, MailerError},
    templates::errors::TemplateSourceError,
};

/// Errors that can occur while composing and dispatching an email
#[derive(Debug, Error)]
pub enum EmailError {
    /// The relay could not be reached, or refused the TLS upgrade or the credentials
    #[error("Failed to connect to SMTP server: {0}")]
    ConnectionFailed(String),

    /// The relay rejected the message after the session was established
    #[error("Failed to send email: {0}")]
    SendFailed(String),

    /// The requested template does not exist
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// The template exists but could not be rendered with the supplied data
    #[error("Failed to render template '{name}': {reason}")]
    TemplateRender {
        /// Template name
        name: String,

        /// Renderer error message
        reason: String,
    },

    /// The request could not be turned into a valid message
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl From<MailerError> for EmailError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> EmailError");

        match err {
            MailerError::Connection(reason) => EmailError::ConnectionFailed(reason),
            MailerError::Send(reason) => EmailError::SendFailed(reason),
        }
    }
}

impl From<TemplateSourceError> for EmailError {
    fn from(err: TemplateSourceError) -> Self {
        debug!("TemplateSourceError -> EmailError");

        match err {
            TemplateSourceError::NotFound(name) => EmailError::TemplateNotFound(name),
            TemplateSourceError::UnknownError(e) => EmailError::UnknownError(e),
        }
    }
}

impl From<EmailAddressError> for EmailError {
    fn from(err: EmailAddressError) -> Self {
        EmailError::InvalidInput(format!("Invalid email address: {err}"))
    }
}

impl From<lettre::address::AddressError> for EmailError {
    fn from(err: lettre::address::AddressError) -> Self {
        EmailError::InvalidInput(format!("Invalid email address: {err}"))
    }
}

impl From<lettre::error::Error> for EmailError {
    fn from(err: lettre::error::Error) -> Self {
        EmailError::InvalidInput(format!("Could not build email message: {err}"))
    }
}
