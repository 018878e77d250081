//! Error types for templates

use thiserror::Error;

/// The template payload is invalid
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidTemplateError {
    /// Name is empty
    #[error("Template name must not be empty")]
    EmptyName,
}

/// Errors that can occur when resolving a template for rendering
#[derive(Debug, Error)]
pub enum TemplateSourceError {
    /// No template with that name
    #[error("template '{0}' not found")]
    NotFound(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that can occur when getting a template
#[derive(Debug, Error)]
pub enum GetTemplateError {
    /// Template not found
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that can occur when creating a template
#[derive(Debug, Error)]
pub enum CreateTemplateError {
    /// Template with that name already exists
    #[error("Template '{0}' already exists")]
    DuplicateTemplate(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that can occur when updating a template
#[derive(Debug, Error)]
pub enum UpdateTemplateError {
    /// Template not found
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// The template was renamed to a name that is already taken
    #[error("Template '{0}' already exists")]
    DuplicateTemplate(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that can occur when deleting a template
#[derive(Debug, Error)]
pub enum DeleteTemplateError {
    /// Template not found
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl From<GetTemplateError> for TemplateSourceError {
    fn from(err: GetTemplateError) -> Self {
        match err {
            GetTemplateError::TemplateNotFound(name) => TemplateSourceError::NotFound(name),
            GetTemplateError::UnknownError(e) => TemplateSourceError::UnknownError(e),
        }
    }
}
