//! Template model

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::templates::errors::InvalidTemplateError;

/// A stored HTML template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    /// Template UUID
    pub id: Uuid,

    /// Unique template name
    pub name: String,

    /// HTML source
    pub content: String,

    /// Created at date in UTC
    pub created_at: DateTime<Utc>,

    /// Last updated at date in UTC
    pub updated_at: Option<DateTime<Utc>>,
}

/// A template to be created, or the new state of an existing one
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTemplate {
    name: String,
    content: String,
}

impl NewTemplate {
    /// Create a new template, trimming the name and rejecting empty ones
    pub fn new(name: &str, content: &str) -> Result<Self, InvalidTemplateError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(InvalidTemplateError::EmptyName);
        }

        Ok(Self {
            name: name.to_string(),
            content: content.to_string(),
        })
    }

    /// The template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The template content
    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_new_template_trims_name() -> TestResult {
        let template = NewTemplate::new("  welcome ", "<p>Hi</p>")?;

        assert_eq!(template.name(), "welcome");
        assert_eq!(template.content(), "<p>Hi</p>");

        Ok(())
    }

    #[test]
    fn test_new_template_rejects_empty_name() {
        assert_eq!(
            NewTemplate::new(" ", "<p>Hi</p>"),
            Err(InvalidTemplateError::EmptyName)
        );
    }
}
