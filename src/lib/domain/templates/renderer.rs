//! Jinja-style template rendering

use minijinja::Environment;

use crate::domain::{emails::errors::EmailError, templates::TemplateData};

/// Render the template `source` (named `name` for error reporting) against `data`.
pub fn render(name: &str, source: &str, data: &TemplateData) -> Result<String, EmailError> {
    Environment::new()
        .render_str(source, data)
        .map_err(|err| EmailError::TemplateRender {
            name: name.to_string(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn data(value: serde_json::Value) -> TemplateData {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_render_interpolates_variables() -> TestResult {
        let html = render(
            "welcome",
            "<p>Hello {{ name }}, you have {{ count }} messages</p>",
            &data(json!({ "name": "Ada", "count": 3 })),
        )?;

        assert_eq!(html, "<p>Hello Ada, you have 3 messages</p>");

        Ok(())
    }

    #[test]
    fn test_render_supports_loops() -> TestResult {
        let html = render(
            "newsletter",
            "{% for item in items %}<li>{{ item }}</li>{% endfor %}",
            &data(json!({ "items": ["one", "two"] })),
        )?;

        assert_eq!(html, "<li>one</li><li>two</li>");

        Ok(())
    }

    #[test]
    fn test_render_missing_variable_is_empty() -> TestResult {
        let html = render("welcome", "<p>Hello {{ name }}</p>", &TemplateData::new())?;

        assert_eq!(html, "<p>Hello </p>");

        Ok(())
    }

    #[test]
    fn test_render_syntax_error_is_reported() {
        let result = render("broken", "<p>{% if %}</p>", &TemplateData::new());

        assert!(matches!(result, Err(EmailError::TemplateRender { name, .. }) if name == "broken"));
    }
}
