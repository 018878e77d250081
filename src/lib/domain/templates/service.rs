//! Template service module

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

#[cfg(test)]
use mockall::mock;

use crate::domain::templates::{
    errors::{CreateTemplateError, DeleteTemplateError, GetTemplateError, UpdateTemplateError},
    NewTemplate, Template, TemplateRepository,
};

/// Template management
#[async_trait]
pub trait TemplateService: Clone + Send + Sync + 'static {
    /// Lists every stored template.
    async fn list_templates(&self) -> Result<Vec<Template>>;

    /// Retrieves a template by name.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] containing the [`Template`] if found,
    /// or an [`Err`] containing [`GetTemplateError::TemplateNotFound`] if no template has that name.
    async fn get_template(&self, name: &str) -> Result<Template, GetTemplateError>;

    /// Creates a template. Names are unique.
    async fn create_template(&self, template: &NewTemplate)
        -> Result<Template, CreateTemplateError>;

    /// Updates the template called `name`, possibly renaming it.
    async fn update_template(
        &self,
        name: &str,
        template: &NewTemplate,
    ) -> Result<Template, UpdateTemplateError>;

    /// Deletes the template called `name`.
    async fn delete_template(&self, name: &str) -> Result<(), DeleteTemplateError>;

    /// Loads a bundle of templates, overwriting existing ones with the same name.
    async fn import_templates(&self, templates: &[NewTemplate]) -> Result<usize>;
}

#[cfg(test)]
mock! {
    pub TemplateService {}

    impl Clone for TemplateService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl TemplateService for TemplateService {
        async fn list_templates(&self) -> Result<Vec<Template>>;
        async fn get_template(&self, name: &str) -> Result<Template, GetTemplateError>;
        async fn create_template(&self, template: &NewTemplate) -> Result<Template, CreateTemplateError>;
        async fn update_template(&self, name: &str, template: &NewTemplate) -> Result<Template, UpdateTemplateError>;
        async fn delete_template(&self, name: &str) -> Result<(), DeleteTemplateError>;
        async fn import_templates(&self, templates: &[NewTemplate]) -> Result<usize>;
    }
}

/// Template service implementation
#[derive(Debug, Clone)]
pub struct TemplateServiceImpl<R>
where
    R: TemplateRepository,
{
    repo: Arc<R>,
}

impl<R> TemplateServiceImpl<R>
where
    R: TemplateRepository,
{
    /// Create a new template service
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> TemplateService for TemplateServiceImpl<R>
where
    R: TemplateRepository,
{
    async fn list_templates(&self) -> Result<Vec<Template>> {
        self.repo.list_templates().await
    }

    async fn get_template(&self, name: &str) -> Result<Template, GetTemplateError> {
        self.repo.get_template(name).await
    }

    async fn create_template(
        &self,
        template: &NewTemplate,
    ) -> Result<Template, CreateTemplateError> {
        let created = self.repo.create_template(template).await?;

        info!(name = %created.name, "template created");

        Ok(created)
    }

    async fn update_template(
        &self,
        name: &str,
        template: &NewTemplate,
    ) -> Result<Template, UpdateTemplateError> {
        let updated = self.repo.update_template(name, template).await?;

        info!(name, new_name = %updated.name, "template updated");

        Ok(updated)
    }

    async fn delete_template(&self, name: &str) -> Result<(), DeleteTemplateError> {
        self.repo.delete_template(name).await?;

        info!(name, "template deleted");

        Ok(())
    }

    async fn import_templates(&self, templates: &[NewTemplate]) -> Result<usize> {
        let count = self.repo.upsert_templates(templates).await?;

        for template in templates {
            info!(name = template.name(), "template loaded");
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::anyhow;
    use chrono::Utc;
    use mockall::predicate::eq;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::domain::templates::tests::MockTemplateRepository;

    use super::*;

    fn stored(name: &str, content: &str) -> Template {
        Template {
            id: Uuid::now_v7(),
            name: name.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_template_success() -> TestResult {
        let template = stored("welcome", "<p>Hi {{ name }}</p>");
        let expected = template.clone();

        let mut repo = MockTemplateRepository::new();

        repo.expect_get_template()
            .times(1)
            .withf(|name| name == "welcome")
            .returning(move |_| Ok(template.clone()));

        let service = TemplateServiceImpl::new(Arc::new(repo));

        assert_eq!(service.get_template("welcome").await?, expected);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_template_not_found() -> TestResult {
        let mut repo = MockTemplateRepository::new();

        repo.expect_get_template()
            .times(1)
            .returning(|name| Err(GetTemplateError::TemplateNotFound(name.to_string())));

        let service = TemplateServiceImpl::new(Arc::new(repo));

        let result = service.get_template("missing").await;

        assert!(matches!(result, Err(GetTemplateError::TemplateNotFound(name)) if name == "missing"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_template_duplicate() -> TestResult {
        let new_template = NewTemplate::new("welcome", "<p>Hi</p>")?;

        let mut repo = MockTemplateRepository::new();

        repo.expect_create_template()
            .times(1)
            .with(eq(new_template.clone()))
            .returning(|t| Err(CreateTemplateError::DuplicateTemplate(t.name().to_string())));

        let service = TemplateServiceImpl::new(Arc::new(repo));

        let result = service.create_template(&new_template).await;

        assert!(matches!(result, Err(CreateTemplateError::DuplicateTemplate(name)) if name == "welcome"));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_template_unknown_error() -> TestResult {
        let mut repo = MockTemplateRepository::new();

        repo.expect_delete_template()
            .times(1)
            .returning(|_| Err(DeleteTemplateError::UnknownError(anyhow!("pool closed"))));

        let service = TemplateServiceImpl::new(Arc::new(repo));

        let result = service.delete_template("welcome").await;

        assert!(matches!(result, Err(DeleteTemplateError::UnknownError(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_import_templates_upserts_bundle() -> TestResult {
        let bundle = vec![
            NewTemplate::new("welcome", "<p>Welcome</p>")?,
            NewTemplate::new("newsletter", "<p>News</p>")?,
        ];

        let mut repo = MockTemplateRepository::new();

        repo.expect_upsert_templates()
            .times(1)
            .withf(|templates| templates.len() == 2)
            .returning(|templates| Ok(templates.len()));

        let service = TemplateServiceImpl::new(Arc::new(repo));

        assert_eq!(service.import_templates(&bundle).await?, 2);

        Ok(())
    }
}
