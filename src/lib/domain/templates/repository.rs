//! Template repository module

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::templates::{
    errors::{CreateTemplateError, DeleteTemplateError, GetTemplateError, UpdateTemplateError},
    NewTemplate, Template,
};

/// Template repository
#[async_trait]
pub trait TemplateRepository: Clone + Send + Sync + 'static {
    /// List every stored template, ordered by name
    async fn list_templates(&self) -> Result<Vec<Template>>;

    /// Get a template by its exact name
    async fn get_template(&self, name: &str) -> Result<Template, GetTemplateError>;

    /// Create a new template
    async fn create_template(&self, template: &NewTemplate)
        -> Result<Template, CreateTemplateError>;

    /// Replace the name and content of the template called `name`
    async fn update_template(
        &self,
        name: &str,
        template: &NewTemplate,
    ) -> Result<Template, UpdateTemplateError>;

    /// Delete the template called `name`
    async fn delete_template(&self, name: &str) -> Result<(), DeleteTemplateError>;

    /// Insert or overwrite templates by name, returning how many were written
    async fn upsert_templates(&self, templates: &[NewTemplate]) -> Result<usize>;
}

#[cfg(test)]
mock! {
    pub TemplateRepository {}

    impl Clone for TemplateRepository {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl TemplateRepository for TemplateRepository {
        async fn list_templates(&self) -> Result<Vec<Template>>;
        async fn get_template(&self, name: &str) -> Result<Template, GetTemplateError>;
        async fn create_template(&self, template: &NewTemplate) -> Result<Template, CreateTemplateError>;
        async fn update_template(&self, name: &str, template: &NewTemplate) -> Result<Template, UpdateTemplateError>;
        async fn delete_template(&self, name: &str) -> Result<(), DeleteTemplateError>;
        async fn upsert_templates(&self, templates: &[NewTemplate]) -> Result<usize>;
    }
}
