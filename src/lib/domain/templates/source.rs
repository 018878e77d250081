//! Template lookup for rendering

use std::sync::Arc;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::templates::{errors::TemplateSourceError, TemplateRepository};

/// Resolves a template name to its HTML source
#[async_trait]
pub trait TemplateSource: Clone + Send + Sync + 'static {
    /// Look up the template called `name`.
    ///
    /// # Returns
    /// The template source, or [`TemplateSourceError::NotFound`] when no template has that name.
    async fn resolve(&self, name: &str) -> Result<String, TemplateSourceError>;
}

#[cfg(test)]
mock! {
    pub TemplateSource {}

    impl Clone for TemplateSource {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl TemplateSource for TemplateSource {
        async fn resolve(&self, name: &str) -> Result<String, TemplateSourceError>;
    }
}

/// Template source backed by the template store
#[derive(Debug, Clone)]
pub struct StoreTemplateSource<R>
where
    R: TemplateRepository,
{
    repo: Arc<R>,
}

impl<R> StoreTemplateSource<R>
where
    R: TemplateRepository,
{
    /// Create a new store-backed template source
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> TemplateSource for StoreTemplateSource<R>
where
    R: TemplateRepository,
{
    async fn resolve(&self, name: &str) -> Result<String, TemplateSourceError> {
        Ok(self.repo.get_template(name).await?.content)
    }
}
