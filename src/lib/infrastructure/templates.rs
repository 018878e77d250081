//! Template sources and bundled template loading

use std::path::PathBuf;

use async_trait::async_trait;
use clap::{ArgAction, Parser, ValueEnum};

use crate::domain::templates::{
    errors::TemplateSourceError, StoreTemplateSource, TemplateRepository, TemplateSource,
};

pub mod bundle;
pub mod filesystem;

pub use bundle::read_bundle;
pub use filesystem::FilesystemTemplateSource;

/// Where templates are looked up when sending
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TemplateSourceKind {
    /// The template store
    #[default]
    Database,

    /// `<TEMPLATES_DIR>/<name>.html`
    Filesystem,
}

/// Template configuration
#[derive(Clone, Debug, Parser)]
pub struct TemplatesConfig {
    /// Where templates are looked up when sending
    #[clap(long, env = "TEMPLATE_SOURCE", value_enum, default_value_t = TemplateSourceKind::Database)]
    pub template_source: TemplateSourceKind,

    /// Directory holding the bundled `*.html` templates
    #[clap(long, env = "TEMPLATES_DIR", default_value = "templates/emails")]
    pub templates_dir: PathBuf,

    /// Load the bundled templates into the store at startup
    #[clap(long, env = "LOAD_TEMPLATES", default_value_t = false, action = ArgAction::Set)]
    pub load_templates: bool,
}

/// The template source picked at startup
#[derive(Debug, Clone)]
pub enum ConfiguredTemplateSource<R>
where
    R: TemplateRepository,
{
    /// Templates from the store
    Store(StoreTemplateSource<R>),

    /// Templates from disk
    Filesystem(FilesystemTemplateSource),
}

#[async_trait]
impl<R> TemplateSource for ConfiguredTemplateSource<R>
where
    R: TemplateRepository,
{
    async fn resolve(&self, name: &str) -> Result<String, TemplateSourceError> {
        match self {
            ConfiguredTemplateSource::Store(source) => source.resolve(name).await,
            ConfiguredTemplateSource::Filesystem(source) => source.resolve(name).await,
        }
    }
}
