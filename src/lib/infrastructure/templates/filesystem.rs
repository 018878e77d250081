//! Templates read from a directory of `*.html` files

use std::{io::ErrorKind, path::PathBuf};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::domain::templates::{errors::TemplateSourceError, TemplateSource};

/// Resolves `name` to `<dir>/<name>.html`
#[derive(Debug, Clone)]
pub struct FilesystemTemplateSource {
    dir: PathBuf,
}

impl FilesystemTemplateSource {
    /// Create a source reading from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Names must stay inside the template directory
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

#[async_trait]
impl TemplateSource for FilesystemTemplateSource {
    async fn resolve(&self, name: &str) -> Result<String, TemplateSourceError> {
        if !is_plain_name(name) {
            return Err(TemplateSourceError::NotFound(name.to_string()));
        }

        let path = self.dir.join(format!("{name}.html"));

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(TemplateSourceError::NotFound(name.to_string()))
            }
            Err(err) => Err(TemplateSourceError::UnknownError(anyhow!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }
}
