//! Reading the bundled templates for bulk loading

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::templates::NewTemplate;

/// Read every `*.html` file in `dir`, named after its file stem, sorted by name
pub async fn read_bundle(dir: &Path) -> Result<Vec<NewTemplate>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to open template directory {}", dir.display()))?;

    let mut templates = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        templates.push(NewTemplate::new(name, &content)?);
    }

    templates.sort_by(|a, b| a.name().cmp(b.name()));

    Ok(templates)
}
