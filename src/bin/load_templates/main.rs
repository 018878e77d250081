#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Loads the bundled HTML templates into the template store

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use email_service::{
    domain::templates::{TemplateService, TemplateServiceImpl},
    infrastructure::{
        db::postgres::{DatabaseConfig, PostgresDatabase},
        templates::read_bundle,
    },
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The database connection details
    #[clap(flatten)]
    pub db: DatabaseConfig,

    /// Directory holding the `*.html` templates
    #[clap(long, env = "TEMPLATES_DIR", default_value = "templates/emails")]
    pub templates_dir: PathBuf,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let bundle = read_bundle(&args.templates_dir).await?;

    let db = Arc::new(PostgresDatabase::new(&args.db).await?);
    db.migrate().await?;

    let result = TemplateServiceImpl::new(db.clone())
        .import_templates(&bundle)
        .await;

    db.close().await;

    info!(count = result?, dir = %args.templates_dir.display(), "templates loaded");

    Ok(())
}
