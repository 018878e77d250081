#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Email service HTTP server

use std::sync::Arc;

use anyhow::Result;
use clap::{ArgAction, Parser};
use email_service::{
    domain::{
        emails::{DefaultSender, EmailServiceImpl},
        history::HistoryServiceImpl,
        templates::{StoreTemplateSource, TemplateService, TemplateServiceImpl},
    },
    infrastructure::{
        db::postgres::{DatabaseConfig, PostgresDatabase},
        email::smtp::{SenderConfig, SmtpConfig, SmtpMailer},
        http::{state::ApiConfig, state::AppState, HttpServer, HttpServerConfig},
        templates::{
            read_bundle, ConfiguredTemplateSource, FilesystemTemplateSource, TemplateSourceKind,
            TemplatesConfig,
        },
    },
};
use tracing::{info, Level};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The database connection details
    #[clap(flatten)]
    pub db: DatabaseConfig,

    /// The SMTP relay
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// The default sender identity
    #[clap(flatten)]
    pub sender: SenderConfig,

    /// Template lookup and bundled template loading
    #[clap(flatten)]
    pub templates: TemplatesConfig,

    /// API metadata and the documentation password
    #[clap(flatten)]
    pub api: ApiConfig,

    /// Log at DEBUG instead of INFO
    #[clap(long, env = "DEBUG", default_value_t = false, action = ArgAction::Set)]
    pub debug: bool,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let sender = DefaultSender::try_from(args.sender)?;
    let mailer = SmtpMailer::new(&args.smtp)?;

    let db = Arc::new(PostgresDatabase::new(&args.db).await?);
    db.migrate().await?;

    let templates = TemplateServiceImpl::new(db.clone());

    if args.templates.load_templates {
        let bundle = read_bundle(&args.templates.templates_dir).await?;
        let count = templates.import_templates(&bundle).await?;

        info!(count, "bundled templates loaded");
    }

    let source = match args.templates.template_source {
        TemplateSourceKind::Database => {
            ConfiguredTemplateSource::Store(StoreTemplateSource::new(db.clone()))
        }
        TemplateSourceKind::Filesystem => ConfiguredTemplateSource::Filesystem(
            FilesystemTemplateSource::new(args.templates.templates_dir.clone()),
        ),
    };

    info!(source = ?args.templates.template_source, "template source selected");

    let history = HistoryServiceImpl::new(db.clone());

    let emails = EmailServiceImpl::new(
        Arc::new(mailer),
        Arc::new(source),
        Arc::new(history.clone()),
        sender,
    );

    let state = AppState::new(args.api.into(), emails, templates, history);

    let result = match HttpServer::new(state, &args.server) {
        Ok(server) => server.run().await,
        Err(err) => Err(err),
    };

    db.close().await;

    result
}
