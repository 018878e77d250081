//! HTTP Server

use std::{
    net::{Ipv4Addr, SocketAddr, TcpListener},
    time::Duration,
};

use anyhow::Context;
use axum::{extract::Request, middleware, Router};
use axum_server::Handle;
use clap::Parser;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, warn};

use crate::{
    domain::{emails::EmailService, history::HistoryService, templates::TemplateService},
    infrastructure::http::{
        auth::require_docs_access,
        handlers::{api, dashboard, docs, email, panic_handler, root},
        state::AppState,
    },
};

pub mod auth;
pub mod errors;
pub mod handlers;
pub mod open_api;
pub mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The port to listen on
    #[clap(long = "http-port", env = "HTTP_PORT", default_value_t = 8000)]
    pub port: u16,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub fn new<E, T, H>(state: AppState<E, T, H>, config: &HttpServerConfig) -> anyhow::Result<Self>
    where
        E: EmailService,
        T: TemplateService,
        H: HistoryService,
    {
        let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
        let listener = TcpListener::bind(address)
            .with_context(|| format!("failed to listen on {}", config.port))?;

        listener
            .set_nonblocking(true)
            .context("failed to configure listener")?;

        Ok(Self {
            router: router(state),
            listener,
        })
    }

    /// Runs the HTTP server until a shutdown signal arrives and in-flight requests finish.
    #[mutants::skip]
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            "listening on {}",
            self.listener
                .local_addr()
                .context("failed to get local address")?
        );

        let handle = Handle::new();

        tokio::spawn(shutdown_signal(handle.clone()));

        axum_server::from_tcp(self.listener)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await
            .context("server error")?;

        Ok(())
    }
}

/// Create the application's router
pub fn router<E, T, H>(state: AppState<E, T, H>) -> Router
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    let guard =
        middleware::from_fn_with_state(state.config.docs_password.clone(), require_docs_access);

    let guarded = Router::new()
        .nest("/api", api::router::<E, T, H>())
        .merge(docs::router::<E, T, H>())
        .merge(dashboard::router::<E, T, H>())
        .route_layer(guard);

    Router::new()
        .merge(root::router::<E, T, H>())
        .nest("/email", email::router::<E, T, H>())
        .merge(guarded)
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(trace_layer)
        .with_state(state)
}

#[mutants::skip]
async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutting down gracefully");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
