//! Mock SCIM 2.0 Server
//!
//! A standalone SCIM 2.0 server for exercising identity-provisioning
//! integrations (Keycloak, Okta, Azure AD and the like) without a real
//! identity backend. Resources live in process memory and reset on restart.

use std::sync::Arc;

use axum::response::IntoResponse;
use clap::Parser;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod config;
mod routes;
mod scim;
mod store;

#[cfg(test)]
mod tests;

use config::ServerConfig;
use store::ResourceStore;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<ResourceStore>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(ResourceStore::new()),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Mock SCIM 2.0 server for identity-provisioning tests", long_about = None)]
struct Args {
    /// Address to bind, overriding the HOST environment variable
    #[arg(long)]
    host: Option<std::net::IpAddr>,

    /// Port to listen on, overriding the PORT environment variable
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    run_server(args).await;
}

/// Assemble the full application router
pub fn build_app(config: &ServerConfig, state: AppState) -> axum::Router {
    routes::open_routes()
        .merge(routes::resource_routes(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            routes::middleware::timeout_middleware,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .with_state(state)
}

/// Convert a handler panic into the SCIM 500 envelope
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Request handler panicked");
    scim::ScimErrorResponse::internal("Internal server error").into_response()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,h2=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_server(args: Args) {
    let mut config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    init_tracing();
    config.validate();

    let bind_addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config.clone());
    let app = build_app(&config, state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("SCIM server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

/// Resolve when SIGINT or SIGTERM arrives so axum can drain connections
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
