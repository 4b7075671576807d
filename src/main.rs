//! Gallery Gate - Session-based access control for a photo gallery server.
//!
//! This binary starts the HTTP server and configures all components.

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gallery_gate::{
    config::Config,
    server::{create_router, RouterConfig},
    session::{SessionGateway, SessionStore, SqliteSessionStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    run_serve(config).await
}

async fn run_serve(config: Config) -> ExitCode {
    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Session store: {}", config.database_url);
    info!("  Session lifetime: {} ms", config.session_lifetime_ms);
    info!("  Rate limit threshold: {}", config.rate_limit_threshold);
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    // Connect to the session store and ensure the schema exists
    info!("Connecting to session store...");
    let store = match SqliteSessionStore::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to {}: {}", config.database_url, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = store.init().await {
        error!("Failed to initialize session schema: {}", e);
        return ExitCode::FAILURE;
    }

    // Assemble the gateway
    let gateway = SessionGateway::new(store, config.admin_secret_or_empty())
        .with_session_lifetime_ms(config.session_lifetime_ms)
        .with_failure_threshold(config.rate_limit_threshold);

    // Build router configuration
    let router_config = build_router_config(&config);

    // Create router
    let router = create_router(gateway, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("Server listening on: http://{}", addr);
    info!("  Mint a session:  curl -X POST -H 'admin-session: <secret>' http://{}/session/create", addr);
    info!("  Probe a session: curl http://{}/session/test?smid=<id>", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    // ConnectInfo feeds the client address extractor when no forwarding
    // header is present
    if let Err(e) = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "gallery_gate=debug,tower_http=debug"
    } else {
        "gallery_gate=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new();

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}
