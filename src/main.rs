// src/main.rs

use axum::Router;
use evm_wallet_connect::{
    api::create_api_router,
    blockchain::RpcActivator,
    config::Config,
    rpc::{
        handler::handle_request,
        protocol::{error_codes, Request, Response},
    },
    wallets::{
        connectors::default_registry,
        session::{default_session_path, FileSessionStore},
        WalletCoordinator,
    },
    AppState,
};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) -> anyhow::Result<()> {
    let app = Router::new()
        .nest("/api", create_api_router())
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    info!("🚀 HTTP Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// --- Stdio JSON-RPC Logic ---
async fn run_stdio_server(state: AppState) {
    info!("🚀 Starting JSON-RPC server on stdin/stdout...");

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();

        match stdin.read_line(&mut line).await {
            Ok(0) => {
                info!("EOF received, shutting down JSON-RPC server");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!("Received: {}", line);

                let response = match serde_json::from_str::<Request>(line) {
                    Ok(request) => handle_request(request, state.clone()).await,
                    Err(parse_error) => {
                        error!("JSON parse error: {}", parse_error);
                        Some(Response::error(
                            serde_json::Value::Null,
                            error_codes::PARSE_ERROR,
                            format!("Parse error: {}", parse_error),
                        ))
                    }
                };

                if let Some(response) = response {
                    if let Ok(response_json) = serde_json::to_string(&response) {
                        debug!("Sending: {}", response_json);
                        if let Err(e) = stdout
                            .write_all(format!("{}\n", response_json).as_bytes())
                            .await
                        {
                            error!("Failed to write response: {}", e);
                            break;
                        }
                        if let Err(e) = stdout.flush().await {
                            error!("Failed to flush response: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        }
    }

    info!("JSON-RPC server shutting down");
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evm_wallet_connect=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            return;
        }
    };

    let session_path = config
        .session_storage_path
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(default_session_path);
    let session = Arc::new(FileSessionStore::new(session_path));
    info!("Session storage at: {}", session.path().display());

    let registry = default_registry(&config);
    info!("Registered wallet connectors: {:?}", registry);

    let activator = Arc::new(RpcActivator::new(config.supported_chain_ids.clone()));
    let coordinator = Arc::new(WalletCoordinator::new(
        registry,
        activator,
        session,
        config.chain_id,
    ));

    // Republish on provider-side account and chain changes
    let _watcher = coordinator.watch_activation();

    // Startup reconciliation runs alongside the bindings; they see `initialized: false` until done
    {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            coordinator.restore_session().await;
        });
    }

    let app_state = AppState::new(config, coordinator);

    // Check if running in stdio mode or HTTP server mode
    let args: Vec<String> = env::args().collect();
    if args.contains(&"--stdio".to_string()) || env::var("WALLET_RPC_STDIO").is_ok() {
        run_stdio_server(app_state).await;
    } else if let Err(e) = run_http_server(app_state).await {
        error!("❌ HTTP server failed: {:#}", e);
    }
}
