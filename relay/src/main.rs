use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;

use relay::config::Args;
use relay::functions::FunctionRegistry;
use relay::handler::MessageHandler;
use relay::webhook::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    tracing::info!("args: {:?}", &args);

    let model = gemini_client::Client::new(args.gemini_api_key.as_str(), args.model.as_str())
        .with_base_url(args.gemini_base_url.as_str());
    let messenger = line_client::Client::new(args.channel_access_token.as_str())
        .with_base_url(args.line_api_base_url.as_str());
    let functions = FunctionRegistry::with_defaults();
    tracing::info!("Using model {} with functions {:?}", model.model(), functions);

    let state = AppState {
        channel_secret: Arc::from(args.channel_secret.as_str()),
        handler: MessageHandler::new(Arc::new(model), Arc::new(messenger), functions),
    };
    let app = webhook::router(state);

    let addr = args.listen_addr();
    tracing::info!(
        "Listening on {}, expose it with e.g. `ngrok http {}`",
        addr,
        args.port
    );
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server shutdown");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Error listening for Ctrl-C: {:?}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Error listening for SIGTERM: {:?}", e);
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
    tracing::info!("Shutting down");
}
