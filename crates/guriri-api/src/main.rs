//! Guriri dispatch backend entry point.
//!
//! Binary name: `guriri`
//!
//! Parses CLI arguments, loads configuration, initializes tracing, the
//! database, and services, then dispatches to the command handler or starts
//! the HTTP/WebSocket server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use guriri_infra::config::{load_config, resolve_data_dir};
use guriri_observe::tracing_setup::{TracingOptions, default_filter, init_tracing, shutdown_tracing};
use guriri_types::config::DispatchConfig;

use cli::{Cli, Commands};
use state::AppState;

const LOG_FILE_NAME: &str = "backend.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "guriri", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir(cli.data_dir.clone());
    let log_file = matches!(cli.command, Commands::Serve { .. })
        .then(|| DispatchConfig::log_dir_in(&data_dir).join(LOG_FILE_NAME));

    init_tracing(TracingOptions {
        default_filter: default_filter(cli.verbose, cli.quiet).to_string(),
        log_file,
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config = load_config(data_dir).await;
    if config.uses_default_admin_token() {
        tracing::warn!("Using the default admin token; set GURIRI_ADMIN_TOKEN for production");
    }

    let result = match AppState::init(config).await {
        Ok(state) => run(cli, state).await,
        Err(err) => Err(err),
    };
    shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} Guriri listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {} {}",
                    console::style("Model:").dim(),
                    console::style(&state.config.ollama_model).dim()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, "Server started");

            let db_pool = state.db_pool.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            db_pool.close().await;
            tracing::info!("Server stopped");
            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::History { room, limit } => {
            cli::history::show_history(&state, &room, limit, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
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
}
