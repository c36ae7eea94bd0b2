//! Cargotrack gRPC Server
//!
//! A standalone server binary for the cargo tracking engine.

use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use cargotrack::config::ServerConfig;
use cargotrack::logging::{init_logger, LogProfile};
use cargotrack::storage::{DeliveryStore, InMemoryDeliveryStore};
use cargotrack::transport;
use cargotrack::TrackingEngine;

fn print_help() {
    println!("cargotrack-server - cargo tracking gRPC server");
    println!();
    println!("USAGE:");
    println!("    cargotrack-server [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("        --host <HOST>         Address to bind [env: SERVER_SERVICE_HOST, default: 0.0.0.0]");
    println!("    -p, --port <PORT>         Port to listen on [env: SERVER_SERVICE_PORT, default: 50051]");
    println!("    -l, --log-level <LEVEL>   local, dev or prod [env: SERVER_SERVICE_LOG_LEVEL, default: local]");
    println!("    -h, --help                Print help information");
}

fn flag_value(args: &[String], i: usize, flag: &str) -> String {
    args.get(i + 1).cloned().unwrap_or_else(|| {
        eprintln!("error: {flag} requires a value");
        std::process::exit(1);
    })
}

fn parse_args(mut config: ServerConfig) -> ServerConfig {
    let args: Vec<String> = std::env::args().collect();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                config.host = flag_value(&args, i, "--host");
                i += 2;
            }
            "--port" | "-p" => {
                let raw = flag_value(&args, i, "--port");
                config.port = raw.parse().unwrap_or_else(|_| {
                    eprintln!("error: invalid port number: {raw}");
                    std::process::exit(1);
                });
                i += 2;
            }
            "--log-level" | "-l" => {
                let raw = flag_value(&args, i, "--log-level");
                config.log_profile = LogProfile::parse(&raw).unwrap_or_else(|| {
                    eprintln!("error: invalid log level: {raw}");
                    std::process::exit(1);
                });
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
        }
    }

    config
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(ServerConfig::from_env()?);
    init_logger(config.log_profile);

    let addr = config.addr()?;
    let store: Arc<dyn DeliveryStore> = Arc::new(InMemoryDeliveryStore::new());
    let engine = Arc::new(TrackingEngine::with_config(store, config.engine_config()));
    let shutdown = CancellationToken::new();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        merge_strategy = ?config.engine.merge_strategy,
        arrival_accounting = ?config.engine.arrival_accounting,
        "starting gRPC server"
    );

    transport::serve(engine, addr, shutdown, shutdown_signal()).await?;

    info!("server stopped");
    Ok(())
}
