//! Reservation webhook binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use reservation_webhook::config::Config;
use reservation_webhook::dispatch::Dispatcher;
use reservation_webhook::functions::FunctionRegistry;
use reservation_webhook::logging::init_logging;
use reservation_webhook::reservations::ReservationService;
use reservation_webhook::server::{WebhookServer, router};

#[derive(Parser, Debug)]
#[command(
    name = "reservation-webhook",
    version,
    about = "Reservation functions for voice agents over a SWAIG-style webhook"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the webhook server (default)
    Serve(ServeArgs),
    /// Print the registered function signatures as JSON
    Signatures,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Bind address, overrides HOST
    #[arg(long)]
    host: Option<String>,
    /// Listen port, overrides PORT
    #[arg(long)]
    port: Option<u16>,
    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
    /// Append dispatch payloads to this file, overrides SWAIG_PAYLOAD_LOG
    #[arg(long, value_name = "PATH")]
    payload_log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(args).await,
        Command::Signatures => print_signatures(),
    }
}

fn print_signatures() -> anyhow::Result<()> {
    let registry = FunctionRegistry::with_builtins();
    let signatures = registry.signatures(&[]);
    println!("{}", serde_json::to_string_pretty(&signatures)?);
    Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let port = args.port.map(|p| p.to_string());
    let config = Config::from_lookup(|key| match key {
        "HOST" if args.host.is_some() => args.host.clone(),
        "PORT" if port.is_some() => port.clone(),
        _ => std::env::var(key).ok(),
    })?;

    let mut logging = config.logging.clone();
    logging.json |= args.json_logs;
    if args.payload_log.is_some() {
        logging.payload_log = args.payload_log.clone();
    }
    init_logging(&logging)?;

    let addr = config.server.socket_addr()?;

    let registry = Arc::new(FunctionRegistry::with_builtins());
    tracing::info!(functions = ?registry.names(), "Registered reservation functions");

    let service = ReservationService::spawn();
    let dispatcher = Dispatcher::new(registry, service);

    let mut server = WebhookServer::new(addr, router(dispatcher, config.credentials));
    server.start().await?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    tracing::info!("Shutdown requested");
    server.shutdown().await;

    Ok(())
}
