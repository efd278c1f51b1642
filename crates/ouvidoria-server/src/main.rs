//! Ouvidoria: complaint intake server with PII redaction.

use std::io::Read;
use std::sync::Arc;

use ouvidoria_core::OuvidoriaConfig;
use ouvidoria_server::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "redact" => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                let state = AppState::from_config(OuvidoriaConfig::from_env()?)?;
                let result = state.pipeline.process(&text).await;
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Ouvidoria: complaint intake with PII redaction");
                println!();
                println!("Usage: ouvidoria [command]");
                println!();
                println!("Commands:");
                println!("  (none)      Start the server");
                println!("  redact      Redact text read from stdin and print the result as JSON");
                println!("  help        Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'ouvidoria help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config = OuvidoriaConfig::from_env()?;
    let addr = config.listen_addr();
    let state = Arc::new(AppState::from_config(config)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Ouvidoria server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
