//! `device-login` binary entry point.

use clap::Parser;
use oauth_device_flow::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = oauth_device_flow::cli::login::handle_login(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
