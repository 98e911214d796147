//! CLI entry point for `device-login`.

pub mod login;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Provider;

/// Sign in with the OAuth 2.0 device authorization grant.
#[derive(Parser, Debug)]
#[command(name = "device-login", version, about = "OAuth 2.0 device flow login")]
pub struct Cli {
    /// Endpoint preset (google, github)
    #[arg(long)]
    pub provider: Option<Provider>,

    /// OAuth client ID (falls back to OAUTH_CLIENT_ID)
    #[arg(long)]
    pub client_id: Option<String>,

    /// OAuth client secret, for confidential clients
    #[arg(long)]
    pub client_secret: Option<String>,

    /// Device authorization endpoint
    #[arg(long)]
    pub device_authorization_url: Option<String>,

    /// Token endpoint
    #[arg(long)]
    pub token_url: Option<String>,

    /// Scope to request (repeatable)
    #[arg(long = "scope")]
    pub scopes: Vec<String>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the token as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
