//! `device-login` command handler.

use tokio_util::sync::CancellationToken;

use super::Cli;
use crate::auth::presenter::StderrPresenter;
use crate::auth::{DeviceFlowClient, Token};
use crate::config::{split_scopes, ClientConfig, Provider};
use crate::error::{DeviceFlowError, Result};

/// Resolve the client config: flags, then config file, then environment.
pub fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let _ = dotenvy::dotenv(); // load .env if present, ignore error
    resolve_with(cli, |key| std::env::var(key).ok())
}

pub(crate) fn resolve_with(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());
    let file = cli
        .config
        .as_ref()
        .map(|path| ClientConfig::from_file(path))
        .transpose()?;

    // `--provider` sits with the flags; OAUTH_PROVIDER sits below the file
    let flag_preset = cli.provider.map(Provider::endpoint);
    let env_preset = match cli.provider {
        Some(_) => None,
        None => env("OAUTH_PROVIDER")
            .map(|name| {
                name.parse::<Provider>().map_err(|_| {
                    DeviceFlowError::Configuration(format!("Unknown OAUTH_PROVIDER: {name}"))
                })
            })
            .transpose()?
            .map(Provider::endpoint),
    };

    let missing = |what: &str| DeviceFlowError::Configuration(format!("{what} not configured"));
    let client_id = cli
        .client_id
        .clone()
        .or_else(|| file.as_ref().map(|f| f.client_id.clone()))
        .or_else(|| env("OAUTH_CLIENT_ID"))
        .ok_or_else(|| missing("client id"))?;
    let client_secret = cli
        .client_secret
        .clone()
        .or_else(|| file.as_ref().and_then(|f| f.client_secret.clone()))
        .or_else(|| env("OAUTH_CLIENT_SECRET"));
    let device_authorization_url = cli
        .device_authorization_url
        .clone()
        .or_else(|| flag_preset.as_ref().map(|p| p.device_authorization_url.clone()))
        .or_else(|| file.as_ref().map(|f| f.device_authorization_url.clone()))
        .or_else(|| env("OAUTH_DEVICE_AUTHORIZATION_URL"))
        .or_else(|| env_preset.as_ref().map(|p| p.device_authorization_url.clone()))
        .ok_or_else(|| missing("device authorization url"))?;
    let token_url = cli
        .token_url
        .clone()
        .or_else(|| flag_preset.as_ref().map(|p| p.token_url.clone()))
        .or_else(|| file.as_ref().map(|f| f.token_url.clone()))
        .or_else(|| env("OAUTH_TOKEN_URL"))
        .or_else(|| env_preset.as_ref().map(|p| p.token_url.clone()))
        .ok_or_else(|| missing("token url"))?;
    let scopes = if !cli.scopes.is_empty() {
        cli.scopes.clone()
    } else if let Some(file) = file.as_ref().filter(|f| !f.scopes.is_empty()) {
        file.scopes.clone()
    } else {
        env("OAUTH_SCOPES")
            .map(|raw| split_scopes(&raw))
            .unwrap_or_default()
    };

    let config = ClientConfig {
        client_id,
        client_secret,
        device_authorization_url,
        token_url,
        scopes,
    };
    config.validate()?;
    Ok(config)
}

/// Handle `device-login`.
pub async fn handle_login(cli: Cli) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&cli)?;
    let client = DeviceFlowClient::new(config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let token = client.get_token(&StderrPresenter, &cancel).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&token)?);
    } else {
        print_summary(&token);
    }
    Ok(())
}

fn print_summary(token: &Token) {
    eprintln!("✅ Authorized ({} token)", token.token_type);
    if let Some(expires_at) = token.expires_at {
        eprintln!("   Expires: {}", expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if !token.scopes().is_empty() {
        eprintln!("   Scopes: {}", token.scopes().join(" "));
    }
    if token.refresh_token.is_some() {
        eprintln!("   Refresh token issued");
    }
}
