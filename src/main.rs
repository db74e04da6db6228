use std::sync::{Arc, Mutex};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tabsift::error::{Result, TabsiftError};
use tabsift::server::{self, AppState};
use tabsift::session::Session;

#[derive(Debug, Deserialize)]
struct Settings {
    #[serde(default = "default_listen")]
    listen: String,
    #[serde(default = "default_preview_rows")]
    preview_rows: usize,
    #[serde(default = "default_log")]
    log: String,
}

fn default_listen() -> String {
    "127.0.0.1:8420".to_string()
}

fn default_preview_rows() -> usize {
    10
}

fn default_log() -> String {
    "info".to_string()
}

/// Settings come from an optional `tabsift` file (toml/json/yaml) in the
/// working directory, overridden by TABSIFT_* environment variables.
fn load_settings() -> Result<Settings> {
    Config::builder()
        .add_source(File::with_name("tabsift").required(false))
        .add_source(Environment::with_prefix("TABSIFT"))
        .build()
        .map_err(|e| TabsiftError::Config(e.to_string()))?
        .try_deserialize()
        .map_err(|e| TabsiftError::Config(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_settings()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = AppState {
        session: Arc::new(Mutex::new(Session::new())),
        preview_rows: settings.preview_rows,
    };
    let app = server::router(state);
    let listener = tokio::net::TcpListener::bind(&settings.listen)
        .await
        .map_err(|e| TabsiftError::Config(format!("cannot bind {}: {}", settings.listen, e)))?;
    info!(listen = %settings.listen, "tabsift serving");
    axum::serve(listener, app)
        .await
        .map_err(|e| TabsiftError::Config(e.to_string()))?;
    Ok(())
}
