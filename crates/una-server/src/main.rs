//! una-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `UNA_*` environment variables, opens the SQLite store, optionally loads a
//! JSON fixture into it, and serves the portal API over HTTP.
//!
//! ```text
//! cargo run -p una-server --bin server -- --config config.toml --load-fixture seed.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use una_server::ServerConfig;
use una_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "UNA laboratory portal server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load a JSON fixture (table name → rows) into the store before serving.
  #[arg(long, value_name = "FILE")]
  load_fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("UNA").separator("__").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in configured paths.
  server_cfg.store_path = expand_tilde(&server_cfg.store_path);
  server_cfg.media_root = expand_tilde(&server_cfg.media_root);
  server_cfg.mail.spool_dir = expand_tilde(&server_cfg.mail.spool_dir);

  // Open SQLite store.
  let store_path = &server_cfg.store_path;
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(fixture) = &cli.load_fixture {
    let json = tokio::fs::read_to_string(fixture)
      .await
      .with_context(|| format!("failed to read fixture {fixture:?}"))?;
    let rows = store
      .load_fixture_str(&json)
      .await
      .with_context(|| format!("failed to load fixture {fixture:?}"))?;
    tracing::info!(rows, fixture = %fixture.display(), "Fixture loaded");
  }

  tracing::info!(
    scope = ?server_cfg.scope(),
    media_root = %server_cfg.media_root.display(),
    mail = ?server_cfg.mail.transport,
    "Configuration loaded"
  );

  let state = una_server::api_state(store, &server_cfg);
  let app = una_server::app(state, &server_cfg);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}{}", una_server::API_PREFIX);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
