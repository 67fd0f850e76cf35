//! HTTP server for the UNA laboratory portal.
//!
//! Wires a [`PortalStore`] backend, the mail transport and the secret
//! lookup into the [`una_api`] router, and serves uploaded media.

pub mod mail;
pub mod secrets;

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use axum::Router;
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use una_api::{ApiState, Clock, MediaStore, Notifier};
use una_core::{
  query::{LaboratoryScope, ScopePolicy},
  store::PortalStore,
};

use mail::MailConfig;
use secrets::ConfiguredSecrets;

/// Path the API router is nested under.
pub const API_PREFIX: &str = "/api";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `UNA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  #[serde(default = "default_store_path")]
  pub store_path:            PathBuf,
  #[serde(default = "default_media_root")]
  pub media_root:            PathBuf,
  #[serde(default = "default_media_url")]
  pub media_url:             String,
  #[serde(default = "default_laboratory_id")]
  pub default_laboratory_id: i64,
  #[serde(default)]
  pub laboratory_scope:      ScopePolicy,
  /// Body cap for the multipart application form, in bytes.
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes:      usize,
  #[serde(default)]
  pub mail:                  MailConfig,
  /// Mailbox secrets by reference name.
  #[serde(default)]
  pub secrets:               HashMap<String, String>,
}

fn default_host() -> String {
  "0.0.0.0".into()
}

fn default_port() -> u16 {
  8000
}

fn default_store_path() -> PathBuf {
  PathBuf::from("~/.local/share/una/portal.sqlite3")
}

fn default_media_root() -> PathBuf {
  PathBuf::from("./media")
}

fn default_media_url() -> String {
  "/media/".into()
}

fn default_laboratory_id() -> i64 {
  1
}

fn default_max_upload_bytes() -> usize {
  una_api::DEFAULT_UPLOAD_LIMIT
}

impl ServerConfig {
  pub fn scope(&self) -> LaboratoryScope {
    LaboratoryScope {
      policy:                self.laboratory_scope,
      default_laboratory_id: self.default_laboratory_id,
    }
  }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Build the shared API state for `store` from `config`.
pub fn api_state<S: PortalStore>(store: S, config: &ServerConfig) -> ApiState<S> {
  let scope = config.scope();
  let notifier = Notifier::new(
    mail::mailer(&config.mail),
    Arc::new(ConfiguredSecrets::new(config.secrets.clone())),
    scope,
  );
  ApiState {
    store: Arc::new(store),
    scope,
    media: Arc::new(MediaStore::new(&config.media_root, &config.media_url)),
    notifier: Arc::new(notifier),
    clock: Clock::System,
    upload_limit: config.max_upload_bytes,
  }
}

/// The API under [`API_PREFIX`] plus read-only media under `media_url`.
pub fn app<S>(state: ApiState<S>, config: &ServerConfig) -> Router
where
  S: PortalStore + 'static,
{
  let media = ServeDir::new(&config.media_root);
  let api = Router::new().nest(API_PREFIX, una_api::api_router(state));

  let media_prefix = config.media_url.trim_end_matches('/');
  let router = if media_prefix.is_empty() {
    api.fallback_service(media)
  } else {
    api.nest_service(media_prefix, media)
  };
  router.layer(TraceLayer::new_for_http())
}
