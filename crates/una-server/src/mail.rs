//! Mail transports.
//!
//! `log` records each mail through `tracing`; `spool` writes one JSON
//! document per mail into a directory drained by an external relay.

use std::{
  path::PathBuf,
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use una_core::notify::{MailCredentials, Mailer, NotifyError, OutgoingMail};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailTransport {
  #[default]
  Log,
  Spool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
  #[serde(default)]
  pub transport: MailTransport,
  #[serde(default = "default_spool_dir")]
  pub spool_dir: PathBuf,
}

impl Default for MailConfig {
  fn default() -> Self {
    Self { transport: MailTransport::default(), spool_dir: default_spool_dir() }
  }
}

fn default_spool_dir() -> PathBuf {
  PathBuf::from("./outbox")
}

/// The mailer selected by `config`.
pub fn mailer(config: &MailConfig) -> Arc<dyn Mailer> {
  match config.transport {
    MailTransport::Log => Arc::new(LogMailer),
    MailTransport::Spool => Arc::new(SpoolMailer::new(config.spool_dir.clone())),
  }
}

// ─── Log ──────────────────────────────────────────────────────────────────────

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
  async fn send(
    &self,
    credentials: &MailCredentials,
    mail: &OutgoingMail,
  ) -> Result<(), NotifyError> {
    tracing::info!(
      account = %credentials.username,
      from = %mail.from,
      to = ?mail.to,
      subject = %mail.subject,
      "mail recorded (log transport)"
    );
    tracing::debug!(body = %mail.text, "mail body");
    Ok(())
  }
}

// ─── Spool ────────────────────────────────────────────────────────────────────

/// Writes `<timestamp>-<seq>.json` files into `dir`, creating it on demand.
///
/// The mailbox password is never written; the relay looks the account up by
/// its `account` name.
pub struct SpoolMailer {
  dir: PathBuf,
  seq: AtomicU64,
}

#[derive(Serialize)]
struct SpooledMail<'a> {
  account: &'a str,
  #[serde(flatten)]
  mail:    &'a OutgoingMail,
}

impl SpoolMailer {
  pub fn new(dir: PathBuf) -> Self {
    Self { dir, seq: AtomicU64::new(0) }
  }
}

#[async_trait]
impl Mailer for SpoolMailer {
  async fn send(
    &self,
    credentials: &MailCredentials,
    mail: &OutgoingMail,
  ) -> Result<(), NotifyError> {
    let transport = |e: std::io::Error| NotifyError::Transport(e.to_string());

    tokio::fs::create_dir_all(&self.dir).await.map_err(transport)?;
    let seq = self.seq.fetch_add(1, Ordering::Relaxed);
    let name = format!("{}-{seq:06}.json", Utc::now().format("%Y%m%dT%H%M%S%.6f"));
    let path = self.dir.join(name);

    let doc = SpooledMail { account: &credentials.username, mail };
    let bytes =
      serde_json::to_vec_pretty(&doc).map_err(|e| NotifyError::Transport(e.to_string()))?;
    tokio::fs::write(&path, bytes).await.map_err(transport)?;

    tracing::debug!(path = %path.display(), "mail spooled");
    Ok(())
  }
}
