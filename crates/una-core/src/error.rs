//! Error types for `una-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown {kind} code: {code:?}")]
  UnknownChoice { kind: &'static str, code: String },

  #[error("weekday out of range: {0}")]
  WeekdayOutOfRange(u8),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
