//! Error type for `una-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] una_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A fixture document names a table the schema does not define.
  #[error("fixture names unknown table {0:?}")]
  UnknownTable(String),

  #[error("fixture names unknown column {column:?} in table {table:?}")]
  UnknownColumn { table: String, column: String },

  #[error("malformed fixture: {0}")]
  Fixture(String),

  /// A project's actual end date precedes its start date.
  #[error("project {0}: actual end date precedes start date")]
  ProjectDates(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
