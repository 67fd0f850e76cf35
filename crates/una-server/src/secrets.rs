//! Mailbox secret lookup.
//!
//! A contact names its secret by reference. The reference is looked up in
//! the `[secrets]` configuration table first, then in the environment as
//! `UNA_SECRET_<REFERENCE>` with the reference upper-cased and every
//! character outside `[A-Z0-9]` replaced by `_`.

use std::collections::HashMap;

use una_core::notify::SecretResolver;

pub struct ConfiguredSecrets {
  table: HashMap<String, String>,
}

impl ConfiguredSecrets {
  pub fn new(table: HashMap<String, String>) -> Self {
    Self { table }
  }
}

impl SecretResolver for ConfiguredSecrets {
  fn resolve(&self, reference: &str) -> Option<String> {
    self
      .table
      .get(reference)
      .cloned()
      .or_else(|| std::env::var(env_key(reference)).ok())
  }
}

/// Environment variable consulted for `reference`.
pub fn env_key(reference: &str) -> String {
  let suffix: String = reference
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
    .collect();
  format!("UNA_SECRET_{suffix}")
}
