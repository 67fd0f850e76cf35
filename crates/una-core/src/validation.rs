//! Per-field validation messages collected while checking a submission.

use std::collections::BTreeMap;

use serde::Serialize;

/// Field name → messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  /// Record the standard message for a missing mandatory field.
  pub fn required(&mut self, field: &str) {
    self.add(field, "Ce champ est obligatoire.");
  }

  /// Append every message recorded in `other`.
  pub fn extend(&mut self, other: FieldErrors) {
    for (field, messages) in other.0 {
      self.0.entry(field).or_default().extend(messages);
    }
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  /// `Ok(())` if nothing was recorded, otherwise the collected errors.
  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_accumulate_per_field() {
    let mut errors = FieldErrors::new();
    errors.required("email");
    errors.add("email", "Format invalide.");
    errors.add("nom", "Trop long.");

    assert_eq!(errors.get("email").map(<[String]>::len), Some(2));
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["nom"][0], "Trop long.");
    assert!(errors.into_result().is_err());
  }

  #[test]
  fn extend_merges_per_field() {
    let mut a = FieldErrors::new();
    a.add("nom", "Trop long.");
    let mut b = FieldErrors::new();
    b.add("nom", "Caractères invalides.");
    b.required("email");
    a.extend(b);
    assert_eq!(a.get("nom").map(<[String]>::len), Some(2));
    assert!(a.contains("email"));
  }

  #[test]
  fn empty_is_ok() {
    assert_eq!(FieldErrors::new().into_result(), Ok(()));
  }
}
