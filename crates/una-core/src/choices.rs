//! Closed code/label enumerations.
//!
//! Every coded column in the portal (statuses, priorities, roles, categories)
//! is a closed enum generated by [`choices!`]. Each variant carries the code
//! stored in the database and sent over the wire, and the human-readable
//! label shown next to it.

/// A closed set of coded values with display labels.
pub trait Choice: Sized + Copy + 'static {
  /// Name of the enumeration, used in error messages.
  const KIND: &'static str;
  /// Every variant, in declaration order.
  const ALL: &'static [Self];

  /// The stored / wire code.
  fn code(self) -> &'static str;

  /// The display label.
  fn label(self) -> &'static str;

  /// Look a variant up by its exact code.
  fn from_code(code: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|c| c.code() == code)
  }
}

/// Declare a [`Choice`] enum: `Variant = "code" => "Label"`.
macro_rules! choices {
  (
    $(#[$meta:meta])*
    pub enum $name:ident ($kind:literal) {
      $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
    )]
    pub enum $name {
      $( $(#[$vmeta])* #[serde(rename = $code)] $variant, )+
    }

    impl $crate::Choice for $name {
      const KIND: &'static str = $kind;
      const ALL: &'static [Self] = &[$(Self::$variant),+];

      fn code(self) -> &'static str {
        match self { $(Self::$variant => $code,)+ }
      }

      fn label(self) -> &'static str {
        match self { $(Self::$variant => $label,)+ }
      }
    }

    impl std::str::FromStr for $name {
      type Err = $crate::Error;

      fn from_str(s: &str) -> $crate::Result<Self> {
        <Self as $crate::Choice>::from_code(s).ok_or_else(|| {
          $crate::Error::UnknownChoice { kind: $kind, code: s.to_owned() }
        })
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str($crate::Choice::label(*self))
      }
    }
  };
}

#[cfg(test)]
mod tests {
  use super::Choice;
  use crate::contact::{MessageStatus, Priority};

  #[test]
  fn code_and_label_tables_are_distinct() {
    assert_eq!(MessageStatus::InProgress.code(), "en_cours");
    assert_eq!(MessageStatus::InProgress.label(), "En cours de traitement");
    assert_eq!(MessageStatus::InProgress.to_string(), "En cours de traitement");
  }

  #[test]
  fn from_code_is_exact() {
    assert_eq!(Priority::from_code("urgente"), Some(Priority::Urgent));
    assert_eq!(Priority::from_code("Urgente"), None);
    assert!("".parse::<Priority>().is_err());
  }

  #[test]
  fn serde_uses_codes() {
    let json = serde_json::to_string(&Priority::Low).unwrap();
    assert_eq!(json, "\"basse\"");
    let back: Priority = serde_json::from_str("\"haute\"").unwrap();
    assert_eq!(back, Priority::High);
  }
}
