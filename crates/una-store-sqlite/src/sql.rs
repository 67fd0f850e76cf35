//! Dynamic SQL fragments: filter conditions, update assignments and the
//! `REGEXP` function backing case-insensitive matching.

use std::sync::Arc;

use regex::Regex;
use rusqlite::{
  functions::FunctionFlags,
  types::{Value, ValueRef},
  Connection,
};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Current UTC time in the store's timestamp format.
pub const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Register `regexp(pattern, text)` so that `text REGEXP pattern` works.
///
/// Compiled patterns are cached per statement. `NULL` and non-text values
/// never match.
pub fn register_regexp(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "regexp",
    2,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let regex: Arc<Regex> = ctx.get_or_create_aux(0, |vr| -> Result<_, BoxError> {
        Ok(Regex::new(vr.as_str()?)?)
      })?;
      let matched = match ctx.get_raw(1) {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).is_ok_and(|t| regex.is_match(t)),
        _ => false,
      };
      Ok(matched)
    },
  )
}

/// Case-insensitive literal substring pattern.
pub fn contains_pattern(term: &str) -> String {
  format!("(?i){}", regex::escape(term))
}

/// Case-insensitive pattern matching any of `terms` as a literal substring.
pub fn any_of_pattern(terms: &[String]) -> String {
  let alternation = terms
    .iter()
    .map(|t| regex::escape(t))
    .collect::<Vec<_>>()
    .join("|");
  format!("(?i)(?:{alternation})")
}

// ─── Fragments ───────────────────────────────────────────────────────────────

/// SQL fragments sharing one positional parameter list.
///
/// Used for `WHERE` conditions (joined with `AND`) and for `SET` lists
/// (joined with `,`).
#[derive(Debug, Default)]
pub struct Fragments {
  clauses: Vec<String>,
  params:  Vec<Value>,
}

impl Fragments {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a parameter and return its placeholder.
  pub fn bind(&mut self, value: impl Into<Value>) -> String {
    self.params.push(value.into());
    format!("?{}", self.params.len())
  }

  pub fn push(&mut self, clause: impl Into<String>) {
    self.clauses.push(clause.into());
  }

  /// `column = value`, usable as a condition or an assignment.
  pub fn eq(&mut self, column: &str, value: impl Into<Value>) {
    let p = self.bind(value);
    self.push(format!("{column} = {p}"));
  }

  /// Assignment when `value` is present.
  pub fn set<T: Into<Value>>(&mut self, column: &str, value: Option<T>) {
    if let Some(v) = value {
      self.eq(column, v);
    }
  }

  /// Assignment that writes `NULL` when `value` is absent.
  pub fn set_or_null<T: Into<Value>>(&mut self, column: &str, value: Option<T>) {
    match value {
      Some(v) => self.eq(column, v),
      None => self.push(format!("{column} = NULL")),
    }
  }

  /// Every term must match at least one of `columns`, case-insensitively.
  pub fn search(&mut self, columns: &[&str], terms: &[String]) {
    for term in terms {
      let p = self.bind(contains_pattern(term));
      let any = columns
        .iter()
        .map(|c| format!("{c} REGEXP {p}"))
        .collect::<Vec<_>>()
        .join(" OR ");
      self.push(format!("({any})"));
    }
  }

  /// `WHERE a AND b`, or nothing.
  pub fn where_clause(&self) -> String {
    if self.clauses.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.clauses.join(" AND "))
    }
  }

  pub fn assignments(&self) -> String {
    self.clauses.join(", ")
  }

  pub fn params(&self) -> rusqlite::ParamsFromIter<std::slice::Iter<'_, Value>> {
    rusqlite::params_from_iter(self.params.iter())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn patterns_escape_metacharacters() {
    let re = Regex::new(&contains_pattern("c++ (v2)")).unwrap();
    assert!(re.is_match("Langage C++ (V2) avancé"));
    assert!(!re.is_match("c (v2)"));
  }

  #[test]
  fn alternation_matches_any_term() {
    let re = Regex::new(&any_of_pattern(&["IA".into(), "Santé".into()])).unwrap();
    assert!(re.is_match("santé publique"));
    assert!(re.is_match("ia générative"));
    assert!(!re.is_match("robotique"));
  }

  #[test]
  fn placeholders_follow_bind_order() {
    let mut f = Fragments::new();
    f.eq("a", 1_i64);
    f.search(&["b", "c"], &["x".into()]);
    assert_eq!(f.where_clause(), "WHERE a = ?1 AND (b REGEXP ?2 OR c REGEXP ?2)");
  }

  #[test]
  fn absent_value_can_clear_a_column() {
    let mut f = Fragments::new();
    f.set("title", Some("x".to_owned()));
    f.set("summary", None::<String>);
    f.set_or_null("ends_on", None::<String>);
    assert_eq!(f.assignments(), "title = ?1, ends_on = NULL");
  }

  #[test]
  fn regexp_function_is_null_safe() {
    let conn = Connection::open_in_memory().unwrap();
    register_regexp(&conn).unwrap();
    let hit: bool = conn
      .query_row("SELECT 'Énergie Solaire' REGEXP ?1", ["(?i)solaire"], |r| r.get(0))
      .unwrap();
    let null: bool = conn
      .query_row("SELECT NULL REGEXP ?1", ["(?i)x"], |r| r.get(0))
      .unwrap();
    assert!(hit);
    assert!(!null);
  }
}
