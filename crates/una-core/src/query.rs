//! Query-string parameters and the typed filters built from them.
//!
//! Every listing declares its parameters once, as [`ParamSpec`] constants in
//! [`params`]. Parsing is fail-open: a missing, malformed or out-of-domain
//! value reads as "not supplied" and never produces an error, so a bad filter
//! value can at worst widen a listing, never break it.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  choices::Choice,
  contact::{ContactType, MessageStatus, Priority, Weekday},
  project::ProjectStatus,
};

/// Query-string parameters exactly as received.
pub type RawParams = HashMap<String, String>;

// ─── Parameter specifications ────────────────────────────────────────────────

/// A named query parameter and the parser for its value.
#[derive(Clone, Copy)]
pub struct ParamSpec<T> {
  pub name: &'static str,
  parse:    fn(&str) -> Option<T>,
}

impl<T> ParamSpec<T> {
  pub const fn new(name: &'static str, parse: fn(&str) -> Option<T>) -> Self {
    Self { name, parse }
  }

  /// The parsed value, or `None` if absent or unparsable.
  pub fn get(&self, params: &RawParams) -> Option<T> {
    params.get(self.name).and_then(|raw| (self.parse)(raw))
  }
}

/// Integer identifier; surrounding whitespace tolerated.
pub fn parse_id(raw: &str) -> Option<i64> {
  raw.trim().parse().ok()
}

/// Strictly ASCII digits, nothing else.
pub fn parse_digits(raw: &str) -> Option<i64> {
  if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  raw.parse().ok()
}

pub fn parse_year(raw: &str) -> Option<i32> {
  parse_digits(raw).and_then(|y| i32::try_from(y).ok())
}

pub fn parse_float(raw: &str) -> Option<f64> {
  raw.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Non-blank text, trimmed.
pub fn parse_text(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Whitespace-separated search terms; `None` when there are none.
pub fn parse_terms(raw: &str) -> Option<Vec<String>> {
  let terms: Vec<String> = raw.split_whitespace().map(str::to_owned).collect();
  (!terms.is_empty()).then_some(terms)
}

/// Comma-separated list, entries trimmed, blanks dropped.
pub fn parse_list(raw: &str) -> Option<Vec<String>> {
  let items: Vec<String> = raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect();
  (!items.is_empty()).then_some(items)
}

/// Presence switch: only `1`, `true` and `True` turn it on.
pub fn parse_switch(raw: &str) -> Option<bool> {
  matches!(raw, "1" | "true" | "True").then_some(true)
}

/// Tri-state boolean; anything unrecognised reads as unset.
pub fn parse_bool(raw: &str) -> Option<bool> {
  match raw {
    "1" | "true" | "True" => Some(true),
    "0" | "false" | "False" => Some(false),
    _ => None,
  }
}

/// `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn parse_weekday(raw: &str) -> Option<Weekday> {
  raw.trim().parse::<u8>().ok().and_then(|n| Weekday::try_from(n).ok())
}

pub fn parse_choice<C: Choice>(raw: &str) -> Option<C> {
  C::from_code(raw)
}

/// Every parameter accepted by the listing endpoints.
pub mod params {
  use super::*;

  pub const SEARCH: ParamSpec<Vec<String>> = ParamSpec::new("search", parse_terms);
  pub const LABORATORY_ID: ParamSpec<i64> = ParamSpec::new("laboratoire_id", parse_id);
  pub const LABORATORY_NAME: ParamSpec<String> = ParamSpec::new("laboratoire_nom", parse_text);
  pub const LABORATORY_DOMAIN_ID: ParamSpec<i64> =
    ParamSpec::new("laboratoire_domaine_id", parse_id);
  pub const TRACK: ParamSpec<i64> = ParamSpec::new("parcours", parse_id);

  pub const KEYWORDS: ParamSpec<Vec<String>> = ParamSpec::new("mot_cle", parse_list);
  pub const CITATION: ParamSpec<String> = ParamSpec::new("citation", parse_text);
  pub const YEAR: ParamSpec<i32> = ParamSpec::new("year", parse_year);
  pub const MIN_IMPACT_FACTOR: ParamSpec<f64> = ParamSpec::new("min_facteur_impact", parse_float);
  pub const PROJECT: ParamSpec<i64> = ParamSpec::new("recherche", parse_digits);
  pub const HAS_PDF: ParamSpec<bool> = ParamSpec::new("has_pdf", parse_switch);
  pub const HAS_URL: ParamSpec<bool> = ParamSpec::new("has_url", parse_switch);
  pub const ORDERING: ParamSpec<PublicationOrdering> =
    ParamSpec::new("ordering", PublicationOrdering::parse);

  pub const PROJECT_STATUS: ParamSpec<ProjectStatus> =
    ParamSpec::new("statut", parse_choice::<ProjectStatus>);

  pub const CONTACT_TYPE: ParamSpec<ContactType> =
    ParamSpec::new("type_contact", parse_choice::<ContactType>);
  pub const ACTIVE: ParamSpec<bool> = ParamSpec::new("est_actif", parse_bool);

  pub const CONTACT_ID: ParamSpec<i64> = ParamSpec::new("contact_id", parse_id);
  pub const WEEKDAY: ParamSpec<Weekday> = ParamSpec::new("jour", parse_weekday);
  pub const OPEN_ONLY: ParamSpec<bool> = ParamSpec::new("ouvert_seulement", parse_bool);

  pub const MESSAGE_STATUS: ParamSpec<MessageStatus> =
    ParamSpec::new("statut_message", parse_choice::<MessageStatus>);
  pub const PRIORITY: ParamSpec<Priority> = ParamSpec::new("priorite", parse_choice::<Priority>);
  pub const PROCESSED: ParamSpec<bool> = ParamSpec::new("est_traite", parse_bool);
  pub const SENT_FROM: ParamSpec<NaiveDate> = ParamSpec::new("date_debut", parse_date);
  pub const SENT_TO: ParamSpec<NaiveDate> = ParamSpec::new("date_fin", parse_date);
}

// ─── Laboratory scope ────────────────────────────────────────────────────────

/// How listings that accept a scoping `laboratoire_id` behave without one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopePolicy {
  /// Fall back to the configured default laboratory.
  #[default]
  DefaultLaboratory,
  /// No laboratory restriction.
  Unrestricted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaboratoryScope {
  pub policy:                ScopePolicy,
  pub default_laboratory_id: i64,
}

impl Default for LaboratoryScope {
  fn default() -> Self {
    Self { policy: ScopePolicy::DefaultLaboratory, default_laboratory_id: 1 }
  }
}

impl LaboratoryScope {
  pub fn unrestricted() -> Self {
    Self { policy: ScopePolicy::Unrestricted, ..Self::default() }
  }

  /// The laboratory a scoped listing is restricted to.
  pub fn resolve(&self, explicit: Option<i64>) -> Option<i64> {
    explicit.or(match self.policy {
      ScopePolicy::DefaultLaboratory => Some(self.default_laboratory_id),
      ScopePolicy::Unrestricted => None,
    })
  }

  fn resolve_param(&self, raw: &RawParams) -> Option<i64> {
    self.resolve(params::LABORATORY_ID.get(raw))
  }
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Active researchers. Every search term must match the family or given name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearcherFilter {
  pub search:        Vec<String>,
  pub laboratory_id: Option<i64>,
}

impl ResearcherFilter {
  pub fn from_params(raw: &RawParams) -> Self {
    Self {
      search:        params::SEARCH.get(raw).unwrap_or_default(),
      laboratory_id: params::LABORATORY_ID.get(raw),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaboratoryFilter {
  pub search: Vec<String>,
}

impl LaboratoryFilter {
  pub fn from_params(raw: &RawParams) -> Self {
    Self { search: params::SEARCH.get(raw).unwrap_or_default() }
  }
}

/// Active tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackFilter {
  pub search:          Vec<String>,
  pub laboratory_id:   Option<i64>,
  pub laboratory_name: Option<String>,
}

impl TrackFilter {
  pub fn from_params(raw: &RawParams, scope: &LaboratoryScope) -> Self {
    Self {
      search:          params::SEARCH.get(raw).unwrap_or_default(),
      laboratory_id:   scope.resolve_param(raw),
      laboratory_name: params::LABORATORY_NAME.get(raw),
    }
  }

  /// Active tracks of one laboratory, nothing else.
  pub fn for_laboratory(laboratory_id: i64) -> Self {
    Self { laboratory_id: Some(laboratory_id), ..Self::default() }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationFilter {
  pub track_id: Option<i64>,
  pub search:   Vec<String>,
}

impl ApplicationFilter {
  pub fn from_params(raw: &RawParams) -> Self {
    Self {
      track_id: params::TRACK.get(raw),
      search:   params::SEARCH.get(raw).unwrap_or_default(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicationFilter {
  pub search:               Vec<String>,
  /// Any keyword matching any of these terms, case-insensitively.
  pub keywords:             Vec<String>,
  pub citation:             Option<String>,
  pub year:                 Option<i32>,
  pub min_impact_factor:    Option<f64>,
  pub project_id:           Option<i64>,
  pub laboratory_id:        Option<i64>,
  pub laboratory_domain_id: Option<i64>,
  pub has_pdf:              bool,
  pub has_url:              bool,
  pub ordering:             PublicationOrdering,
}

impl PublicationFilter {
  pub fn from_params(raw: &RawParams, scope: &LaboratoryScope) -> Self {
    Self {
      search:               params::SEARCH.get(raw).unwrap_or_default(),
      keywords:             params::KEYWORDS.get(raw).unwrap_or_default(),
      citation:             params::CITATION.get(raw),
      year:                 params::YEAR.get(raw),
      min_impact_factor:    params::MIN_IMPACT_FACTOR.get(raw),
      project_id:           params::PROJECT.get(raw),
      laboratory_id:        scope.resolve_param(raw),
      laboratory_domain_id: params::LABORATORY_DOMAIN_ID.get(raw),
      has_pdf:              params::HAS_PDF.get(raw).unwrap_or(false),
      has_url:              params::HAS_URL.get(raw).unwrap_or(false),
      ordering:             params::ORDERING.get(raw).unwrap_or_default(),
    }
  }
}

/// Sortable publication columns, by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationSortKey {
  Id,
  Title,
  PublishedOn,
  ImpactFactor,
  Doi,
  CreatedAt,
  UpdatedAt,
}

impl PublicationSortKey {
  pub fn from_name(name: &str) -> Option<Self> {
    Some(match name {
      "id" => Self::Id,
      "titre" => Self::Title,
      "date_publication" => Self::PublishedOn,
      "facteur_impact" => Self::ImpactFactor,
      "doi" => Self::Doi,
      "creer_le" => Self::CreatedAt,
      "mise_a_jour_le" => Self::UpdatedAt,
      _ => return None,
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationOrdering {
  pub key:        PublicationSortKey,
  pub descending: bool,
}

impl Default for PublicationOrdering {
  /// Most recent first.
  fn default() -> Self {
    Self { key: PublicationSortKey::PublishedOn, descending: true }
  }
}

impl PublicationOrdering {
  /// `key` or `-key`; unknown keys are rejected.
  pub fn parse(raw: &str) -> Option<Self> {
    let (descending, name) = match raw.strip_prefix('-') {
      Some(rest) => (true, rest),
      None => (false, raw),
    };
    PublicationSortKey::from_name(name).map(|key| Self { key, descending })
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
  pub status:        Option<ProjectStatus>,
  pub laboratory_id: Option<i64>,
  pub search:        Vec<String>,
}

impl ProjectFilter {
  pub fn from_params(raw: &RawParams) -> Self {
    Self {
      status:        params::PROJECT_STATUS.get(raw),
      laboratory_id: params::LABORATORY_ID.get(raw),
      search:        params::SEARCH.get(raw).unwrap_or_default(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFilter {
  pub laboratory_id: Option<i64>,
  pub kind:          Option<ContactType>,
  pub active:        Option<bool>,
}

impl ContactFilter {
  pub fn from_params(raw: &RawParams, scope: &LaboratoryScope) -> Self {
    Self {
      laboratory_id: scope.resolve_param(raw),
      kind:          params::CONTACT_TYPE.get(raw),
      active:        params::ACTIVE.get(raw),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoursFilter {
  pub contact_id:    Option<i64>,
  pub weekday:       Option<Weekday>,
  /// Exclude days marked closed.
  pub open_only:     bool,
  pub laboratory_id: Option<i64>,
}

impl HoursFilter {
  pub fn from_params(raw: &RawParams, scope: &LaboratoryScope) -> Self {
    Self {
      contact_id:    params::CONTACT_ID.get(raw),
      weekday:       params::WEEKDAY.get(raw),
      open_only:     params::OPEN_ONLY.get(raw).unwrap_or(false),
      laboratory_id: scope.resolve_param(raw),
    }
  }

  /// Every entry of one contact.
  pub fn for_contact(contact_id: i64) -> Self {
    Self { contact_id: Some(contact_id), ..Self::default() }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageFilter {
  pub laboratory_id: Option<i64>,
  pub status:        Option<MessageStatus>,
  pub priority:      Option<Priority>,
  pub processed:     Option<bool>,
  /// Inclusive bounds on the date the message was sent.
  pub sent_from:     Option<NaiveDate>,
  pub sent_to:       Option<NaiveDate>,
}

impl MessageFilter {
  pub fn from_params(raw: &RawParams) -> Self {
    Self {
      laboratory_id: params::LABORATORY_ID.get(raw),
      status:        params::MESSAGE_STATUS.get(raw),
      priority:      params::PRIORITY.get(raw),
      processed:     params::PROCESSED.get(raw),
      sent_from:     params::SENT_FROM.get(raw),
      sent_to:       params::SENT_TO.get(raw),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(pairs: &[(&str, &str)]) -> RawParams {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  #[test]
  fn malformed_laboratory_id_reads_as_absent() {
    let bad = ResearcherFilter::from_params(&raw(&[("laboratoire_id", "abc")]));
    let none = ResearcherFilter::from_params(&raw(&[]));
    assert_eq!(bad, none);
  }

  #[test]
  fn scope_falls_back_to_default_laboratory() {
    let scope = LaboratoryScope::default();
    let f = PublicationFilter::from_params(&raw(&[("laboratoire_id", "x")]), &scope);
    assert_eq!(f.laboratory_id, Some(1));
    let f = PublicationFilter::from_params(&raw(&[("laboratoire_id", "7")]), &scope);
    assert_eq!(f.laboratory_id, Some(7));
  }

  #[test]
  fn unrestricted_scope_has_no_default() {
    let f = TrackFilter::from_params(&raw(&[]), &LaboratoryScope::unrestricted());
    assert_eq!(f.laboratory_id, None);
  }

  #[test]
  fn explicit_only_listings_ignore_the_scope() {
    let f = MessageFilter::from_params(&raw(&[]));
    assert_eq!(f.laboratory_id, None);
    let f = ProjectFilter::from_params(&raw(&[("laboratoire_id", "")]));
    assert_eq!(f.laboratory_id, None);
  }

  #[test]
  fn digits_only_parameters_reject_signs_and_spaces() {
    let f = PublicationFilter::from_params(
      &raw(&[("year", "-2020"), ("recherche", " 3")]),
      &LaboratoryScope::unrestricted(),
    );
    assert_eq!(f.year, None);
    assert_eq!(f.project_id, None);
  }

  #[test]
  fn keyword_list_is_trimmed() {
    let f = PublicationFilter::from_params(
      &raw(&[("mot_cle", " ai , ,biology")]),
      &LaboratoryScope::unrestricted(),
    );
    assert_eq!(f.keywords, vec!["ai", "biology"]);
  }

  #[test]
  fn switches_only_accept_truthy_spellings() {
    let on = raw(&[("has_pdf", "True"), ("has_url", "yes")]);
    let f = PublicationFilter::from_params(&on, &LaboratoryScope::unrestricted());
    assert!(f.has_pdf);
    assert!(!f.has_url);
  }

  #[test]
  fn ordering_falls_back_to_newest_first() {
    let f = PublicationFilter::from_params(
      &raw(&[("ordering", "-nonexistent")]),
      &LaboratoryScope::unrestricted(),
    );
    assert_eq!(f.ordering, PublicationOrdering::default());
    assert_eq!(
      PublicationOrdering::parse("facteur_impact"),
      Some(PublicationOrdering { key: PublicationSortKey::ImpactFactor, descending: false })
    );
    assert_eq!(PublicationOrdering::parse("--titre"), None);
  }

  #[test]
  fn min_impact_factor_ignores_garbage() {
    assert_eq!(parse_float("2.5"), Some(2.5));
    assert_eq!(parse_float("abc"), None);
    assert_eq!(parse_float("NaN"), None);
  }

  #[test]
  fn message_filter_parses_codes_and_dates() {
    let f = MessageFilter::from_params(&raw(&[
      ("statut_message", "traite"),
      ("priorite", "Urgente"),
      ("est_traite", "false"),
      ("date_debut", "2024-02-30"),
      ("date_fin", "2024-03-01"),
    ]));
    assert_eq!(f.status, Some(MessageStatus::Processed));
    assert_eq!(f.priority, None);
    assert_eq!(f.processed, Some(false));
    assert_eq!(f.sent_from, None);
    assert_eq!(f.sent_to, NaiveDate::from_ymd_opt(2024, 3, 1));
  }

  #[test]
  fn hours_filter_validates_weekday() {
    let scope = LaboratoryScope::unrestricted();
    assert_eq!(HoursFilter::from_params(&raw(&[("jour", "8")]), &scope).weekday, None);
    assert_eq!(
      HoursFilter::from_params(&raw(&[("jour", "3")]), &scope).weekday,
      Some(Weekday::Wednesday)
    );
  }
}
