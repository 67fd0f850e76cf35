//! Publications produced by research projects.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::project::TeamRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
  pub id:            i64,
  pub project_id:    i64,
  pub title:         String,
  pub summary:       Option<String>,
  /// Media-relative path of the attached document; empty when none.
  pub file:          Option<String>,
  pub doi:           Option<String>,
  pub impact_factor: Option<f64>,
  pub published_on:  Option<NaiveDate>,
  pub url:           Option<String>,
  pub content:       String,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Publication {
  pub fn has_file(&self) -> bool {
    self.file.as_deref().is_some_and(|f| !f.is_empty())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
  pub id:      i64,
  pub keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
  pub id:       i64,
  pub citation: String,
}

/// A member of the project a publication belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
  pub full_name: String,
  pub role:      TeamRole,
}

// ─── Read models ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationSummary {
  pub publication:    Publication,
  pub project_title:  String,
  pub citation_count: i64,
  pub contributors:   Vec<Contributor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationDetail {
  pub publication:   Publication,
  pub project_title: String,
  pub keywords:      Vec<Keyword>,
  pub citations:     Vec<Citation>,
}

/// Compact form embedded in researcher and project pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationBrief {
  pub id:            i64,
  pub title:         String,
  pub summary:       Option<String>,
  pub doi:           Option<String>,
  pub impact_factor: Option<f64>,
  pub published_on:  Option<NaiveDate>,
  pub url:           Option<String>,
  pub project_title: String,
}
