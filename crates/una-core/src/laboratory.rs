//! Laboratories and their public-facing content.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{partner::Partner, researcher::Domain};

choices! {
  /// Generic active/inactive flag used by tracks, news items and
  /// laboratory memberships.
  pub enum ActivityStatus ("activity status") {
    Active   = "Actif"   => "Actif",
    Inactive = "Inactif" => "Inactif",
  }
}

choices! {
  pub enum PartnershipStatus ("partnership status") {
    Active   = "Actif"   => "Actif",
    Inactive = "Inactif" => "Inactif",
    Ended    = "Termine" => "Terminé",
  }
}

choices! {
  pub enum PartnerCategory ("partner category") {
    Academic      = "Académiques et scientifiques"   => "Académiques et scientifiques",
    Institutional = "Institutionnels"                => "Institutionnels",
    Industrial    = "Industriels et privés"          => "Industriels et privés",
    Financial     = "Financiers"                     => "Financiers",
    Technological = "Technologiques et d’innovation" => "Technologiques et d’innovation",
    CivilSociety  = "Associatifs et société civile"  => "Associatifs et société civile",
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaboratoryType {
  pub id:    i64,
  pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laboratory {
  pub id:         i64,
  pub name:       String,
  pub logo:       Option<String>,
  /// Administrative unit (UFR) the laboratory belongs to.
  pub unit:       String,
  pub founded_on: NaiveDate,
  pub kind:       LaboratoryType,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A laboratory working in a domain. Research projects attach to
/// laboratories through this link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaboratoryDomain {
  pub id:            i64,
  pub laboratory_id: i64,
  pub domain:        Domain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
  pub id:           i64,
  pub title:        String,
  pub excerpt:      String,
  pub key_phrase:   String,
  pub body:         String,
  pub published_on: NaiveDate,
  pub image:        Option<String>,
  pub status:       ActivityStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
  pub id:          i64,
  pub title:       String,
  pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
  pub id:            i64,
  pub description:   String,
  pub founded_on:    NaiveDate,
  pub annual_budget: i64,
  pub currency:      String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partnership {
  pub id:       i64,
  pub partner:  Partner,
  pub status:   PartnershipStatus,
  pub category: PartnerCategory,
}

/// The laboratory page: identity plus its owned collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaboratoryDetail {
  pub laboratory:    Laboratory,
  pub domains:       Vec<LaboratoryDomain>,
  /// Active news items, most recent first.
  pub news:          Vec<NewsItem>,
  pub presentations: Vec<Presentation>,
  pub missions:      Vec<Mission>,
  pub partnerships:  Vec<Partnership>,
}
