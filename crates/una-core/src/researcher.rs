//! Researchers and the records hanging off a researcher profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  project::{ProjectStatus, TeamRole},
  publication::PublicationBrief,
};

choices! {
  /// Employment status. Only `Active` researchers are listed publicly.
  pub enum ResearcherStatus ("researcher status") {
    Active   = "actif"    => "Actif",
    Inactive = "inactif"  => "Inactif",
    Retired  = "retraite" => "Retraité",
    Departed = "depart"   => "Départ",
  }
}

choices! {
  /// Kind of a social or contact link on a researcher profile.
  pub enum NetworkKind ("network kind") {
    Facebook      = "Facebook"      => "Facebook",
    Twitter       = "Twitter"       => "Twitter",
    LinkedIn      = "LinkedIn"      => "LinkedIn",
    Instagram     = "Instagram"     => "Instagram",
    YouTube       = "YouTube"       => "YouTube",
    TikTok        = "TikTok"        => "TikTok",
    WhatsApp      = "WhatsApp"      => "WhatsApp",
    Telegram      = "Telegram"      => "Telegram",
    Snapchat      = "Snapchat"      => "Snapchat",
    ResearchGate  = "ResearchGate"  => "ResearchGate",
    Orcid         = "ORCID"         => "ORCID",
    GoogleScholar = "GoogleScholar" => "GoogleScholar",
    GitHub        = "GitHub"        => "GitHub",
    Website       = "SiteWeb"       => "SiteWeb",
    Email         = "Email"         => "Email",
    Phone         = "Téléphone"     => "Téléphone",
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Researcher {
  pub id:          i64,
  pub family_name: Option<String>,
  pub given_name:  Option<String>,
  pub biography:   Option<String>,
  /// Media-relative path of the profile photo.
  pub photo:       Option<String>,
  pub status:      ResearcherStatus,
  pub hired_on:    NaiveDate,
  pub office:      String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Researcher {
  /// "Given Family", skipping whichever part is missing.
  pub fn full_name(&self) -> String {
    full_name(self.given_name.as_deref(), self.family_name.as_deref())
  }
}

pub fn full_name(given: Option<&str>, family: Option<&str>) -> String {
  [given, family]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// A research or teaching domain shared by researchers and laboratories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
  pub id:          i64,
  pub title:       String,
  pub description: String,
  pub image:       Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
  pub id:           i64,
  pub name:         String,
  pub abbreviation: String,
  pub grade:        Option<String>,
}

/// A researcher holding a position. Laboratory membership hangs off this
/// link rather than off the researcher directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionLink {
  pub id:       i64,
  pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertiseLink {
  pub id:     i64,
  pub domain: Domain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
  pub id:      i64,
  pub kind:    NetworkKind,
  pub contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diploma {
  pub id:          i64,
  pub institution: String,
  pub diploma:     String,
  pub obtained_on: NaiveDate,
}

/// A dated free-text note on a researcher profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearcherNote {
  pub id:        i64,
  pub title:     String,
  pub body:      String,
  pub noted_on:  NaiveDate,
}

/// A project the researcher is currently involved in, with their role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentProject {
  pub project_id:     i64,
  pub title:          String,
  pub description:    String,
  pub status:         ProjectStatus,
  pub role:           TeamRole,
  pub starts_on:      NaiveDate,
  pub planned_end_on: Option<NaiveDate>,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// Flattened listing entry with the convenience fields shown on team pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearcherSummary {
  pub researcher:         Researcher,
  /// Name of the first position held.
  pub principal_position: Option<String>,
  /// Title of the first expertise domain.
  pub speciality:         Option<String>,
  /// Contact of the first `Email` link.
  pub email:              Option<String>,
  pub links:              Vec<SocialLink>,
}

impl ResearcherSummary {
  /// Derive the convenience fields from the researcher's related rows, each
  /// given in storage order.
  pub fn from_parts(
    researcher: Researcher,
    positions: &[PositionLink],
    expertise: &[ExpertiseLink],
    links: Vec<SocialLink>,
  ) -> Self {
    let email = links
      .iter()
      .find(|l| l.kind == NetworkKind::Email)
      .map(|l| l.contact.clone());
    Self {
      researcher,
      principal_position: positions.first().map(|p| p.position.name.clone()),
      speciality: expertise.first().map(|e| e.domain.title.clone()),
      email,
      links,
    }
  }
}

/// Everything shown on a researcher's profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearcherDetail {
  pub researcher:       Researcher,
  pub links:            Vec<SocialLink>,
  pub positions:        Vec<PositionLink>,
  pub expertise:        Vec<ExpertiseLink>,
  pub diplomas:         Vec<Diploma>,
  pub notes:            Vec<ResearcherNote>,
  /// Publications of every project the researcher is a member of.
  pub publications:     Vec<PublicationBrief>,
  /// Member projects that are planned or ongoing.
  pub current_projects: Vec<CurrentProject>,
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;

  fn researcher() -> Researcher {
    Researcher {
      id:          1,
      family_name: Some("Diallo".into()),
      given_name:  Some("Awa".into()),
      biography:   None,
      photo:       None,
      status:      ResearcherStatus::Active,
      hired_on:    NaiveDate::from_ymd_opt(2019, 9, 1).unwrap(),
      office:      "B12".into(),
      created_at:  Utc::now(),
      updated_at:  Utc::now(),
    }
  }

  fn link(id: i64, kind: NetworkKind, contact: &str) -> SocialLink {
    SocialLink { id, kind, contact: contact.into() }
  }

  #[test]
  fn full_name_skips_missing_parts() {
    let mut r = researcher();
    assert_eq!(r.full_name(), "Awa Diallo");
    r.given_name = None;
    assert_eq!(r.full_name(), "Diallo");
  }

  #[test]
  fn summary_picks_first_of_each_relation() {
    let positions = vec![
      PositionLink {
        id:       1,
        position: Position {
          id:           3,
          name:         "Maître de conférences".into(),
          abbreviation: "MC".into(),
          grade:        None,
        },
      },
      PositionLink {
        id:       2,
        position: Position {
          id:           4,
          name:         "Directeur".into(),
          abbreviation: "DIR".into(),
          grade:        None,
        },
      },
    ];
    let links = vec![
      link(1, NetworkKind::LinkedIn, "linkedin.com/in/awa"),
      link(2, NetworkKind::Email, "awa@una.edu"),
      link(3, NetworkKind::Email, "awa.perso@example.com"),
    ];

    let summary = ResearcherSummary::from_parts(researcher(), &positions, &[], links);

    assert_eq!(summary.principal_position.as_deref(), Some("Maître de conférences"));
    assert_eq!(summary.speciality, None);
    assert_eq!(summary.email.as_deref(), Some("awa@una.edu"));
    assert_eq!(summary.links.len(), 3);
  }
}
