//! Research projects and the records attached to them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  laboratory::LaboratoryDomain,
  metrics::{self, ProgressStage},
  partner::Partner,
  publication::PublicationBrief,
};

choices! {
  /// Lifecycle of a research project.
  pub enum ProjectStatus ("project status") {
    Planned   = "Planifier" => "Planifié",
    Ongoing   = "En cours"  => "En cours",
    Completed = "Terminer"  => "Terminé",
    Suspended = "Suspendu"  => "Suspendu",
    Cancelled = "Annuler"   => "Annulé",
  }
}

impl ProjectStatus {
  /// Planned or ongoing; the projects shown as "current" on a profile.
  pub fn is_current(self) -> bool {
    matches!(self, Self::Planned | Self::Ongoing)
  }
}

choices! {
  pub enum FundingSource ("funding source") {
    Public        = "Public"          => "Financement public",
    Private       = "Privé"           => "Financement privé",
    Mixed         = "Mixte"           => "Financement mixte",
    International = "International"   => "Financement international",
    SelfFunded    = "Autofinancement" => "Autofinancement",
  }
}

choices! {
  /// Role of a researcher within a project team.
  pub enum TeamRole ("team role") {
    ProjectLead         = "chef_projet"         => "Chef de projet",
    PrincipalResearcher = "chercheur_principal" => "Chercheur principal",
    AssociateResearcher = "chercheur_associe"   => "Chercheur associé",
    Postdoc             = "post_doc"            => "Post-doc",
    Student             = "etudiant"            => "Étudiant",
  }
}

choices! {
  /// State of a timeline entry.
  pub enum PhaseState ("phase state") {
    Ongoing = "en cours"   => "En cours",
    Done    = "termine"    => "Terminé",
    Waiting = "en attente" => "En attente",
  }
}

choices! {
  pub enum CollaborationType ("collaboration type") {
    Funding   = "Financement" => "Financement",
    Resources = "Ressources"  => "Ressources",
    Expertise = "Expertise"   => "Expertise",
    Equipment = "Equipements" => "Equipements",
    Staff     = "Personnel"   => "Personnel",
  }
}

// ─── Entities ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchProject {
  pub id:              i64,
  pub title:           String,
  pub description:     String,
  pub status:          ProjectStatus,
  pub research_domain: Option<String>,
  /// Comma-separated keywords as entered.
  pub keywords:        Option<String>,
  pub starts_on:       NaiveDate,
  pub planned_end_on:  Option<NaiveDate>,
  pub actual_end_on:   Option<NaiveDate>,
  pub total_budget:    Option<f64>,
  pub funding_source:  Option<FundingSource>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl ResearchProject {
  /// The actual end date if the project is finished, otherwise the planned one.
  pub fn effective_end(&self) -> Option<NaiveDate> {
    self.actual_end_on.or(self.planned_end_on)
  }

  pub fn progress(&self, today: NaiveDate) -> f64 {
    metrics::progress_percentage(self.starts_on, self.effective_end(), today)
  }

  pub fn planned_duration_days(&self) -> Option<i64> {
    metrics::duration_days(Some(self.starts_on), self.planned_end_on)
  }

  pub fn actual_duration_days(&self) -> Option<i64> {
    metrics::duration_days(Some(self.starts_on), self.actual_end_on)
  }

  /// Individual keywords, trimmed, blanks dropped.
  pub fn keyword_list(&self) -> Vec<String> {
    self
      .keywords
      .as_deref()
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|k| !k.is_empty())
      .map(str::to_owned)
      .collect()
  }

  /// Whether the actual end date, when set, does not precede the start.
  pub fn dates_are_consistent(&self) -> bool {
    self.actual_end_on.is_none_or(|end| end >= self.starts_on)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
  pub id:            i64,
  pub researcher_id: i64,
  pub full_name:     String,
  pub role:          TeamRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
  pub id:        i64,
  pub phase:     String,
  pub title:     String,
  pub starts_on: NaiveDate,
  pub ends_on:   NaiveDate,
  pub state:     PhaseState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
  pub id:        i64,
  pub objective: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
  pub id:            i64,
  pub title:         String,
  pub description:   String,
  pub achieved_on:   NaiveDate,
  pub impact:        String,
  pub external_link: String,
}

/// A project attached to a laboratory through one of its domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLaboratory {
  pub id:              i64,
  pub laboratory_name: String,
  pub link:            LaboratoryDomain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerCollaboration {
  pub id:                      i64,
  pub partner:                 Partner,
  pub kind:                    CollaborationType,
  pub partner_contribution:    Option<String>,
  pub laboratory_contribution: Option<String>,
  pub starts_on:               NaiveDate,
  pub ends_on:                 NaiveDate,
  pub funding_amount:          i64,
  pub currency:                String,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// Progress and duration figures derived for a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
  pub progress:          f64,
  pub stage:             ProgressStage,
  pub planned_days:      Option<i64>,
  pub planned_humanized: String,
  pub actual_days:       Option<i64>,
  pub actual_humanized:  String,
}

impl ProjectMetrics {
  pub fn compute(project: &ResearchProject, today: NaiveDate) -> Self {
    let progress = project.progress(today);
    let planned_days = project.planned_duration_days();
    let actual_days = project.actual_duration_days();
    Self {
      progress,
      stage: ProgressStage::from_percentage(progress),
      planned_days,
      planned_humanized: metrics::humanize_optional(planned_days, "Non définie"),
      actual_days,
      actual_humanized: metrics::humanize_optional(actual_days, "Non terminée"),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
  pub project:      ResearchProject,
  pub team:         Vec<TeamMember>,
  pub timeline:     Vec<TimelineEntry>,
  pub objectives:   Vec<Objective>,
  pub achievements: Vec<Achievement>,
  pub publications: Vec<PublicationBrief>,
  pub partners:     Vec<PartnerCollaboration>,
  pub laboratories: Vec<ProjectLaboratory>,
}
