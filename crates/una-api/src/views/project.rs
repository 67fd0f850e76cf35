//! Research project views with derived progress and durations.

use chrono::NaiveDate;
use serde::Serialize;
use una_core::{
  Choice,
  project::{
    Achievement, CollaborationType, FundingSource, Objective, PartnerCollaboration, PhaseState,
    ProjectDetail, ProjectLaboratory, ProjectMetrics, ProjectStatus, ResearchProject, TeamMember,
    TeamRole, TimelineEntry,
  },
};

use super::{
  Links,
  laboratory::{LaboratoryDomainView, PartnerView},
  publication::PublicationBriefView,
};

#[derive(Debug, Serialize)]
pub struct ProjectView {
  pub id:                         i64,
  pub titre:                      String,
  pub description:                String,
  pub statu:                      ProjectStatus,
  pub statu_display:              &'static str,
  pub domaine_recherche:          Option<String>,
  pub mots_cles:                  Option<String>,
  pub mots_cles_liste:            Vec<String>,
  pub date_debut:                 NaiveDate,
  pub date_fin_prevue:            Option<NaiveDate>,
  pub date_fin_reelle:            Option<NaiveDate>,
  pub budget_total:               Option<f64>,
  pub source_financement:         Option<FundingSource>,
  pub source_financement_display: Option<&'static str>,
  pub progression:                f64,
  pub etape_progression:          &'static str,
  pub duree_prevue_jours:         Option<i64>,
  pub duree_prevue:               String,
  pub duree_reelle_jours:         Option<i64>,
  pub duree_reelle:               String,
}

impl ProjectView {
  pub fn new(p: &ResearchProject, today: NaiveDate) -> Self {
    let metrics = ProjectMetrics::compute(p, today);
    Self {
      id:                         p.id,
      titre:                      p.title.clone(),
      description:                p.description.clone(),
      statu:                      p.status,
      statu_display:              p.status.label(),
      domaine_recherche:          p.research_domain.clone(),
      mots_cles:                  p.keywords.clone(),
      mots_cles_liste:            p.keyword_list(),
      date_debut:                 p.starts_on,
      date_fin_prevue:            p.planned_end_on,
      date_fin_reelle:            p.actual_end_on,
      budget_total:               p.total_budget,
      source_financement:         p.funding_source,
      source_financement_display: p.funding_source.map(Choice::label),
      progression:                metrics.progress,
      etape_progression:          metrics.stage.label(),
      duree_prevue_jours:         metrics.planned_days,
      duree_prevue:               metrics.planned_humanized,
      duree_reelle_jours:         metrics.actual_days,
      duree_reelle:               metrics.actual_humanized,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct TeamMemberView {
  pub id:                  i64,
  pub id_chercheur:        i64,
  pub nom_complet:         String,
  pub role_equipe:         TeamRole,
  pub role_equipe_display: &'static str,
}

impl From<&TeamMember> for TeamMemberView {
  fn from(m: &TeamMember) -> Self {
    Self {
      id:                  m.id,
      id_chercheur:        m.researcher_id,
      nom_complet:         m.full_name.clone(),
      role_equipe:         m.role,
      role_equipe_display: m.role.label(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct TimelineView {
  pub id:           i64,
  pub phase:        String,
  pub titre:        String,
  pub date_debut:   NaiveDate,
  pub date_fin:     NaiveDate,
  pub etat:         PhaseState,
  pub etat_display: &'static str,
}

impl From<&TimelineEntry> for TimelineView {
  fn from(t: &TimelineEntry) -> Self {
    Self {
      id:           t.id,
      phase:        t.phase.clone(),
      titre:        t.title.clone(),
      date_debut:   t.starts_on,
      date_fin:     t.ends_on,
      etat:         t.state,
      etat_display: t.state.label(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ObjectiveView {
  pub id:       i64,
  pub objectif: String,
}

impl From<&Objective> for ObjectiveView {
  fn from(o: &Objective) -> Self {
    Self { id: o.id, objectif: o.objective.clone() }
  }
}

#[derive(Debug, Serialize)]
pub struct AchievementView {
  pub id:               i64,
  pub titre:            String,
  pub description:      String,
  pub date_realisation: NaiveDate,
  pub impact:           String,
  pub lien_externe:     String,
}

impl From<&Achievement> for AchievementView {
  fn from(a: &Achievement) -> Self {
    Self {
      id:               a.id,
      titre:            a.title.clone(),
      description:      a.description.clone(),
      date_realisation: a.achieved_on,
      impact:           a.impact.clone(),
      lien_externe:     a.external_link.clone(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct CollaborationView {
  pub id:                       i64,
  pub partenaire:               PartnerView,
  pub type_collaboration:       CollaborationType,
  pub contribution_partenaire:  Option<String>,
  pub contribution_laboratoire: Option<String>,
  pub date_debut:               NaiveDate,
  pub date_fin:                 NaiveDate,
  pub montant_financement:      i64,
  pub monnaie:                  String,
}

impl CollaborationView {
  fn new(c: &PartnerCollaboration, links: &Links<'_>) -> Self {
    Self {
      id:                       c.id,
      partenaire:               PartnerView::new(&c.partner, links),
      type_collaboration:       c.kind,
      contribution_partenaire:  c.partner_contribution.clone(),
      contribution_laboratoire: c.laboratory_contribution.clone(),
      date_debut:               c.starts_on,
      date_fin:                 c.ends_on,
      montant_financement:      c.funding_amount,
      monnaie:                  c.currency.clone(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ProjectLaboratoryView {
  pub id:                  i64,
  pub laboratoire_nom:     String,
  pub laboratoire_domaine: LaboratoryDomainView,
}

impl ProjectLaboratoryView {
  fn new(l: &ProjectLaboratory, links: &Links<'_>) -> Self {
    Self {
      id:                  l.id,
      laboratoire_nom:     l.laboratory_name.clone(),
      laboratoire_domaine: LaboratoryDomainView::new(&l.link, links),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailView {
  #[serde(flatten)]
  pub recherche:    ProjectView,
  pub equipe:       Vec<TeamMemberView>,
  pub chronologie:  Vec<TimelineView>,
  pub objectifs:    Vec<ObjectiveView>,
  pub realisations: Vec<AchievementView>,
  pub publications: Vec<PublicationBriefView>,
  pub partenaires:  Vec<CollaborationView>,
  pub laboratoires: Vec<ProjectLaboratoryView>,
}

impl ProjectDetailView {
  pub fn new(d: &ProjectDetail, links: &Links<'_>, today: NaiveDate) -> Self {
    Self {
      recherche:    ProjectView::new(&d.project, today),
      equipe:       d.team.iter().map(Into::into).collect(),
      chronologie:  d.timeline.iter().map(Into::into).collect(),
      objectifs:    d.objectives.iter().map(Into::into).collect(),
      realisations: d.achievements.iter().map(Into::into).collect(),
      publications: d.publications.iter().map(Into::into).collect(),
      partenaires:  d.partners.iter().map(|c| CollaborationView::new(c, links)).collect(),
      laboratoires: d.laboratories.iter().map(|l| ProjectLaboratoryView::new(l, links)).collect(),
    }
  }
}
