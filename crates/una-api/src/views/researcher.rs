//! Researcher list and profile views.

use chrono::NaiveDate;
use serde::Serialize;
use una_core::{
  Choice,
  project::{ProjectStatus, TeamRole},
  researcher::{
    CurrentProject, Diploma, Domain, ExpertiseLink, NetworkKind, PositionLink, ResearcherDetail,
    ResearcherNote, ResearcherStatus, ResearcherSummary, SocialLink,
  },
};

use super::{Links, publication::PublicationBriefView};

#[derive(Debug, Serialize)]
pub struct SocialLinkView {
  pub id:          i64,
  pub type_reseau: NetworkKind,
  pub contact:     String,
}

impl From<&SocialLink> for SocialLinkView {
  fn from(l: &SocialLink) -> Self {
    Self { id: l.id, type_reseau: l.kind, contact: l.contact.clone() }
  }
}

#[derive(Debug, Serialize)]
pub struct DomainView {
  pub id:          i64,
  pub titre:       String,
  pub description: String,
  pub image_url:   Option<String>,
}

impl DomainView {
  pub fn new(d: &Domain, links: &Links<'_>) -> Self {
    Self {
      id:          d.id,
      titre:       d.title.clone(),
      description: d.description.clone(),
      image_url:   links.file(d.image.as_deref()),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct PositionView {
  pub id:                i64,
  pub nom:               String,
  pub abreviation_poste: String,
  pub grade:             Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PositionLinkView {
  pub id:    i64,
  pub poste: PositionView,
}

impl From<&PositionLink> for PositionLinkView {
  fn from(l: &PositionLink) -> Self {
    let p = &l.position;
    Self {
      id:    l.id,
      poste: PositionView {
        id:                p.id,
        nom:               p.name.clone(),
        abreviation_poste: p.abbreviation.clone(),
        grade:             p.grade.clone(),
      },
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ExpertiseView {
  pub id:      i64,
  pub domaine: DomainView,
}

impl ExpertiseView {
  fn new(e: &ExpertiseLink, links: &Links<'_>) -> Self {
    Self { id: e.id, domaine: DomainView::new(&e.domain, links) }
  }
}

#[derive(Debug, Serialize)]
pub struct DiplomaView {
  pub id:              i64,
  pub etablissement:   String,
  pub diplome:         String,
  pub annee_obtention: NaiveDate,
}

impl From<&Diploma> for DiplomaView {
  fn from(d: &Diploma) -> Self {
    Self {
      id:              d.id,
      etablissement:   d.institution.clone(),
      diplome:         d.diploma.clone(),
      annee_obtention: d.obtained_on,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct NoteView {
  pub id:    i64,
  pub titre: String,
  pub mot:   String,
  pub date:  NaiveDate,
}

impl From<&ResearcherNote> for NoteView {
  fn from(n: &ResearcherNote) -> Self {
    Self { id: n.id, titre: n.title.clone(), mot: n.body.clone(), date: n.noted_on }
  }
}

#[derive(Debug, Serialize)]
pub struct CurrentProjectView {
  pub id:              i64,
  pub titre:           String,
  pub description:     String,
  pub statut:          ProjectStatus,
  pub role_equipe:     TeamRole,
  pub date_debut:      NaiveDate,
  pub date_fin_prevue: Option<NaiveDate>,
}

impl From<&CurrentProject> for CurrentProjectView {
  fn from(p: &CurrentProject) -> Self {
    Self {
      id:              p.project_id,
      titre:           p.title.clone(),
      description:     p.description.clone(),
      statut:          p.status,
      role_equipe:     p.role,
      date_debut:      p.starts_on,
      date_fin_prevue: p.planned_end_on,
    }
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResearcherListView {
  pub id:              i64,
  pub nom:             Option<String>,
  pub prenom:          Option<String>,
  pub photo_url:       Option<String>,
  pub poste_principal: Option<String>,
  pub biographie:      Option<String>,
  pub specialite:      Option<String>,
  pub email:           Option<String>,
  pub reseaux:         Vec<SocialLinkView>,
}

impl ResearcherListView {
  pub fn new(s: &ResearcherSummary, links: &Links<'_>) -> Self {
    let r = &s.researcher;
    Self {
      id:              r.id,
      nom:             r.family_name.clone(),
      prenom:          r.given_name.clone(),
      photo_url:       links.file(r.photo.as_deref()),
      poste_principal: s.principal_position.clone(),
      biographie:      r.biography.clone(),
      specialite:      s.speciality.clone(),
      email:           s.email.clone(),
      reseaux:         s.links.iter().map(Into::into).collect(),
    }
  }
}

// ─── Detail ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResearcherDetailView {
  pub id:                   i64,
  pub nom:                  Option<String>,
  pub prenom:               Option<String>,
  pub nom_complet:          String,
  pub biographie:           Option<String>,
  pub photo_url:            Option<String>,
  pub statut:               ResearcherStatus,
  pub statut_display:       &'static str,
  pub date_embauche:        NaiveDate,
  pub bureau:               String,
  pub reseaux:              Vec<SocialLinkView>,
  pub postes:               Vec<PositionLinkView>,
  pub domaines_expertise:   Vec<ExpertiseView>,
  pub diplomes:             Vec<DiplomaView>,
  pub mots:                 Vec<NoteView>,
  pub publications:         Vec<PublicationBriefView>,
  pub recherches_actuelles: Vec<CurrentProjectView>,
}

impl ResearcherDetailView {
  pub fn new(d: &ResearcherDetail, links: &Links<'_>) -> Self {
    let r = &d.researcher;
    Self {
      id:                   r.id,
      nom:                  r.family_name.clone(),
      prenom:               r.given_name.clone(),
      nom_complet:          r.full_name(),
      biographie:           r.biography.clone(),
      photo_url:            links.file(r.photo.as_deref()),
      statut:               r.status,
      statut_display:       r.status.label(),
      date_embauche:        r.hired_on,
      bureau:               r.office.clone(),
      reseaux:              d.links.iter().map(Into::into).collect(),
      postes:               d.positions.iter().map(Into::into).collect(),
      domaines_expertise:   d.expertise.iter().map(|e| ExpertiseView::new(e, links)).collect(),
      diplomes:             d.diplomas.iter().map(Into::into).collect(),
      mots:                 d.notes.iter().map(Into::into).collect(),
      publications:         d.publications.iter().map(Into::into).collect(),
      recherches_actuelles: d.current_projects.iter().map(Into::into).collect(),
    }
  }
}
