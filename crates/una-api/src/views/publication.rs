//! Publication views.

use chrono::NaiveDate;
use serde::Serialize;
use una_core::{
  project::TeamRole,
  publication::{
    Citation, Contributor, Keyword, PublicationBrief, PublicationDetail, PublicationSummary,
  },
};

use super::Links;

/// Compact entry embedded in researcher and project pages.
#[derive(Debug, Serialize)]
pub struct PublicationBriefView {
  pub id:               i64,
  pub titre:            String,
  pub resume:           Option<String>,
  pub doi:              Option<String>,
  pub facteur_impact:   Option<f64>,
  pub date_publication: Option<NaiveDate>,
  pub url_publication:  Option<String>,
  pub recherche_titre:  String,
}

impl From<&PublicationBrief> for PublicationBriefView {
  fn from(p: &PublicationBrief) -> Self {
    Self {
      id:               p.id,
      titre:            p.title.clone(),
      resume:           p.summary.clone(),
      doi:              p.doi.clone(),
      facteur_impact:   p.impact_factor,
      date_publication: p.published_on,
      url_publication:  p.url.clone(),
      recherche_titre:  p.project_title.clone(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ContributorView {
  pub nom_complet: String,
  pub role:        TeamRole,
}

impl From<&Contributor> for ContributorView {
  fn from(c: &Contributor) -> Self {
    Self { nom_complet: c.full_name.clone(), role: c.role }
  }
}

#[derive(Debug, Serialize)]
pub struct PublicationListView {
  pub id:               i64,
  pub titre:            String,
  pub resume:           Option<String>,
  pub doi:              Option<String>,
  pub facteur_impact:   Option<f64>,
  pub date_publication: Option<NaiveDate>,
  pub url_publication:  Option<String>,
  pub fichier_url:      Option<String>,
  pub recherche_titre:  String,
  pub citations_count:  i64,
  pub chercheurs:       Vec<ContributorView>,
}

impl PublicationListView {
  pub fn new(s: &PublicationSummary, links: &Links<'_>) -> Self {
    let p = &s.publication;
    Self {
      id:               p.id,
      titre:            p.title.clone(),
      resume:           p.summary.clone(),
      doi:              p.doi.clone(),
      facteur_impact:   p.impact_factor,
      date_publication: p.published_on,
      url_publication:  p.url.clone(),
      fichier_url:      links.file(p.file.as_deref()),
      recherche_titre:  s.project_title.clone(),
      citations_count:  s.citation_count,
      chercheurs:       s.contributors.iter().map(Into::into).collect(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct KeywordView {
  pub id:      i64,
  pub mot_cle: String,
}

impl From<&Keyword> for KeywordView {
  fn from(k: &Keyword) -> Self {
    Self { id: k.id, mot_cle: k.keyword.clone() }
  }
}

#[derive(Debug, Serialize)]
pub struct CitationView {
  pub id:       i64,
  pub citation: String,
}

impl From<&Citation> for CitationView {
  fn from(c: &Citation) -> Self {
    Self { id: c.id, citation: c.citation.clone() }
  }
}

#[derive(Debug, Serialize)]
pub struct PublicationDetailView {
  pub id:               i64,
  pub titre:            String,
  pub resume:           Option<String>,
  pub contenu:          String,
  pub doi:              Option<String>,
  pub facteur_impact:   Option<f64>,
  pub date_publication: Option<NaiveDate>,
  pub url_publication:  Option<String>,
  pub fichier_url:      Option<String>,
  pub recherche_titre:  String,
  pub mots_cles:        Vec<KeywordView>,
  pub citations:        Vec<CitationView>,
}

impl PublicationDetailView {
  pub fn new(d: &PublicationDetail, links: &Links<'_>) -> Self {
    let p = &d.publication;
    Self {
      id:               p.id,
      titre:            p.title.clone(),
      resume:           p.summary.clone(),
      contenu:          p.content.clone(),
      doi:              p.doi.clone(),
      facteur_impact:   p.impact_factor,
      date_publication: p.published_on,
      url_publication:  p.url.clone(),
      fichier_url:      links.file(p.file.as_deref()),
      recherche_titre:  d.project_title.clone(),
      mots_cles:        d.keywords.iter().map(Into::into).collect(),
      citations:        d.citations.iter().map(Into::into).collect(),
    }
  }
}
