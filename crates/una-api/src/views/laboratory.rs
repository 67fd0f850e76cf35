//! Laboratory views.

use chrono::NaiveDate;
use serde::Serialize;
use una_core::{
  laboratory::{
    ActivityStatus, Laboratory, LaboratoryDetail, LaboratoryDomain, Mission, NewsItem,
    PartnerCategory, Partnership, PartnershipStatus, Presentation,
  },
  partner::Partner,
};

use super::{Links, researcher::DomainView};

#[derive(Debug, Serialize)]
pub struct LaboratoryTypeView {
  pub id:        i64,
  pub type_labo: String,
}

#[derive(Debug, Serialize)]
pub struct LaboratoryView {
  pub id:               i64,
  pub nom:              String,
  pub logo_url:         Option<String>,
  pub ufr:              String,
  pub date_de_creation: NaiveDate,
  pub type_laboratoire: LaboratoryTypeView,
}

impl LaboratoryView {
  pub fn new(l: &Laboratory, links: &Links<'_>) -> Self {
    Self {
      id:               l.id,
      nom:              l.name.clone(),
      logo_url:         links.file(l.logo.as_deref()),
      ufr:              l.unit.clone(),
      date_de_creation: l.founded_on,
      type_laboratoire: LaboratoryTypeView { id: l.kind.id, type_labo: l.kind.label.clone() },
    }
  }
}

#[derive(Debug, Serialize)]
pub struct PartnerView {
  pub id:                     i64,
  pub logo_url:               Option<String>,
  pub nom_partenaire:         String,
  pub pays:                   Option<String>,
  pub ville:                  Option<String>,
  pub adresse:                Option<String>,
  pub site_web:               Option<String>,
  pub email:                  Option<String>,
  pub telephone:              Option<String>,
  pub description:            Option<String>,
  pub date_debut_partenariat: Option<NaiveDate>,
  pub date_fin_partenariat:   Option<NaiveDate>,
  pub notes:                  Option<String>,
}

impl PartnerView {
  pub fn new(p: &Partner, links: &Links<'_>) -> Self {
    Self {
      id:                     p.id,
      logo_url:               links.file(p.logo.as_deref()),
      nom_partenaire:         p.name.clone(),
      pays:                   p.country.clone(),
      ville:                  p.city.clone(),
      adresse:                p.address.clone(),
      site_web:               p.website.clone(),
      email:                  p.email.clone(),
      telephone:              p.phone.clone(),
      description:            p.description.clone(),
      date_debut_partenariat: p.starts_on,
      date_fin_partenariat:   p.ends_on,
      notes:                  p.notes.clone(),
    }
  }
}

/// A laboratory's domain link; also how projects attach to laboratories.
#[derive(Debug, Serialize)]
pub struct LaboratoryDomainView {
  pub id:             i64,
  pub id_laboratoire: i64,
  pub domaine:        DomainView,
}

impl LaboratoryDomainView {
  pub fn new(d: &LaboratoryDomain, links: &Links<'_>) -> Self {
    Self {
      id:             d.id,
      id_laboratoire: d.laboratory_id,
      domaine:        DomainView::new(&d.domain, links),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct NewsView {
  pub id:               i64,
  pub titre:            String,
  pub extrait:          String,
  pub phrase_cle:       String,
  pub contenu_complet:  String,
  pub date_publication: NaiveDate,
  pub image_url:        Option<String>,
  pub statu:            ActivityStatus,
}

impl NewsView {
  fn new(n: &NewsItem, links: &Links<'_>) -> Self {
    Self {
      id:               n.id,
      titre:            n.title.clone(),
      extrait:          n.excerpt.clone(),
      phrase_cle:       n.key_phrase.clone(),
      contenu_complet:  n.body.clone(),
      date_publication: n.published_on,
      image_url:        links.file(n.image.as_deref()),
      statu:            n.status,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct PresentationView {
  pub id:          i64,
  pub titre:       String,
  pub description: String,
}

impl From<&Presentation> for PresentationView {
  fn from(p: &Presentation) -> Self {
    Self { id: p.id, titre: p.title.clone(), description: p.description.clone() }
  }
}

#[derive(Debug, Serialize)]
pub struct MissionView {
  pub id:             i64,
  pub description:    String,
  pub annee_creation: NaiveDate,
  pub budget_annuel:  i64,
  pub monnaie:        String,
}

impl From<&Mission> for MissionView {
  fn from(m: &Mission) -> Self {
    Self {
      id:             m.id,
      description:    m.description.clone(),
      annee_creation: m.founded_on,
      budget_annuel:  m.annual_budget,
      monnaie:        m.currency.clone(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct PartnershipView {
  pub id:              i64,
  pub statu:           PartnershipStatus,
  pub type_partenaire: PartnerCategory,
  pub partenaire:      PartnerView,
}

impl PartnershipView {
  fn new(p: &Partnership, links: &Links<'_>) -> Self {
    Self {
      id:              p.id,
      statu:           p.status,
      type_partenaire: p.category,
      partenaire:      PartnerView::new(&p.partner, links),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct LaboratoryDetailView {
  #[serde(flatten)]
  pub laboratoire:   LaboratoryView,
  pub domaines:      Vec<LaboratoryDomainView>,
  pub actualites:    Vec<NewsView>,
  pub presentations: Vec<PresentationView>,
  pub missions:      Vec<MissionView>,
  pub partenariats:  Vec<PartnershipView>,
}

impl LaboratoryDetailView {
  pub fn new(d: &LaboratoryDetail, links: &Links<'_>) -> Self {
    Self {
      laboratoire:   LaboratoryView::new(&d.laboratory, links),
      domaines:      d.domains.iter().map(|x| LaboratoryDomainView::new(x, links)).collect(),
      actualites:    d.news.iter().map(|n| NewsView::new(n, links)).collect(),
      presentations: d.presentations.iter().map(Into::into).collect(),
      missions:      d.missions.iter().map(Into::into).collect(),
      partenariats:  d.partnerships.iter().map(|p| PartnershipView::new(p, links)).collect(),
    }
  }
}
