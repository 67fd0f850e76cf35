//! Academic track views.

use chrono::NaiveDate;
use serde::Serialize;
use una_core::{
  laboratory::ActivityStatus,
  track::{AdmissionCondition, Outcome, Specialization, Track, TrackDetail, TrackSummary},
};

use super::{Links, laboratory::LaboratoryView};

#[derive(Debug, Serialize)]
pub struct TrackListView {
  pub id:                  i64,
  pub nom_parour:          String,
  pub date_creation:       Option<NaiveDate>,
  pub description:         Option<String>,
  pub duree_formation:     Option<i64>,
  pub nombre_etudiant_max: Option<i64>,
  pub statu:               ActivityStatus,
  pub laboratoire_nom:     String,
  pub laboratoire_ufr:     String,
}

impl From<&TrackSummary> for TrackListView {
  fn from(s: &TrackSummary) -> Self {
    let t: &Track = &s.track;
    Self {
      id:                  t.id,
      nom_parour:          t.name.clone(),
      date_creation:       t.created_on,
      description:         t.description.clone(),
      duree_formation:     t.duration_days,
      nombre_etudiant_max: t.max_students,
      statu:               t.status,
      laboratoire_nom:     s.laboratory_name.clone(),
      laboratoire_ufr:     s.laboratory_unit.clone(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ConditionView {
  pub id:     i64,
  pub titre:  String,
  pub valeur: Option<String>,
}

impl From<&AdmissionCondition> for ConditionView {
  fn from(c: &AdmissionCondition) -> Self {
    Self { id: c.id, titre: c.title.clone(), valeur: c.value.clone() }
  }
}

#[derive(Debug, Serialize)]
pub struct OutcomeView {
  pub id:        i64,
  pub deboucher: String,
}

impl From<&Outcome> for OutcomeView {
  fn from(o: &Outcome) -> Self {
    Self { id: o.id, deboucher: o.outcome.clone() }
  }
}

#[derive(Debug, Serialize)]
pub struct SpecializationView {
  pub id:             i64,
  pub specialisation: String,
}

impl From<&Specialization> for SpecializationView {
  fn from(s: &Specialization) -> Self {
    Self { id: s.id, specialisation: s.specialization.clone() }
  }
}

#[derive(Debug, Serialize)]
pub struct TrackDetailView {
  pub id:                   i64,
  pub nom_parour:           String,
  pub date_creation:        Option<NaiveDate>,
  pub description:          Option<String>,
  pub duree_formation:      Option<i64>,
  pub nombre_etudiant_max:  Option<i64>,
  pub statu:                ActivityStatus,
  pub laboratoire:          LaboratoryView,
  pub conditions_admission: Vec<ConditionView>,
  pub debouches:            Vec<OutcomeView>,
  pub specialisations:      Vec<SpecializationView>,
}

impl TrackDetailView {
  pub fn new(d: &TrackDetail, links: &Links<'_>) -> Self {
    let t = &d.track;
    Self {
      id:                   t.id,
      nom_parour:           t.name.clone(),
      date_creation:        t.created_on,
      description:          t.description.clone(),
      duree_formation:      t.duration_days,
      nombre_etudiant_max:  t.max_students,
      statu:                t.status,
      laboratoire:          LaboratoryView::new(&d.laboratory, links),
      conditions_admission: d.conditions.iter().map(Into::into).collect(),
      debouches:            d.outcomes.iter().map(Into::into).collect(),
      specialisations:      d.specializations.iter().map(Into::into).collect(),
    }
  }
}
