//! Candidate application view.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use una_core::application::{ApplicationStatus, ApplicationSummary, StudyLevel};

use super::Links;

#[derive(Debug, Serialize)]
pub struct ApplicationView {
  pub id:                      i64,
  pub nom_candidat:            String,
  pub prenom_candidat:         String,
  pub nom_complet:             String,
  pub age:                     i32,
  pub date_naissance:          NaiveDate,
  pub lieu_naissance:          String,
  pub nationalite:             String,
  pub telephone_candidat:      String,
  pub email_candidat:          String,
  pub adresse_complete:        String,
  pub ville_residence:         String,
  pub pays_residence:          String,
  pub niveau_etude_actuel:     StudyLevel,
  pub etablissement_origine:   String,
  pub filiere_etude:           String,
  pub moyenne_generale:        f64,
  pub annee_obtention_diplome: i32,
  pub cv_candidat:             Option<String>,
  pub lettre_motivation:       Option<String>,
  pub releves_notes:           Option<String>,
  pub diplome_obtenu:          Option<String>,
  pub id_parcours:             i64,
  pub parcours_nom:            String,
  pub laboratoire_nom:         String,
  pub statut_candidature:      ApplicationStatus,
  pub date_soumission:         DateTime<Utc>,
  pub note_evaluation:         Option<f64>,
}

impl ApplicationView {
  pub fn new(s: &ApplicationSummary, links: &Links<'_>, today: NaiveDate) -> Self {
    let a = &s.application;
    let f = &a.form;
    let docs = &f.documents;
    Self {
      id:                      a.id,
      nom_candidat:            f.family_name.clone(),
      prenom_candidat:         f.given_name.clone(),
      nom_complet:             a.full_name(),
      age:                     a.age(today),
      date_naissance:          f.birth_date,
      lieu_naissance:          f.birth_place.clone(),
      nationalite:             f.nationality.clone(),
      telephone_candidat:      f.phone.clone(),
      email_candidat:          f.email.clone(),
      adresse_complete:        f.address.clone(),
      ville_residence:         f.city.clone(),
      pays_residence:          f.country.clone(),
      niveau_etude_actuel:     f.study_level,
      etablissement_origine:   f.institution.clone(),
      filiere_etude:           f.field_of_study.clone(),
      moyenne_generale:        f.average_grade,
      annee_obtention_diplome: f.graduation_year,
      cv_candidat:             links.file(Some(&docs.cv)),
      lettre_motivation:       links.file(Some(&docs.motivation_letter)),
      releves_notes:           links.file(Some(&docs.transcripts)),
      diplome_obtenu:          links.file(docs.diploma.as_deref()),
      id_parcours:             f.track_id,
      parcours_nom:            s.track_name.clone(),
      laboratoire_nom:         s.laboratory_name.clone(),
      statut_candidature:      a.status,
      date_soumission:         a.submitted_at,
      note_evaluation:         a.evaluation_note,
    }
  }
}
