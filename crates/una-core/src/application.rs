//! Candidate applications to academic tracks.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{metrics, researcher::full_name, validation::FieldErrors};

/// Youngest accepted applicant, compared on calendar years only.
pub const MINIMUM_AGE: i32 = 16;

/// Accepted range of the `/20` average (wider to allow other grading systems).
pub const GRADE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=25.0;

/// File extensions accepted for the mandatory documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

choices! {
  pub enum ApplicationStatus ("application status") {
    Pending     = "En attente"        => "En attente de traitement",
    UnderReview = "En cours d'examen" => "En cours d'examen",
    Accepted    = "Acceptée"          => "Candidature acceptée",
    Rejected    = "Refusée"           => "Candidature refusée",
    Waitlisted  = "Liste d'attente"   => "En liste d'attente",
  }
}

choices! {
  pub enum StudyLevel ("study level") {
    Licence   = "Licence"  => "Licence (Bac+3)",
    Master1   = "Master 1" => "Master 1 (Bac+4)",
    Master2   = "Master 2" => "Master 2 (Bac+5)",
    Doctorate = "Doctorat" => "Doctorat (Bac+8)",
    Other     = "Autre"    => "Autre niveau",
  }
}

/// Media-relative paths of the uploaded documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationDocuments {
  pub cv:                String,
  pub motivation_letter: String,
  pub transcripts:       String,
  pub diploma:           Option<String>,
}

/// A submission as received, before it is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplication {
  pub family_name:     String,
  pub given_name:      String,
  pub birth_date:      NaiveDate,
  pub birth_place:     String,
  pub nationality:     String,
  pub phone:           String,
  pub email:           String,
  pub address:         String,
  pub city:            String,
  pub country:         String,
  pub study_level:     StudyLevel,
  pub institution:     String,
  pub field_of_study:  String,
  pub average_grade:   f64,
  pub graduation_year: i32,
  pub documents:       ApplicationDocuments,
  pub track_id:        i64,
  pub motivation:      Option<String>,
  pub career_plan:     Option<String>,
  pub expectations:    Option<String>,
}

impl NewApplication {
  /// Checks that need nothing but the submission itself and the date.
  pub fn validate(&self, today: NaiveDate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if !GRADE_RANGE.contains(&self.average_grade) {
      errors.add("moyenne_generale", "La moyenne doit être comprise entre 0 et 25.");
    }
    if today.year() - self.birth_date.year() < MINIMUM_AGE {
      errors.add(
        "non_field_errors",
        format!("Le candidat doit être âgé d'au moins {MINIMUM_AGE} ans."),
      );
    }

    errors.into_result()
  }
}

/// Whether `file_name` carries one of [`DOCUMENT_EXTENSIONS`].
pub fn is_accepted_document(file_name: &str) -> bool {
  let lower = file_name.to_lowercase();
  DOCUMENT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
  pub id:              i64,
  #[serde(flatten)]
  pub form:            NewApplication,
  pub status:          ApplicationStatus,
  pub evaluation_note: Option<f64>,
  pub admin_comments:  Option<String>,
  pub submitted_at:    DateTime<Utc>,
  pub modified_at:     DateTime<Utc>,
}

impl Application {
  pub fn full_name(&self) -> String {
    full_name(Some(&self.form.given_name), Some(&self.form.family_name))
  }

  pub fn age(&self, today: NaiveDate) -> i32 {
    metrics::applicant_age(self.form.birth_date, today)
  }
}

/// An application with the names of its track and laboratory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSummary {
  pub application:     Application,
  pub track_name:      String,
  pub laboratory_name: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn form() -> NewApplication {
    NewApplication {
      family_name:     "Koné".into(),
      given_name:      "Ibrahim".into(),
      birth_date:      d(2000, 6, 15),
      birth_place:     "Bouaké".into(),
      nationality:     "Ivoirienne".into(),
      phone:           "+225 01 02 03 04".into(),
      email:           "ibrahim@example.com".into(),
      address:         "Rue 12".into(),
      city:            "Abidjan".into(),
      country:         "Côte d'Ivoire".into(),
      study_level:     StudyLevel::Master1,
      institution:     "UNA".into(),
      field_of_study:  "Agronomie".into(),
      average_grade:   14.5,
      graduation_year: 2023,
      documents:       ApplicationDocuments::default(),
      track_id:        1,
      motivation:      None,
      career_plan:     None,
      expectations:    None,
    }
  }

  #[test]
  fn valid_form_passes() {
    assert!(form().validate(d(2024, 9, 1)).is_ok());
  }

  #[test]
  fn grade_out_of_range_is_reported() {
    let mut f = form();
    f.average_grade = 25.5;
    let errors = f.validate(d(2024, 9, 1)).unwrap_err();
    assert!(errors.contains("moyenne_generale"));
  }

  #[test]
  fn minimum_age_uses_year_difference() {
    let mut f = form();
    // Born late in 2008: under 16 on the calendar, but the year difference
    // is what counts.
    f.birth_date = d(2008, 12, 31);
    assert!(f.validate(d(2024, 1, 1)).is_ok());
    f.birth_date = d(2009, 1, 1);
    assert!(f.validate(d(2024, 12, 31)).is_err());
  }

  #[test]
  fn document_extensions_are_case_insensitive() {
    assert!(is_accepted_document("CV.PDF"));
    assert!(is_accepted_document("lettre.docx"));
    assert!(!is_accepted_document("notes.png"));
    assert!(!is_accepted_document("pdf"));
  }
}
