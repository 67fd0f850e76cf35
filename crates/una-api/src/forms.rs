//! Parsing and validation of the multipart application form.

use std::{collections::HashMap, str::FromStr, sync::LazyLock};

use axum::extract::Multipart;
use bytes::Bytes;
use chrono::NaiveDate;
use regex::Regex;
use una_core::{
  application::{ApplicationDocuments, NewApplication, StudyLevel, is_accepted_document},
  validation::FieldErrors,
};

use crate::{
  error::ApiError,
  media::{MediaCategory, Staged},
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static pattern")
});

pub const INVALID_EMAIL: &str =
  "Format d'email invalide. Utilisez le format: exemple@domaine.com";

pub fn is_valid_email(email: &str) -> bool {
  EMAIL.is_match(email)
}

/// Message for a reference to a row that does not exist.
pub fn unknown_object(id: i64) -> String {
  format!("Clé primaire « {id} » non valide - l'objet n'existe pas.")
}

// ─── JSON bodies ─────────────────────────────────────────────────────────────

/// A mandatory text value from a JSON body, trimmed; empty when missing
/// (and recorded as an error).
pub fn required_text(errors: &mut FieldErrors, name: &str, value: Option<String>) -> String {
  match value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
    Some(v) => v,
    None => {
      errors.required(name);
      String::new()
    }
  }
}

/// An optional text value from a JSON body, trimmed; blank reads as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// A mandatory value of any type from a JSON body.
pub fn required<T>(errors: &mut FieldErrors, name: &str, value: Option<T>) -> Option<T> {
  if value.is_none() {
    errors.required(name);
  }
  value
}

/// Record [`INVALID_EMAIL`] when `value` is present and malformed.
pub fn check_email(errors: &mut FieldErrors, name: &str, value: Option<&str>) {
  if value.is_some_and(|v| !is_valid_email(v)) {
    errors.add(name, INVALID_EMAIL);
  }
}

/// An uploaded file as received.
#[derive(Debug, Clone)]
pub struct Upload {
  pub file_name: String,
  pub bytes:     Bytes,
}

/// Text fields and files of a multipart submission.
#[derive(Debug, Default)]
pub struct ApplicationForm {
  fields: HashMap<String, String>,
  files:  HashMap<String, Upload>,
}

/// A validated submission whose documents are not stored yet.
#[derive(Debug)]
pub struct ApplicationDraft {
  pub form:        NewApplication,
  pub cv:          Upload,
  pub letter:      Upload,
  pub transcripts: Upload,
  pub diploma:     Option<Upload>,
}

impl ApplicationForm {
  pub async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
    let mut form = Self::default();
    while let Some(field) = multipart
      .next_field()
      .await
      .map_err(|e| ApiError::BadRequest(format!("Erreur multipart: {e}")))?
    {
      let Some(name) = field.name().map(str::to_owned) else { continue };
      match field.file_name().map(str::to_owned) {
        Some(file_name) => {
          let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Erreur de lecture: {e}")))?;
          form.files.insert(name, Upload { file_name, bytes });
        }
        None => {
          let text = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Erreur de lecture: {e}")))?;
          form.fields.insert(name, text);
        }
      }
    }
    Ok(form)
  }

  #[cfg(test)]
  pub fn from_parts(fields: &[(&str, &str)], files: &[(&str, &str)]) -> Self {
    Self {
      fields: fields.iter().map(|(k, v)| ((*k).into(), (*v).into())).collect(),
      files:  files
        .iter()
        .map(|(k, name)| {
          let upload = Upload { file_name: (*name).into(), bytes: Bytes::from_static(b"%PDF") };
          ((*k).into(), upload)
        })
        .collect(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty() && self.files.is_empty()
  }

  /// The requested track, if the field parses.
  pub fn track_id(&self) -> Option<i64> {
    self.fields.get("id_parcours").and_then(|v| v.trim().parse().ok())
  }

  /// Check every field and build the submission.
  ///
  /// `track_exists` reports whether [`track_id`](Self::track_id) names a
  /// stored track.
  pub fn into_draft(
    mut self,
    today: NaiveDate,
    track_exists: bool,
  ) -> Result<ApplicationDraft, FieldErrors> {
    let mut r = Reader { fields: &self.fields, errors: FieldErrors::new() };

    let family_name = r.text("nom_candidat");
    let given_name = r.text("prenom_candidat");
    let birth_date = r.parse("date_naissance", parse_date, BAD_DATE);
    let birth_place = r.text("lieu_naissance");
    let nationality = r.text("nationalite");
    let phone = r.text("telephone_candidat");
    let email = r.text("email_candidat");
    if !email.is_empty() && !is_valid_email(&email) {
      r.errors.add("email_candidat", INVALID_EMAIL);
    }
    let address = r.text("adresse_complete");
    let city = r.text("ville_residence");
    let country = r.text("pays_residence");
    let study_level = r.choice::<StudyLevel>("niveau_etude_actuel");
    let institution = r.text("etablissement_origine");
    let field_of_study = r.text("filiere_etude");
    let average_grade = r.parse("moyenne_generale", parse_number, BAD_NUMBER);
    let graduation_year = r.parse("annee_obtention_diplome", parse_year, BAD_INTEGER);
    let track_id = r.parse("id_parcours", |v| v.trim().parse::<i64>().ok(), BAD_PK);
    if let Some(id) = track_id
      && !track_exists
    {
      r.errors.add("id_parcours", unknown_object(id));
    }
    let motivation = r.optional("motivation_principale");
    let career_plan = r.optional("projet_professionnel");
    let expectations = r.optional("attentes_formation");
    let mut errors = r.errors;

    let cv = document(&mut self.files, &mut errors, "cv_candidat", "Le CV doit être");
    let letter = document(
      &mut self.files,
      &mut errors,
      "lettre_motivation",
      "La lettre de motivation doit être",
    );
    let transcripts = document(
      &mut self.files,
      &mut errors,
      "releves_notes",
      "Les relevés de notes doivent être",
    );
    let diploma = self.files.remove("diplome_obtenu");

    let (
      Some(birth_date),
      Some(study_level),
      Some(average_grade),
      Some(graduation_year),
      Some(track_id),
      Some(cv),
      Some(letter),
      Some(transcripts),
    ) = (
      birth_date,
      study_level,
      average_grade,
      graduation_year,
      track_id,
      cv,
      letter,
      transcripts,
    )
    else {
      return Err(errors);
    };

    let form = NewApplication {
      family_name,
      given_name,
      birth_date,
      birth_place,
      nationality,
      phone,
      email,
      address,
      city,
      country,
      study_level,
      institution,
      field_of_study,
      average_grade,
      graduation_year,
      documents: ApplicationDocuments::default(),
      track_id,
      motivation,
      career_plan,
      expectations,
    };
    if let Err(e) = form.validate(today) {
      errors.extend(e);
    }
    errors.into_result()?;

    Ok(ApplicationDraft { form, cv, letter, transcripts, diploma })
  }
}

impl ApplicationDraft {
  /// Store the documents and return the submission pointing at them.
  pub async fn store_documents(self, staged: &mut Staged<'_>) -> std::io::Result<NewApplication> {
    use MediaCategory::*;

    let cv = staged.save(ApplicationCv, &self.cv.file_name, &self.cv.bytes).await?;
    let motivation_letter =
      staged.save(ApplicationLetter, &self.letter.file_name, &self.letter.bytes).await?;
    let transcripts = staged
      .save(ApplicationTranscripts, &self.transcripts.file_name, &self.transcripts.bytes)
      .await?;
    let diploma = match &self.diploma {
      Some(upload) => Some(staged.save(ApplicationDiploma, &upload.file_name, &upload.bytes).await?),
      None => None,
    };

    let mut form = self.form;
    form.documents = ApplicationDocuments { cv, motivation_letter, transcripts, diploma };
    Ok(form)
  }
}

// ─── Field reading ───────────────────────────────────────────────────────────

const BAD_DATE: &str =
  "La date n'a pas le bon format. Utilisez un des formats suivants : YYYY-MM-DD.";
const BAD_NUMBER: &str = "Un nombre valide est requis.";
const BAD_INTEGER: &str = "Un nombre entier valide est requis.";
const BAD_PK: &str = "Type incorrect. Attendait une clé primaire.";

struct Reader<'a> {
  fields: &'a HashMap<String, String>,
  errors: FieldErrors,
}

impl Reader<'_> {
  fn raw(&self, name: &str) -> Option<&str> {
    self.fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
  }

  /// A mandatory text field; empty when missing (and recorded as an error).
  fn text(&mut self, name: &str) -> String {
    match self.raw(name) {
      Some(v) => v.to_owned(),
      None => {
        self.errors.required(name);
        String::new()
      }
    }
  }

  fn optional(&self, name: &str) -> Option<String> {
    self.raw(name).map(str::to_owned)
  }

  fn parse<T>(
    &mut self,
    name: &str,
    parse: impl FnOnce(&str) -> Option<T>,
    invalid: &str,
  ) -> Option<T> {
    let Some(raw) = self.raw(name) else {
      self.errors.required(name);
      return None;
    };
    let parsed = parse(raw);
    if parsed.is_none() {
      self.errors.add(name, invalid);
    }
    parsed
  }

  fn choice<C>(&mut self, name: &str) -> Option<C>
  where
    C: FromStr,
  {
    let Some(raw) = self.raw(name) else {
      self.errors.required(name);
      return None;
    };
    let parsed = raw.parse().ok();
    if parsed.is_none() {
      self.errors.add(name, format!("« {raw} » n'est pas un choix valide."));
    }
    parsed
  }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn parse_number(raw: &str) -> Option<f64> {
  raw.replace(',', ".").parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_year(raw: &str) -> Option<i32> {
  raw.parse::<u32>().ok().and_then(|y| i32::try_from(y).ok())
}

/// A mandatory document with an accepted extension.
fn document(
  files: &mut HashMap<String, Upload>,
  errors: &mut FieldErrors,
  name: &str,
  subject: &str,
) -> Option<Upload> {
  let Some(upload) = files.remove(name) else {
    errors.add(name, "Aucun fichier n'a été soumis.");
    return None;
  };
  if !is_accepted_document(&upload.file_name) {
    errors.add(name, format!("{subject} au format PDF, DOC ou DOCX."));
    return None;
  }
  Some(upload)
}
