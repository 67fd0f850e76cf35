//! Handlers for `/contacts/` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/contacts/` | Optional `?laboratoire_id=&type_contact=&est_actif=`; scoped |
//! | `POST`  | `/contacts/` | Body: French field names, see [`NewContactBody`] |
//! | `GET`   | `/contacts/{id}/` | Includes opening hours |
//! | `PATCH` | `/contacts/{id}/` | Absent fields are left untouched |
//! | `GET`   | `/contacts/{id}/horaires/` | The contact's opening hours |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use una_core::{
  contact::{ContactPatch, ContactType, NewContact},
  query::{ContactFilter, HoursFilter, RawParams},
  store::PortalStore,
  validation::FieldErrors,
};

use crate::{
  ApiState,
  error::ApiError,
  forms::{check_email, optional_text, required, required_text, unknown_object},
  views::contact::{ContactDetailView, ContactListView, HoursView},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /contacts/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<RawParams>,
) -> Result<Json<Vec<ContactListView>>, ApiError>
where
  S: PortalStore,
{
  let filter = ContactFilter::from_params(&params, &state.scope);
  let contacts = state.store.list_contacts(&filter).await.map_err(ApiError::store)?;
  Ok(Json(contacts.iter().map(Into::into).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /contacts/`.
///
/// `reference_secret_email` names the secret holding the mailbox password;
/// it is accepted on input and never returned.
#[derive(Debug, Deserialize)]
pub struct NewContactBody {
  pub id_laboratoire:         Option<i64>,
  pub type_contact:           Option<ContactType>,
  pub adresse_complete:       Option<String>,
  pub ville:                  Option<String>,
  pub code_postal:            Option<String>,
  pub pays:                   Option<String>,
  pub telephone_principal:    Option<String>,
  pub email_principal:        Option<String>,
  pub reference_secret_email: Option<String>,
  pub site_web:               Option<String>,
  pub est_actif:              Option<bool>,
}

impl NewContactBody {
  fn validate(self, laboratory_exists: bool) -> Result<NewContact, FieldErrors> {
    let mut errors = FieldErrors::new();
    let laboratory_id = required(&mut errors, "id_laboratoire", self.id_laboratoire);
    if let Some(id) = laboratory_id
      && !laboratory_exists
    {
      errors.add("id_laboratoire", unknown_object(id));
    }
    let address = required_text(&mut errors, "adresse_complete", self.adresse_complete);
    let city = required_text(&mut errors, "ville", self.ville);
    let country = required_text(&mut errors, "pays", self.pays);
    let email = optional_text(self.email_principal);
    check_email(&mut errors, "email_principal", email.as_deref());
    let Some(laboratory_id) = laboratory_id.filter(|_| errors.is_empty()) else {
      return Err(errors);
    };

    Ok(NewContact {
      laboratory_id,
      kind: self.type_contact.unwrap_or(ContactType::Principal),
      address,
      city,
      postal_code: optional_text(self.code_postal),
      country,
      phone: optional_text(self.telephone_principal),
      email,
      mail_secret_ref: optional_text(self.reference_secret_email),
      website: optional_text(self.site_web),
      active: self.est_actif.unwrap_or(true),
    })
  }
}

/// `POST /contacts/`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewContactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let laboratory_exists = match body.id_laboratoire {
    Some(id) => state.store.find_laboratory(id).await.map_err(ApiError::store)?.is_some(),
    None => false,
  };
  let input = body.validate(laboratory_exists)?;
  let contact = state.store.create_contact(input).await.map_err(ApiError::save)?;
  tracing::info!(contact_id = contact.contact.id, "contact created");
  Ok((StatusCode::CREATED, Json(ContactDetailView::from(&contact))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/{id}/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ContactDetailView>, ApiError>
where
  S: PortalStore,
{
  let contact = state
    .store
    .get_contact(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Contact", id))?;
  Ok(Json(ContactDetailView::from(&contact)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /contacts/{id}/`.
#[derive(Debug, Default, Deserialize)]
pub struct ContactPatchBody {
  pub type_contact:           Option<ContactType>,
  pub adresse_complete:       Option<String>,
  pub ville:                  Option<String>,
  pub code_postal:            Option<String>,
  pub pays:                   Option<String>,
  pub telephone_principal:    Option<String>,
  pub email_principal:        Option<String>,
  pub reference_secret_email: Option<String>,
  pub site_web:               Option<String>,
  pub est_actif:              Option<bool>,
}

impl ContactPatchBody {
  fn validate(self) -> Result<ContactPatch, FieldErrors> {
    let mut errors = FieldErrors::new();
    for (name, value) in [
      ("adresse_complete", &self.adresse_complete),
      ("ville", &self.ville),
      ("pays", &self.pays),
    ] {
      if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        errors.add(name, "Ce champ ne peut être vide.");
      }
    }
    let email = self.email_principal.map(|e| e.trim().to_owned());
    check_email(&mut errors, "email_principal", email.as_deref().filter(|e| !e.is_empty()));
    errors.into_result()?;

    Ok(ContactPatch {
      kind: self.type_contact,
      address: self.adresse_complete,
      city: self.ville,
      postal_code: self.code_postal,
      country: self.pays,
      phone: self.telephone_principal,
      email,
      mail_secret_ref: self.reference_secret_email,
      website: self.site_web,
      active: self.est_actif,
    })
  }
}

/// `PATCH /contacts/{id}/`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<ContactPatchBody>,
) -> Result<Json<ContactDetailView>, ApiError>
where
  S: PortalStore,
{
  let patch = body.validate()?;
  let contact = state
    .store
    .update_contact(id, patch)
    .await
    .map_err(ApiError::save)?
    .ok_or_else(|| ApiError::not_found("Contact", id))?;
  Ok(Json(ContactDetailView::from(&contact)))
}

// ─── Hours ────────────────────────────────────────────────────────────────────

/// `GET /contacts/{id}/horaires/`
pub async fn hours<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<HoursView>>, ApiError>
where
  S: PortalStore,
{
  state
    .store
    .get_contact(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Contact", id))?;

  let hours = state
    .store
    .list_hours(&HoursFilter::for_contact(id))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(hours.iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn body() -> NewContactBody {
    NewContactBody {
      id_laboratoire:         Some(1),
      type_contact:           None,
      adresse_complete:       Some("Campus UNA".into()),
      ville:                  Some("Abidjan".into()),
      code_postal:            Some("  ".into()),
      pays:                   Some("Côte d'Ivoire".into()),
      telephone_principal:    None,
      email_principal:        Some("labo@una.ci".into()),
      reference_secret_email: Some("labo-principal".into()),
      site_web:               None,
      est_actif:              None,
    }
  }

  #[test]
  fn new_contact_defaults() {
    let contact = body().validate(true).unwrap();
    assert_eq!(contact.kind, ContactType::Principal);
    assert!(contact.active);
    assert_eq!(contact.postal_code, None);
    assert_eq!(contact.mail_secret_ref.as_deref(), Some("labo-principal"));
  }

  #[test]
  fn new_contact_reports_every_problem() {
    let mut b = body();
    b.ville = None;
    b.email_principal = Some("labo@".into());
    let errors = b.validate(false).unwrap_err();
    assert!(errors.contains("ville"));
    assert!(errors.contains("email_principal"));
    assert!(errors.get("id_laboratoire").unwrap()[0].contains("« 1 »"));
  }

  #[test]
  fn patch_rejects_blank_mandatory_fields() {
    let patch = ContactPatchBody { pays: Some(" ".into()), ..Default::default() };
    assert!(patch.validate().unwrap_err().contains("pays"));

    let patch = ContactPatchBody { est_actif: Some(false), ..Default::default() };
    let patch = patch.validate().unwrap();
    assert_eq!(patch.active, Some(false));
    assert!(patch.city.is_none());
  }
}
