//! Handlers for `/horaires/` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/horaires/` | Optional `?contact_id=&jour=&ouvert_seulement=&laboratoire_id=`; scoped |
//! | `POST`  | `/horaires/` | Body: `contact_laboratoire`, `jour_semaine` (1–7), times `HH:MM:SS` |
//! | `GET`   | `/horaires/{id}/` | |
//! | `PATCH` | `/horaires/{id}/` | Absent fields are left untouched |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveTime;
use serde::Deserialize;
use una_core::{
  contact::{HoursPatch, NewHours, Weekday},
  query::{HoursFilter, RawParams},
  store::PortalStore,
  validation::FieldErrors,
};

use crate::{
  ApiState,
  error::ApiError,
  forms::{optional_text, required, unknown_object},
  views::contact::HoursView,
};

/// `GET /horaires/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<RawParams>,
) -> Result<Json<Vec<HoursView>>, ApiError>
where
  S: PortalStore,
{
  let filter = HoursFilter::from_params(&params, &state.scope);
  let hours = state.store.list_hours(&filter).await.map_err(ApiError::store)?;
  Ok(Json(hours.iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct NewHoursBody {
  pub contact_laboratoire: Option<i64>,
  pub jour_semaine:        Option<Weekday>,
  pub heure_ouverture:     Option<NaiveTime>,
  pub heure_fermeture:     Option<NaiveTime>,
  pub est_ferme:           Option<bool>,
  pub notes:               Option<String>,
}

impl NewHoursBody {
  fn validate(self, contact_exists: bool) -> Result<NewHours, FieldErrors> {
    let mut errors = FieldErrors::new();
    let contact_id = required(&mut errors, "contact_laboratoire", self.contact_laboratoire);
    if let Some(id) = contact_id
      && !contact_exists
    {
      errors.add("contact_laboratoire", unknown_object(id));
    }
    let weekday = required(&mut errors, "jour_semaine", self.jour_semaine);

    let (Some(contact_id), Some(weekday)) = (contact_id, weekday) else {
      return Err(errors);
    };
    errors.into_result()?;

    Ok(NewHours {
      contact_id,
      weekday,
      opens_at: self.heure_ouverture,
      closes_at: self.heure_fermeture,
      closed: self.est_ferme.unwrap_or(false),
      notes: optional_text(self.notes),
    })
  }
}

/// `POST /horaires/`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewHoursBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let contact_exists = match body.contact_laboratoire {
    Some(id) => state.store.get_contact(id).await.map_err(ApiError::store)?.is_some(),
    None => false,
  };
  let input = body.validate(contact_exists)?;
  let entry = state.store.create_hours(input).await.map_err(ApiError::save)?;
  Ok((StatusCode::CREATED, Json(HoursView::from(&entry))))
}

/// `GET /horaires/{id}/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<HoursView>, ApiError>
where
  S: PortalStore,
{
  let entry = state
    .store
    .get_hours(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Horaire", id))?;
  Ok(Json(HoursView::from(&entry)))
}

#[derive(Debug, Default, Deserialize)]
pub struct HoursPatchBody {
  pub jour_semaine:    Option<Weekday>,
  pub heure_ouverture: Option<NaiveTime>,
  pub heure_fermeture: Option<NaiveTime>,
  pub est_ferme:       Option<bool>,
  pub notes:           Option<String>,
}

impl From<HoursPatchBody> for HoursPatch {
  fn from(b: HoursPatchBody) -> Self {
    HoursPatch {
      weekday:   b.jour_semaine,
      opens_at:  b.heure_ouverture,
      closes_at: b.heure_fermeture,
      closed:    b.est_ferme,
      notes:     b.notes,
    }
  }
}

/// `PATCH /horaires/{id}/`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<HoursPatchBody>,
) -> Result<Json<HoursView>, ApiError>
where
  S: PortalStore,
{
  let entry = state
    .store
    .update_hours(id, HoursPatch::from(body))
    .await
    .map_err(ApiError::save)?
    .ok_or_else(|| ApiError::not_found("Horaire", id))?;
  Ok(Json(HoursView::from(&entry)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn weekday_and_contact_are_required() {
    let body: NewHoursBody = serde_json::from_str(r#"{"notes": "Fermé l'après-midi"}"#).unwrap();
    let errors = body.validate(false).unwrap_err();
    assert!(errors.contains("contact_laboratoire"));
    assert!(errors.contains("jour_semaine"));
  }

  #[test]
  fn body_parses_wire_values() {
    let body: NewHoursBody = serde_json::from_str(
      r#"{"contact_laboratoire": 3, "jour_semaine": 6, "heure_ouverture": "08:00:00", "est_ferme": false}"#,
    )
    .unwrap();
    let hours = body.validate(true).unwrap();
    assert_eq!(hours.weekday, Weekday::Saturday);
    assert_eq!(hours.opens_at, NaiveTime::from_hms_opt(8, 0, 0));
    assert!(hours.closes_at.is_none());
  }

  #[test]
  fn unknown_contact_is_reported() {
    let body: NewHoursBody =
      serde_json::from_str(r#"{"contact_laboratoire": 42, "jour_semaine": 1}"#).unwrap();
    let errors = body.validate(false).unwrap_err();
    assert!(errors.get("contact_laboratoire").unwrap()[0].contains("« 42 »"));
  }
}
