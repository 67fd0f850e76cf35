//! Handlers for `/candidatures/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/candidatures/` | Optional `?parcours=<id>&search=<terms>` |
//! | `POST` | `/candidatures/` | Multipart form with `cv_candidat`, `lettre_motivation`, `releves_notes`, optional `diplome_obtenu` |
//! | `GET`  | `/candidatures/{id}/` | 404 if unknown |

use axum::{
  Json,
  extract::{Multipart, Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::json;
use una_core::{
  query::{ApplicationFilter, RawParams},
  store::PortalStore,
};

use crate::{
  ApiState,
  error::ApiError,
  forms::ApplicationForm,
  views::{Links, RequestOrigin, application::ApplicationView},
};

const DUPLICATE: &str = "Une candidature existe deja pour ce parcours avec cette adresse email.";

/// `GET /candidatures/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Query(params): Query<RawParams>,
) -> Result<Json<Vec<ApplicationView>>, ApiError>
where
  S: PortalStore,
{
  let filter = ApplicationFilter::from_params(&params);
  let applications = state.store.list_applications(&filter).await.map_err(ApiError::store)?;

  let links = Links::new(origin, &state.media);
  let today = state.clock.today();
  Ok(Json(applications.iter().map(|a| ApplicationView::new(a, &links, today)).collect()))
}

/// `GET /candidatures/{id}/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Path(id): Path<i64>,
) -> Result<Json<ApplicationView>, ApiError>
where
  S: PortalStore,
{
  let application = state
    .store
    .get_application(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Candidature", id))?;

  let links = Links::new(origin, &state.media);
  Ok(Json(ApplicationView::new(&application, &links, state.clock.today())))
}

/// `POST /candidatures/`: validate, reject duplicates, store the documents,
/// then persist the application. Returns 201 with the stored application.
/// Documents written for a submission that is not persisted are removed.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let form = ApplicationForm::read(&mut multipart).await?;
  if form.is_empty() {
    return Err(ApiError::BadRequest("Aucune donnee recue".into()));
  }

  let track_exists = match form.track_id() {
    Some(id) => state.store.find_track(id).await.map_err(ApiError::store)?.is_some(),
    None => false,
  };
  let today = state.clock.today();
  let draft = form.into_draft(today, track_exists)?;

  let duplicate = state
    .store
    .application_exists(&draft.form.email, draft.form.track_id)
    .await
    .map_err(ApiError::store)?;
  if duplicate {
    tracing::info!(track_id = draft.form.track_id, "duplicate application rejected");
    return Err(ApiError::Conflict(DUPLICATE.into()));
  }

  let mut staged = state.media.stage();
  let stored = match draft.store_documents(&mut staged).await {
    Ok(input) => state.store.create_application(input).await.map_err(ApiError::save),
    Err(e) => Err(ApiError::save(e)),
  };
  let application = match stored {
    Ok(application) => application,
    Err(e) => {
      staged.discard().await;
      return Err(e);
    }
  };
  tracing::info!(
    application_id = application.application.id,
    track_id = application.application.form.track_id,
    "application submitted"
  );

  let links = Links::new(origin, &state.media);
  let body = json!({
    "message": "Candidature soumise avec succes!",
    "candidature": ApplicationView::new(&application, &links, today),
  });
  Ok((StatusCode::CREATED, Json(body)))
}
