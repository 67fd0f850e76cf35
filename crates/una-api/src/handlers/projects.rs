//! Handlers for `/recherches/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/recherches/` | Optional `?statut=&laboratoire_id=&search=` |
//! | `GET`  | `/recherches/{id}/` | Team, timeline, objectives, achievements, publications, partners |
//! | `POST` | `/recherches/{id}/marquer_en_cours/` | Clears the actual end date |
//! | `POST` | `/recherches/{id}/marquer_termine/` | Stamps the actual end date with today |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use una_core::{
  project::ProjectStatus,
  query::{ProjectFilter, RawParams},
  store::PortalStore,
  validation::FieldErrors,
};

use crate::{
  ApiState,
  error::ApiError,
  views::{
    Links, RequestOrigin,
    project::{ProjectDetailView, ProjectView},
  },
};

/// `GET /recherches/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<RawParams>,
) -> Result<Json<Vec<ProjectView>>, ApiError>
where
  S: PortalStore,
{
  let filter = ProjectFilter::from_params(&params);
  let projects = state.store.list_projects(&filter).await.map_err(ApiError::store)?;
  let today = state.clock.today();
  Ok(Json(projects.iter().map(|p| ProjectView::new(p, today)).collect()))
}

/// `GET /recherches/{id}/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Path(id): Path<i64>,
) -> Result<Json<ProjectDetailView>, ApiError>
where
  S: PortalStore,
{
  let detail = state
    .store
    .get_project(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Recherche", id))?;

  let links = Links::new(origin, &state.media);
  Ok(Json(ProjectDetailView::new(&detail, &links, state.clock.today())))
}

/// `POST /recherches/{id}/marquer_en_cours/`
pub async fn mark_ongoing<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ProjectView>, ApiError>
where
  S: PortalStore,
{
  let project = state
    .store
    .set_project_status(id, ProjectStatus::Ongoing, None)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Recherche", id))?;
  Ok(Json(ProjectView::new(&project, state.clock.today())))
}

/// `POST /recherches/{id}/marquer_termine/`
///
/// Rejected with a validation error when today precedes the start date.
pub async fn mark_completed<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ProjectView>, ApiError>
where
  S: PortalStore,
{
  let today = state.clock.today();
  let current = state
    .store
    .get_project(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Recherche", id))?;
  if today < current.project.starts_on {
    let mut errors = FieldErrors::new();
    errors.add(
      "date_fin_reelle",
      "La date de fin réelle ne peut pas précéder la date de début.",
    );
    return Err(errors.into());
  }

  let project = state
    .store
    .set_project_status(id, ProjectStatus::Completed, Some(today))
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Recherche", id))?;
  Ok(Json(ProjectView::new(&project, today)))
}
