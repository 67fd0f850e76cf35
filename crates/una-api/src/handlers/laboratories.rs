//! Handlers for `/laboratoires/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/laboratoires/` | Optional `?search=<terms>` |
//! | `GET`  | `/laboratoires/{id}/` | Domains, news, presentations, missions, partnerships |
//! | `GET`  | `/laboratoires/{id}/parcours/` | The laboratory's active tracks |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use una_core::{
  query::{LaboratoryFilter, RawParams, TrackFilter},
  store::PortalStore,
};

use crate::{
  ApiState,
  error::ApiError,
  views::{
    Links, RequestOrigin,
    laboratory::{LaboratoryDetailView, LaboratoryView},
    track::TrackListView,
  },
};

/// `GET /laboratoires/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Query(params): Query<RawParams>,
) -> Result<Json<Vec<LaboratoryView>>, ApiError>
where
  S: PortalStore,
{
  let filter = LaboratoryFilter::from_params(&params);
  let laboratories = state.store.list_laboratories(&filter).await.map_err(ApiError::store)?;

  let links = Links::new(origin, &state.media);
  Ok(Json(laboratories.iter().map(|l| LaboratoryView::new(l, &links)).collect()))
}

/// `GET /laboratoires/{id}/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Path(id): Path<i64>,
) -> Result<Json<LaboratoryDetailView>, ApiError>
where
  S: PortalStore,
{
  let detail = state
    .store
    .get_laboratory(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Laboratoire", id))?;

  let links = Links::new(origin, &state.media);
  Ok(Json(LaboratoryDetailView::new(&detail, &links)))
}

/// `GET /laboratoires/{id}/parcours/`
pub async fn tracks<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<TrackListView>>, ApiError>
where
  S: PortalStore,
{
  state
    .store
    .find_laboratory(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Laboratoire", id))?;

  let tracks = state
    .store
    .list_tracks(&TrackFilter::for_laboratory(id))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(tracks.iter().map(Into::into).collect()))
}
