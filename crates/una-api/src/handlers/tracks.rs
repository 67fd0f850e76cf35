//! Handlers for `/parcours/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/parcours/` | Optional `?laboratoire_id=&laboratoire_nom=&search=`; scoped |
//! | `GET`  | `/parcours/{id}/` | 404 if unknown or inactive |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use una_core::{
  query::{RawParams, TrackFilter},
  store::PortalStore,
};

use crate::{
  ApiState,
  error::ApiError,
  views::{
    Links, RequestOrigin,
    track::{TrackDetailView, TrackListView},
  },
};

/// `GET /parcours/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<RawParams>,
) -> Result<Json<Vec<TrackListView>>, ApiError>
where
  S: PortalStore,
{
  let filter = TrackFilter::from_params(&params, &state.scope);
  tracing::debug!(?filter, "listing tracks");
  let tracks = state.store.list_tracks(&filter).await.map_err(ApiError::store)?;
  Ok(Json(tracks.iter().map(Into::into).collect()))
}

/// `GET /parcours/{id}/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Path(id): Path<i64>,
) -> Result<Json<TrackDetailView>, ApiError>
where
  S: PortalStore,
{
  let detail = state
    .store
    .get_track(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Parcours", id))?;

  let links = Links::new(origin, &state.media);
  Ok(Json(TrackDetailView::new(&detail, &links)))
}
