//! Handlers for `/chercheurs/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/chercheurs/` | Optional `?laboratoire_id=<id>&search=<terms>` |
//! | `GET`  | `/chercheurs/{id}/` | 404 if unknown or inactive |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use una_core::{
  query::{RawParams, ResearcherFilter},
  store::PortalStore,
};

use crate::{
  ApiState,
  error::ApiError,
  views::{
    Links, RequestOrigin,
    researcher::{ResearcherDetailView, ResearcherListView},
  },
};

/// `GET /chercheurs/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Query(params): Query<RawParams>,
) -> Result<Json<Vec<ResearcherListView>>, ApiError>
where
  S: PortalStore,
{
  let filter = ResearcherFilter::from_params(&params);
  tracing::debug!(?filter, "listing researchers");
  let researchers = state.store.list_researchers(&filter).await.map_err(ApiError::store)?;

  let links = Links::new(origin, &state.media);
  Ok(Json(researchers.iter().map(|r| ResearcherListView::new(r, &links)).collect()))
}

/// `GET /chercheurs/{id}/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Path(id): Path<i64>,
) -> Result<Json<ResearcherDetailView>, ApiError>
where
  S: PortalStore,
{
  let detail = state
    .store
    .get_researcher(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Chercheur", id))?;

  let links = Links::new(origin, &state.media);
  Ok(Json(ResearcherDetailView::new(&detail, &links)))
}
