//! Handlers for `/publications/` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/publications/` | `search`, `mot_cle`, `citation`, `year`, `min_facteur_impact`, `recherche`, `laboratoire_id`, `laboratoire_domaine_id`, `has_pdf`, `has_url`, `ordering`; scoped |
//! | `GET`  | `/publications/{id}/` | Adds content, keywords and citations |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use una_core::{
  query::{PublicationFilter, RawParams},
  store::PortalStore,
};

use crate::{
  ApiState,
  error::ApiError,
  views::{
    Links, RequestOrigin,
    publication::{PublicationDetailView, PublicationListView},
  },
};

/// `GET /publications/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Query(params): Query<RawParams>,
) -> Result<Json<Vec<PublicationListView>>, ApiError>
where
  S: PortalStore,
{
  let filter = PublicationFilter::from_params(&params, &state.scope);
  tracing::debug!(?filter, "listing publications");
  let publications = state.store.list_publications(&filter).await.map_err(ApiError::store)?;

  let links = Links::new(origin, &state.media);
  Ok(Json(publications.iter().map(|p| PublicationListView::new(p, &links)).collect()))
}

/// `GET /publications/{id}/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  origin: RequestOrigin,
  Path(id): Path<i64>,
) -> Result<Json<PublicationDetailView>, ApiError>
where
  S: PortalStore,
{
  let detail = state
    .store
    .get_publication(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Publication", id))?;

  let links = Links::new(origin, &state.media);
  Ok(Json(PublicationDetailView::new(&detail, &links)))
}
