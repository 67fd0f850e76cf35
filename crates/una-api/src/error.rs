//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use una_core::validation::FieldErrors;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Donnees invalides")]
  Validation(FieldErrors),

  /// The request is well-formed but clashes with stored data.
  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{source}")]
  Store {
    kind:   &'static str,
    #[source]
    source: BoxError,
  },

  /// A failure while persisting a submission.
  #[error("Erreur lors de la sauvegarde: {source}")]
  Save {
    kind:   &'static str,
    #[source]
    source: BoxError,
  },
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store { kind: std::any::type_name::<E>(), source: Box::new(e) }
  }

  pub fn save<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Save { kind: std::any::type_name::<E>(), source: Box::new(e) }
  }

  pub fn not_found(what: &str, id: i64) -> Self {
    ApiError::NotFound(format!("{what} {id} introuvable"))
  }
}

impl From<FieldErrors> for ApiError {
  fn from(errors: FieldErrors) -> Self {
    ApiError::Validation(errors)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Validation(details) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": self.to_string(), "details": details }),
      ),
      ApiError::Conflict(m) | ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, json!({ "error": m }))
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::Store { kind, .. } | ApiError::Save { kind, .. } => {
        tracing::error!(error = %self, kind, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": self.to_string(), "type": kind }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use axum::body::to_bytes;

  use super::*;

  async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
    let resp = err.into_response();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn validation_lists_field_details() {
    let mut errors = FieldErrors::new();
    errors.required("email_candidat");
    let (status, body) = body_of(errors.into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Donnees invalides");
    assert_eq!(body["details"]["email_candidat"][0], "Ce champ est obligatoire.");
  }

  #[tokio::test]
  async fn save_failure_names_the_error_type() {
    let io = std::io::Error::other("disque plein");
    let (status, body) = body_of(ApiError::save(io)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Erreur lors de la sauvegarde: disque plein");
    assert!(body["type"].as_str().unwrap().contains("io"));
  }

  #[tokio::test]
  async fn not_found_is_404() {
    let (status, body) = body_of(ApiError::not_found("Chercheur", 9)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Chercheur 9 introuvable");
  }
}
