//! JSON views of the domain types.
//!
//! Output keys keep the portal's established French wire names. Views are
//! built from core read models plus a [`Links`] resolver for file-backed
//! fields and, where ages or progress are shown, the current date.

pub mod application;
pub mod contact;
pub mod laboratory;
pub mod project;
pub mod publication;
pub mod researcher;
pub mod track;

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{header, request::Parts},
};

use crate::media::MediaStore;

// ─── Request origin ──────────────────────────────────────────────────────────

/// Scheme and host the request was addressed to, when known.
///
/// The scheme comes from `X-Forwarded-Proto` (first value) and defaults to
/// `http`; the host from the `Host` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin(pub Option<String>);

impl RequestOrigin {
  pub fn from_parts(parts: &Parts) -> Self {
    let header_str =
      |name: header::HeaderName| parts.headers.get(name).and_then(|v| v.to_str().ok());

    let Some(host) = header_str(header::HOST).map(str::trim).filter(|h| !h.is_empty())
    else {
      return Self(None);
    };
    let scheme = header_str(header::HeaderName::from_static("x-forwarded-proto"))
      .and_then(|v| v.split(',').next())
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .unwrap_or("http");

    Self(Some(format!("{scheme}://{host}")))
  }
}

impl<S> FromRequestParts<S> for RequestOrigin
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    Ok(Self::from_parts(parts))
  }
}

// ─── File links ──────────────────────────────────────────────────────────────

/// Turns stored media paths into the URLs sent to clients.
#[derive(Debug, Clone)]
pub struct Links<'a> {
  origin: Option<String>,
  media:  &'a MediaStore,
}

impl<'a> Links<'a> {
  pub fn new(origin: RequestOrigin, media: &'a MediaStore) -> Self {
    Self { origin: origin.0, media }
  }

  /// Absolute URL when the origin is known, the media-relative URL
  /// otherwise, `None` when no file is stored.
  pub fn file(&self, stored: Option<&str>) -> Option<String> {
    let stored = stored.map(str::trim).filter(|s| !s.is_empty())?;
    let path = self.media.url_path(stored);
    Some(match &self.origin {
      Some(origin) => format!("{origin}{path}"),
      None => path,
    })
  }
}

#[cfg(test)]
mod tests {
  use axum::http::Request;

  use super::*;

  fn origin_of(headers: &[(&str, &str)]) -> RequestOrigin {
    let mut builder = Request::builder().uri("/chercheurs/");
    for (k, v) in headers {
      builder = builder.header(*k, *v);
    }
    let (parts, ()) = builder.body(()).unwrap().into_parts();
    RequestOrigin::from_parts(&parts)
  }

  #[test]
  fn origin_honours_forwarded_proto() {
    assert_eq!(origin_of(&[("host", "una.edu")]).0.as_deref(), Some("http://una.edu"));
    assert_eq!(
      origin_of(&[("host", "una.edu"), ("x-forwarded-proto", "https, http")]).0.as_deref(),
      Some("https://una.edu"),
    );
    assert_eq!(origin_of(&[]).0, None);
  }

  #[test]
  fn file_urls() {
    let media = MediaStore::new("media", "/media/");
    let absolute = Links::new(RequestOrigin(Some("https://una.edu".into())), &media);
    let relative = Links::new(RequestOrigin(None), &media);

    assert_eq!(
      absolute.file(Some("static/photoTeam/a.jpg")).as_deref(),
      Some("https://una.edu/media/static/photoTeam/a.jpg"),
    );
    assert_eq!(
      relative.file(Some("static/photoTeam/a.jpg")).as_deref(),
      Some("/media/static/photoTeam/a.jpg"),
    );
    assert_eq!(relative.file(Some("")), None);
    assert_eq!(relative.file(None), None);
  }
}
