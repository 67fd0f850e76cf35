//! Storage of uploaded files below the media root.
//!
//! Files are written under a per-category directory with a content-hash
//! prefix, so identical uploads land on the same path and distinct uploads
//! with the same client file name never collide. Stored paths are relative
//! to the media root and double as the path under the media URL prefix.

use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// Where an upload belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
  ApplicationCv,
  ApplicationLetter,
  ApplicationTranscripts,
  ApplicationDiploma,
}

impl MediaCategory {
  pub fn dir(self) -> &'static str {
    match self {
      Self::ApplicationCv => "static/candidatures/cv",
      Self::ApplicationLetter => "static/candidatures/lettres",
      Self::ApplicationTranscripts => "static/candidatures/notes",
      Self::ApplicationDiploma => "static/candidatures/diplomes",
    }
  }
}

#[derive(Debug, Clone)]
pub struct MediaStore {
  pub root:       PathBuf,
  /// URL path the root is served under, e.g. `/media/`.
  pub url_prefix: String,
}

impl MediaStore {
  pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
    let trimmed = url_prefix.trim_matches('/');
    let url_prefix =
      if trimmed.is_empty() { "/".to_owned() } else { format!("/{trimmed}/") };
    Self { root: root.into(), url_prefix }
  }

  /// Write `bytes` and return the stored relative path.
  pub async fn save(
    &self,
    category: MediaCategory,
    file_name: &str,
    bytes: &[u8],
  ) -> std::io::Result<String> {
    let relative = stored_path(category, file_name, bytes);
    let target = self.root.join(&relative);
    if let Some(parent) = target.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, bytes).await?;
    tracing::debug!(path = %relative, size = bytes.len(), "stored upload");
    Ok(relative)
  }

  /// Start collecting the uploads of one submission.
  pub fn stage(&self) -> Staged<'_> {
    Staged { media: self, created: Vec::new() }
  }

  /// URL path of a stored file, relative to the server origin.
  pub fn url_path(&self, stored: &str) -> String {
    format!("{}{}", self.url_prefix, stored.trim_start_matches('/'))
  }
}

/// Uploads written for one submission.
///
/// Only files the submission created are tracked: a content-addressed path
/// that already existed may belong to another record.
pub struct Staged<'a> {
  media:   &'a MediaStore,
  created: Vec<PathBuf>,
}

impl Staged<'_> {
  pub async fn save(
    &mut self,
    category: MediaCategory,
    file_name: &str,
    bytes: &[u8],
  ) -> std::io::Result<String> {
    let target = self.media.root.join(stored_path(category, file_name, bytes));
    let existed = tokio::fs::try_exists(&target).await?;
    let relative = self.media.save(category, file_name, bytes).await?;
    if !existed {
      self.created.push(target);
    }
    Ok(relative)
  }

  /// Remove the files this submission created.
  pub async fn discard(self) {
    for path in self.created {
      if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "orphaned upload not removed");
      }
    }
  }
}

fn stored_path(category: MediaCategory, file_name: &str, bytes: &[u8]) -> String {
  let digest = hex::encode(Sha256::digest(bytes));
  format!("{}/{}_{}", category.dir(), &digest[..16], sanitize(file_name))
}

/// Keep the final path component, restricted to a portable character set.
fn sanitize(file_name: &str) -> String {
  let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
  let cleaned: String = base
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
    .collect();
  let cleaned = cleaned.trim_start_matches('.');
  if cleaned.is_empty() { "fichier".to_owned() } else { cleaned.to_owned() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_prefix_is_normalised() {
    assert_eq!(MediaStore::new("m", "media").url_prefix, "/media/");
    assert_eq!(MediaStore::new("m", "/media/").url_prefix, "/media/");
    assert_eq!(MediaStore::new("m", "").url_prefix, "/");
  }

  #[test]
  fn file_names_cannot_escape_their_directory() {
    assert_eq!(sanitize("../../etc/passwd"), "passwd");
    assert_eq!(sanitize("C:\\docs\\mon cv.pdf"), "mon_cv.pdf");
    assert_eq!(sanitize(".."), "fichier");
  }

  #[test]
  fn identical_content_shares_a_path() {
    let a = stored_path(MediaCategory::ApplicationCv, "cv.pdf", b"%PDF-1.4");
    let b = stored_path(MediaCategory::ApplicationCv, "cv.pdf", b"%PDF-1.4");
    let c = stored_path(MediaCategory::ApplicationCv, "cv.pdf", b"%PDF-1.5");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.starts_with("static/candidatures/cv/"));
  }

  #[tokio::test]
  async fn save_writes_below_root() {
    let root = std::env::temp_dir().join(format!("una-media-{}", std::process::id()));
    let media = MediaStore::new(&root, "/media/");
    let path = media
      .save(MediaCategory::ApplicationLetter, "lettre.pdf", b"bonjour")
      .await
      .unwrap();
    assert_eq!(tokio::fs::read(root.join(&path)).await.unwrap(), b"bonjour");
    assert_eq!(media.url_path(&path), format!("/media/{path}"));
    tokio::fs::remove_dir_all(&root).await.ok();
  }

  #[tokio::test]
  async fn discard_keeps_files_shared_with_earlier_uploads() {
    let root = std::env::temp_dir().join(format!("una-media-stage-{}", std::process::id()));
    let media = MediaStore::new(&root, "/media/");
    let shared = media.save(MediaCategory::ApplicationCv, "cv.pdf", b"%PDF shared").await.unwrap();

    let mut staged = media.stage();
    let reused = staged.save(MediaCategory::ApplicationCv, "cv.pdf", b"%PDF shared").await.unwrap();
    let fresh = staged
      .save(MediaCategory::ApplicationTranscripts, "notes.pdf", b"%PDF notes")
      .await
      .unwrap();
    assert_eq!(reused, shared);
    staged.discard().await;

    assert!(root.join(&shared).exists());
    assert!(!root.join(&fresh).exists());
    tokio::fs::remove_dir_all(&root).await.ok();
  }
}
