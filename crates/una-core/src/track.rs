//! Academic tracks ("parcours") offered by laboratories.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::laboratory::{ActivityStatus, Laboratory};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
  pub id:            i64,
  pub laboratory_id: i64,
  pub name:          String,
  pub created_on:    Option<NaiveDate>,
  pub description:   Option<String>,
  /// Programme length in days.
  pub duration_days: Option<i64>,
  pub max_students:  Option<i64>,
  pub status:        ActivityStatus,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionCondition {
  pub id:    i64,
  pub title: String,
  pub value: Option<String>,
}

/// A career outcome ("débouché") of a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
  pub id:      i64,
  pub outcome: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialization {
  pub id:             i64,
  pub specialization: String,
}

/// Listing entry: the track and the laboratory fields shown beside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSummary {
  pub track:           Track,
  pub laboratory_name: String,
  pub laboratory_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDetail {
  pub track:           Track,
  pub laboratory:      Laboratory,
  pub conditions:      Vec<AdmissionCondition>,
  pub outcomes:        Vec<Outcome>,
  pub specializations: Vec<Specialization>,
}
