//! External partner organisations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
  pub id:          i64,
  pub logo:        Option<String>,
  pub name:        String,
  pub country:     Option<String>,
  pub city:        Option<String>,
  pub address:     Option<String>,
  pub website:     Option<String>,
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub description: Option<String>,
  pub starts_on:   Option<NaiveDate>,
  pub ends_on:     Option<NaiveDate>,
  pub notes:       Option<String>,
}
