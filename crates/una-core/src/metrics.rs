//! Derived metrics computed from stored dates.
//!
//! Every function here is pure: the current date is always a parameter so
//! callers (and tests) decide what "today" is.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Elapsed share of a project's span, in percent.
///
/// Returns 0 before `start` or when no end date is known, 100 on or after
/// `end` (or when the span is empty or negative), and the linear elapsed
/// share otherwise, clamped to `[0, 100]`.
pub fn progress_percentage(
  start: NaiveDate,
  end: Option<NaiveDate>,
  today: NaiveDate,
) -> f64 {
  let Some(end) = end else { return 0.0 };

  if today < start {
    return 0.0;
  }
  if today >= end {
    return 100.0;
  }

  let total = (end - start).num_days();
  if total <= 0 {
    return 100.0;
  }
  let elapsed = (today - start).num_days();

  (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Number of days from `start` to `end`, or `None` if either is unknown.
pub fn duration_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<i64> {
  Some((end? - start?).num_days())
}

/// Render a day count the way the portal displays durations.
///
/// Months are 30 days and years 365 days; the output is intentionally not
/// calendar-accurate.
pub fn humanize_duration(days: i64) -> String {
  if days < 30 {
    format!("{days} jours")
  } else if days < 365 {
    format!("{} mois, {} jours", days / 30, days % 30)
  } else {
    format!("{} an(s), {} mois", days / 365, (days % 365) / 30)
  }
}

/// [`humanize_duration`], or `missing` when the duration is unknown.
pub fn humanize_optional(days: Option<i64>, missing: &str) -> String {
  days.map_or_else(|| missing.to_owned(), humanize_duration)
}

/// Age in whole years on `today`.
pub fn applicant_age(birth: NaiveDate, today: NaiveDate) -> i32 {
  let had_birthday = (today.month(), today.day()) >= (birth.month(), birth.day());
  today.year() - birth.year() - i32::from(!had_birthday)
}

/// Coarse bucket of a progress percentage, shown beside progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
  NotStarted,
  Starting,
  Underway,
  NearlyDone,
  Finished,
}

impl ProgressStage {
  pub fn from_percentage(progress: f64) -> Self {
    if progress <= 0.0 {
      Self::NotStarted
    } else if progress < 50.0 {
      Self::Starting
    } else if progress < 80.0 {
      Self::Underway
    } else if progress < 100.0 {
      Self::NearlyDone
    } else {
      Self::Finished
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::NotStarted => "Non commencé",
      Self::Starting => "En début",
      Self::Underway => "En cours",
      Self::NearlyDone => "Bientôt fini",
      Self::Finished => "Terminé",
    }
  }
}
