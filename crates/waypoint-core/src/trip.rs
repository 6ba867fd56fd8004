//! Trip: the aggregate root.
//!
//! A trip owns its activities, expenses, documents and reviews outright. The
//! whole trip, nested collections included, is what gets persisted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  Result,
  error::invalid,
  item::{Activity, Document, Expense, Review, normalize_currency, validate_all},
  packing::PackingCategory,
  patch::{double_option, set, set_opt},
};

/// Trip length assumed when either date is missing.
pub const DEFAULT_TRIP_DAYS: u32 = 7;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TripKind {
  Leisure,
  Business,
  Adventure,
  Family,
  Other,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Visibility {
  #[default]
  Private,
  Shared,
  Public,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
  pub id:              Uuid,
  pub destination:     String,
  pub start_date:      Option<NaiveDate>,
  pub end_date:        Option<NaiveDate>,
  pub created_at:      DateTime<Utc>,
  #[serde(default)]
  pub updated_at:      Option<DateTime<Utc>>,
  #[serde(default)]
  pub title:           Option<String>,
  #[serde(default)]
  pub notes:           Option<String>,
  #[serde(default)]
  pub budget:          Option<f64>,
  #[serde(default)]
  pub budget_currency: Option<String>,
  #[serde(default)]
  pub travelers:       Option<u32>,
  #[serde(default)]
  pub trip_type:       Option<TripKind>,
  #[serde(default)]
  pub visibility:      Visibility,
  #[serde(default)]
  pub activities:      Vec<Activity>,
  #[serde(default)]
  pub expenses:        Vec<Expense>,
  #[serde(default)]
  pub documents:       Vec<Document>,
  #[serde(default)]
  pub reviews:         Vec<Review>,
  /// A generated packing list the user chose to keep with the trip.
  #[serde(default)]
  pub packing_list:    Option<Vec<PackingCategory>>,
}

impl Trip {
  /// Inclusive number of calendar days, or [`DEFAULT_TRIP_DAYS`] when a date
  /// is missing. Never less than one.
  pub fn duration_days(&self) -> u32 {
    match (self.start_date, self.end_date) {
      (Some(start), Some(end)) => {
        let days = (end - start).num_days() + 1;
        u32::try_from(days).unwrap_or(1).max(1)
      }
      _ => DEFAULT_TRIP_DAYS,
    }
  }

  /// Number of travelers, defaulting to one.
  pub fn traveler_count(&self) -> u32 { self.travelers.unwrap_or(1).max(1) }

  /// Sum of all expense amounts, ignoring currency.
  ///
  /// Use [`crate::currency::CurrencyConverter::total_in`] for a converted
  /// total.
  pub fn expense_total(&self) -> f64 { self.expenses.iter().map(|e| e.amount).sum() }

  pub(crate) fn validate(mut self) -> Result<Self> {
    if self.destination.trim().is_empty() {
      return Err(invalid("destination must not be empty"));
    }
    if let (Some(start), Some(end)) = (self.start_date, self.end_date)
      && start > end
    {
      return Err(invalid(format!(
        "start date {start} is after end date {end}"
      )));
    }
    if self.travelers == Some(0) {
      return Err(invalid("a trip needs at least one traveler"));
    }
    match self.budget {
      Some(b) if !b.is_finite() || b < 0.0 => {
        return Err(invalid("budget must be a non-negative number"));
      }
      _ => {}
    }
    self.budget_currency = self
      .budget_currency
      .as_deref()
      .map(normalize_currency)
      .transpose()?;
    Ok(self)
  }
}

// ─── NewTrip ─────────────────────────────────────────────────────────────────

/// Input to [`crate::itinerary::ItineraryStore::create_trip`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTrip {
  pub destination:     String,
  #[serde(default)]
  pub start_date:      Option<NaiveDate>,
  #[serde(default)]
  pub end_date:        Option<NaiveDate>,
  #[serde(default)]
  pub title:           Option<String>,
  #[serde(default)]
  pub notes:           Option<String>,
  #[serde(default)]
  pub budget:          Option<f64>,
  #[serde(default)]
  pub budget_currency: Option<String>,
  #[serde(default)]
  pub travelers:       Option<u32>,
  #[serde(default)]
  pub trip_type:       Option<TripKind>,
  #[serde(default)]
  pub visibility:      Visibility,
}

impl NewTrip {
  pub fn new(destination: impl Into<String>) -> Self {
    Self { destination: destination.into(), ..Default::default() }
  }

  pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
    self.start_date = Some(start);
    self.end_date = Some(end);
    self
  }

  pub(crate) fn into_trip(self, now: DateTime<Utc>) -> Result<Trip> {
    Trip {
      id:              Uuid::new_v4(),
      destination:     self.destination,
      start_date:      self.start_date,
      end_date:        self.end_date,
      created_at:      now,
      updated_at:      None,
      title:           self.title,
      notes:           self.notes,
      budget:          self.budget,
      budget_currency: self.budget_currency,
      travelers:       self.travelers,
      trip_type:       self.trip_type,
      visibility:      self.visibility,
      activities:      Vec::new(),
      expenses:        Vec::new(),
      documents:       Vec::new(),
      reviews:         Vec::new(),
      packing_list:    None,
    }
    .validate()
  }
}

// ─── TripPatch ───────────────────────────────────────────────────────────────

/// Shallow partial update of a trip. Collections, when present, replace the
/// current collection wholesale; every incoming item is validated and ids
/// must be unique within its collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripPatch {
  pub destination:     Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub start_date:      Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "double_option")]
  pub end_date:        Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "double_option")]
  pub title:           Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub notes:           Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub budget:          Option<Option<f64>>,
  #[serde(default, deserialize_with = "double_option")]
  pub budget_currency: Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub travelers:       Option<Option<u32>>,
  #[serde(default, deserialize_with = "double_option")]
  pub trip_type:       Option<Option<TripKind>>,
  pub visibility:      Option<Visibility>,
  pub activities:      Option<Vec<Activity>>,
  pub expenses:        Option<Vec<Expense>>,
  pub documents:       Option<Vec<Document>>,
  pub reviews:         Option<Vec<Review>>,
  #[serde(default, deserialize_with = "double_option")]
  pub packing_list:    Option<Option<Vec<PackingCategory>>>,
}

impl TripPatch {
  /// Return a patched copy of `trip` with `updated_at` stamped, or a
  /// validation error. `trip` itself is never modified.
  pub fn apply(self, trip: &Trip, now: DateTime<Utc>) -> Result<Trip> {
    let mut next = trip.clone();
    set(&mut next.destination, self.destination);
    set_opt(&mut next.start_date, self.start_date);
    set_opt(&mut next.end_date, self.end_date);
    set_opt(&mut next.title, self.title);
    set_opt(&mut next.notes, self.notes);
    set_opt(&mut next.budget, self.budget);
    set_opt(&mut next.budget_currency, self.budget_currency);
    set_opt(&mut next.travelers, self.travelers);
    set_opt(&mut next.trip_type, self.trip_type);
    set(&mut next.visibility, self.visibility);
    set(&mut next.activities, self.activities.map(|v| validate_all(v, now)).transpose()?);
    set(&mut next.expenses, self.expenses.map(|v| validate_all(v, now)).transpose()?);
    set(&mut next.documents, self.documents.map(|v| validate_all(v, now)).transpose()?);
    set(&mut next.reviews, self.reviews.map(|v| validate_all(v, now)).transpose()?);
    set_opt(&mut next.packing_list, self.packing_list);
    next.updated_at = Some(now);
    next.validate()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn paris() -> Trip {
    NewTrip::new("Paris")
      .dates(date("2025-06-01"), date("2025-06-05"))
      .into_trip(Utc::now())
      .unwrap()
  }

  #[test]
  fn duration_is_inclusive() {
    assert_eq!(paris().duration_days(), 5);
  }

  #[test]
  fn duration_defaults_without_dates() {
    let trip = NewTrip::new("Lisbon").into_trip(Utc::now()).unwrap();
    assert_eq!(trip.duration_days(), DEFAULT_TRIP_DAYS);
  }

  #[test]
  fn reversed_dates_are_rejected() {
    let err = NewTrip::new("Rome")
      .dates(date("2025-06-05"), date("2025-06-01"))
      .into_trip(Utc::now())
      .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn blank_destination_is_rejected() {
    assert!(NewTrip::new("   ").into_trip(Utc::now()).is_err());
  }

  #[test]
  fn empty_patch_only_touches_updated_at() {
    let trip = paris();
    let now = Utc::now();
    let patched = TripPatch::default().apply(&trip, now).unwrap();

    assert_eq!(patched.updated_at, Some(now));
    let restored = Trip { updated_at: trip.updated_at, ..patched };
    assert_eq!(restored, trip);
  }

  #[test]
  fn patch_can_clear_an_optional_field() {
    let mut trip = paris();
    trip.notes = Some("bring umbrella".into());
    let patch: TripPatch = serde_json::from_str(r#"{"notes":null}"#).unwrap();
    let patched = patch.apply(&trip, Utc::now()).unwrap();
    assert_eq!(patched.notes, None);
  }

  #[test]
  fn patch_producing_reversed_dates_is_rejected() {
    let trip = paris();
    let patch = TripPatch {
      end_date: Some(Some(date("2025-05-01"))),
      ..Default::default()
    };
    assert!(patch.apply(&trip, Utc::now()).is_err());
  }
}
