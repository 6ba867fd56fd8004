//! Entities owned by a trip: activities, expenses, documents and reviews.
//!
//! None of these exist independently of their trip. They are created,
//! patched and removed only through
//! [`ItineraryStore`](crate::itinerary::ItineraryStore), which works against
//! the [`TripItem`] abstraction so every collection shares one code path.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  Result,
  error::invalid,
  ledger::newest_first,
  location::Coordinate,
  patch::{double_option, set, set_opt},
  trip::Trip,
};

// ─── Collections ─────────────────────────────────────────────────────────────

/// The four nested collections of a trip.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
  Activities,
  Expenses,
  Documents,
  Reviews,
}

/// An entity stored in one of a trip's nested collections.
pub trait TripItem: Clone + Send + Sync + Sized + 'static {
  /// Creation input; the store assigns the id and timestamps.
  type New: Send;
  /// Typed partial update.
  type Patch: Send;

  const COLLECTION: Collection;

  fn id(&self) -> Uuid;

  /// Build and validate a new item.
  fn create(input: Self::New, now: DateTime<Utc>) -> Result<Self>;

  /// Return a copy with `patch` applied and `updated_at` stamped, or a
  /// validation error. `self` is never modified.
  fn patched(&self, patch: Self::Patch, now: DateTime<Utc>) -> Result<Self>;

  /// Re-check an item that arrived whole, e.g. in a trip patch.
  fn validated(self, now: DateTime<Utc>) -> Result<Self>;

  /// Order used when listing the collection. Storage keeps insertion order.
  fn listing_order(items: Vec<Self>) -> Vec<Self> { items }

  fn collection(trip: &Trip) -> &Vec<Self>;
  fn collection_mut(trip: &mut Trip) -> &mut Vec<Self>;
}

/// Validate a replacement for a whole collection. Ids must stay unique so
/// later item updates address exactly one entry.
pub(crate) fn validate_all<T: TripItem>(items: Vec<T>, now: DateTime<Utc>) -> Result<Vec<T>> {
  let mut seen = HashSet::with_capacity(items.len());
  items
    .into_iter()
    .map(|item| {
      if !seen.insert(item.id()) {
        return Err(invalid(format!("duplicate {} id {}", T::COLLECTION, item.id())));
      }
      item.validated(now)
    })
    .collect()
}

fn require_text(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(invalid(format!("{field} must not be empty")));
  }
  Ok(())
}

fn require_non_negative(field: &str, value: Option<f64>) -> Result<()> {
  match value {
    Some(v) if !v.is_finite() || v < 0.0 => {
      Err(invalid(format!("{field} must be a non-negative number")))
    }
    _ => Ok(()),
  }
}

/// Upper-case and trim a currency code, rejecting blanks.
pub fn normalize_currency(code: &str) -> Result<String> {
  let code = code.trim().to_ascii_uppercase();
  if code.is_empty() {
    return Err(invalid("currency code must not be empty"));
  }
  Ok(code)
}

// ─── Activity ────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityKind {
  Sightseeing,
  Food,
  Hotel,
  Transport,
  Activity,
  Shopping,
  Flight,
  Other,
}

/// Where an activity happens: a free-text place or a coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityLocation {
  Coordinates(Coordinate),
  Text(String),
}

impl Default for ActivityLocation {
  fn default() -> Self { Self::Text(String::new()) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
  pub id:               Uuid,
  pub title:            String,
  pub kind:             ActivityKind,
  pub location:         ActivityLocation,
  pub date:             Option<NaiveDate>,
  pub time:             Option<NaiveTime>,
  pub duration_minutes: u32,
  pub cost:             Option<f64>,
  pub currency:         Option<String>,
  pub website:          Option<String>,
  pub phone:            Option<String>,
  pub notes:            Option<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
  pub title:            String,
  pub kind:             ActivityKind,
  #[serde(default)]
  pub location:         ActivityLocation,
  #[serde(default)]
  pub date:             Option<NaiveDate>,
  #[serde(default)]
  pub time:             Option<NaiveTime>,
  pub duration_minutes: u32,
  #[serde(default)]
  pub cost:             Option<f64>,
  #[serde(default)]
  pub currency:         Option<String>,
  #[serde(default)]
  pub website:          Option<String>,
  #[serde(default)]
  pub phone:            Option<String>,
  #[serde(default)]
  pub notes:            Option<String>,
}

impl NewActivity {
  /// Convenience constructor with all optional fields unset.
  pub fn new(
    title: impl Into<String>,
    kind: ActivityKind,
    duration_minutes: u32,
  ) -> Self {
    Self {
      title: title.into(),
      kind,
      location: ActivityLocation::default(),
      date: None,
      time: None,
      duration_minutes,
      cost: None,
      currency: None,
      website: None,
      phone: None,
      notes: None,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPatch {
  pub title:            Option<String>,
  pub kind:             Option<ActivityKind>,
  pub location:         Option<ActivityLocation>,
  #[serde(default, deserialize_with = "double_option")]
  pub date:             Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "double_option")]
  pub time:             Option<Option<NaiveTime>>,
  pub duration_minutes: Option<u32>,
  #[serde(default, deserialize_with = "double_option")]
  pub cost:             Option<Option<f64>>,
  #[serde(default, deserialize_with = "double_option")]
  pub currency:         Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub website:          Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub phone:            Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub notes:            Option<Option<String>>,
}

impl Activity {
  fn validate(mut self) -> Result<Self> {
    require_text("activity title", &self.title)?;
    if self.duration_minutes == 0 {
      return Err(invalid("activity duration must be greater than zero"));
    }
    require_non_negative("activity cost", self.cost)?;
    self.currency = self.currency.as_deref().map(normalize_currency).transpose()?;
    Ok(self)
  }
}

impl TripItem for Activity {
  type New = NewActivity;
  type Patch = ActivityPatch;

  const COLLECTION: Collection = Collection::Activities;

  fn id(&self) -> Uuid { self.id }

  fn create(input: NewActivity, now: DateTime<Utc>) -> Result<Self> {
    Activity {
      id:               Uuid::new_v4(),
      title:            input.title,
      kind:             input.kind,
      location:         input.location,
      date:             input.date,
      time:             input.time,
      duration_minutes: input.duration_minutes,
      cost:             input.cost,
      currency:         input.currency,
      website:          input.website,
      phone:            input.phone,
      notes:            input.notes,
      created_at:       now,
      updated_at:       None,
    }
    .validate()
  }

  fn patched(&self, patch: ActivityPatch, now: DateTime<Utc>) -> Result<Self> {
    let mut next = self.clone();
    set(&mut next.title, patch.title);
    set(&mut next.kind, patch.kind);
    set(&mut next.location, patch.location);
    set_opt(&mut next.date, patch.date);
    set_opt(&mut next.time, patch.time);
    set(&mut next.duration_minutes, patch.duration_minutes);
    set_opt(&mut next.cost, patch.cost);
    set_opt(&mut next.currency, patch.currency);
    set_opt(&mut next.website, patch.website);
    set_opt(&mut next.phone, patch.phone);
    set_opt(&mut next.notes, patch.notes);
    next.updated_at = Some(now);
    next.validate()
  }

  fn validated(self, _now: DateTime<Utc>) -> Result<Self> { self.validate() }

  fn collection(trip: &Trip) -> &Vec<Self> { &trip.activities }

  fn collection_mut(trip: &mut Trip) -> &mut Vec<Self> { &mut trip.activities }
}

// ─── Expense ─────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExpenseCategory {
  Accommodation,
  Transportation,
  Food,
  Activities,
  Shopping,
  Entertainment,
  Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
  pub id:             Uuid,
  pub description:    String,
  pub amount:         f64,
  pub currency:       String,
  pub category:       ExpenseCategory,
  pub date:           NaiveDate,
  pub payment_method: Option<String>,
  pub notes:          Option<String>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
  pub description:    String,
  pub amount:         f64,
  pub currency:       String,
  pub category:       ExpenseCategory,
  pub date:           NaiveDate,
  #[serde(default)]
  pub payment_method: Option<String>,
  #[serde(default)]
  pub notes:          Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpensePatch {
  pub description:    Option<String>,
  pub amount:         Option<f64>,
  pub currency:       Option<String>,
  pub category:       Option<ExpenseCategory>,
  pub date:           Option<NaiveDate>,
  #[serde(default, deserialize_with = "double_option")]
  pub payment_method: Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub notes:          Option<Option<String>>,
}

impl Expense {
  fn validate(mut self) -> Result<Self> {
    require_text("expense description", &self.description)?;
    if !self.amount.is_finite() || self.amount <= 0.0 {
      return Err(invalid("expense amount must be greater than zero"));
    }
    self.currency = normalize_currency(&self.currency)?;
    Ok(self)
  }
}

impl TripItem for Expense {
  type New = NewExpense;
  type Patch = ExpensePatch;

  const COLLECTION: Collection = Collection::Expenses;

  fn id(&self) -> Uuid { self.id }

  fn create(input: NewExpense, now: DateTime<Utc>) -> Result<Self> {
    Expense {
      id:             Uuid::new_v4(),
      description:    input.description,
      amount:         input.amount,
      currency:       input.currency,
      category:       input.category,
      date:           input.date,
      payment_method: input.payment_method,
      notes:          input.notes,
      created_at:     now,
      updated_at:     None,
    }
    .validate()
  }

  fn patched(&self, patch: ExpensePatch, now: DateTime<Utc>) -> Result<Self> {
    let mut next = self.clone();
    set(&mut next.description, patch.description);
    set(&mut next.amount, patch.amount);
    set(&mut next.currency, patch.currency);
    set(&mut next.category, patch.category);
    set(&mut next.date, patch.date);
    set_opt(&mut next.payment_method, patch.payment_method);
    set_opt(&mut next.notes, patch.notes);
    next.updated_at = Some(now);
    next.validate()
  }

  fn validated(self, _now: DateTime<Utc>) -> Result<Self> { self.validate() }

  fn listing_order(items: Vec<Self>) -> Vec<Self> { newest_first(&items) }

  fn collection(trip: &Trip) -> &Vec<Self> { &trip.expenses }

  fn collection_mut(trip: &mut Trip) -> &mut Vec<Self> { &mut trip.expenses }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// The kind of a travel document. `Other` carries a free-text label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
  Passport,
  Visa,
  Id,
  Insurance,
  Ticket,
  Reservation,
  Permit,
  Other(String),
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
pub enum DocumentStatus {
  #[default]
  NotUploaded,
  Valid,
  ExpiringSoon,
  Expired,
}

/// Documents expiring within this many days are flagged `ExpiringSoon`.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

impl DocumentStatus {
  /// Derive a status from an expiry date relative to `today`.
  pub fn from_expiry(expiry: NaiveDate, today: NaiveDate) -> Self {
    let remaining = (expiry - today).num_days();
    if remaining < 0 {
      Self::Expired
    } else if remaining <= EXPIRY_WARNING_DAYS {
      Self::ExpiringSoon
    } else {
      Self::Valid
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub id:          Uuid,
  pub name:        String,
  pub kind:        DocumentKind,
  pub required:    bool,
  pub status:      DocumentStatus,
  pub number:      Option<String>,
  pub issue_date:  Option<NaiveDate>,
  pub expiry_date: Option<NaiveDate>,
  pub notes:       Option<String>,
  pub link:        Option<String>,
  /// `true` when the user added the document rather than a generator.
  pub custom:      bool,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
  pub name:        String,
  pub kind:        DocumentKind,
  #[serde(default)]
  pub required:    bool,
  #[serde(default)]
  pub status:      DocumentStatus,
  #[serde(default)]
  pub number:      Option<String>,
  #[serde(default)]
  pub issue_date:  Option<NaiveDate>,
  #[serde(default)]
  pub expiry_date: Option<NaiveDate>,
  #[serde(default)]
  pub notes:       Option<String>,
  #[serde(default)]
  pub link:        Option<String>,
  #[serde(default = "default_custom")]
  pub custom:      bool,
}

fn default_custom() -> bool { true }

impl NewDocument {
  pub fn new(name: impl Into<String>, kind: DocumentKind, required: bool) -> Self {
    Self {
      name: name.into(),
      kind,
      required,
      status: DocumentStatus::NotUploaded,
      number: None,
      issue_date: None,
      expiry_date: None,
      notes: None,
      link: None,
      custom: true,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentPatch {
  pub name:        Option<String>,
  pub kind:        Option<DocumentKind>,
  pub required:    Option<bool>,
  pub status:      Option<DocumentStatus>,
  #[serde(default, deserialize_with = "double_option")]
  pub number:      Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub issue_date:  Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "double_option")]
  pub expiry_date: Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "double_option")]
  pub notes:       Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub link:        Option<Option<String>>,
}

impl Document {
  /// Checks the document and, once it has been uploaded, re-derives its
  /// status from the expiry date relative to `today`.
  fn validate(mut self, today: NaiveDate) -> Result<Self> {
    require_text("document name", &self.name)?;
    if let (Some(issued), Some(expires)) = (self.issue_date, self.expiry_date)
      && issued > expires
    {
      return Err(invalid("document issue date is after its expiry date"));
    }
    if let Some(expiry) = self.expiry_date
      && self.status != DocumentStatus::NotUploaded
    {
      self.status = DocumentStatus::from_expiry(expiry, today);
    }
    Ok(self)
  }
}

impl TripItem for Document {
  type New = NewDocument;
  type Patch = DocumentPatch;

  const COLLECTION: Collection = Collection::Documents;

  fn id(&self) -> Uuid { self.id }

  fn create(input: NewDocument, now: DateTime<Utc>) -> Result<Self> {
    Document {
      id:          Uuid::new_v4(),
      name:        input.name,
      kind:        input.kind,
      required:    input.required,
      status:      input.status,
      number:      input.number,
      issue_date:  input.issue_date,
      expiry_date: input.expiry_date,
      notes:       input.notes,
      link:        input.link,
      custom:      input.custom,
      created_at:  now,
      updated_at:  None,
    }
    .validate(now.date_naive())
  }

  fn patched(&self, patch: DocumentPatch, now: DateTime<Utc>) -> Result<Self> {
    let mut next = self.clone();
    set(&mut next.name, patch.name);
    set(&mut next.kind, patch.kind);
    set(&mut next.required, patch.required);
    set(&mut next.status, patch.status);
    set_opt(&mut next.number, patch.number);
    set_opt(&mut next.issue_date, patch.issue_date);
    set_opt(&mut next.expiry_date, patch.expiry_date);
    set_opt(&mut next.notes, patch.notes);
    set_opt(&mut next.link, patch.link);
    next.updated_at = Some(now);
    next.validate(now.date_naive())
  }

  fn validated(self, now: DateTime<Utc>) -> Result<Self> { self.validate(now.date_naive()) }

  fn collection(trip: &Trip) -> &Vec<Self> { &trip.documents }

  fn collection_mut(trip: &mut Trip) -> &mut Vec<Self> { &mut trip.documents }
}

// ─── Review ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub id:         Uuid,
  /// 1 (worst) to 5 (best).
  pub rating:     u8,
  pub title:      String,
  pub comment:    Option<String>,
  pub author:     String,
  pub date:       NaiveDate,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
  pub rating:  u8,
  pub title:   String,
  #[serde(default)]
  pub comment: Option<String>,
  pub author:  String,
  pub date:    NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
  pub rating:  Option<u8>,
  pub title:   Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub comment: Option<Option<String>>,
  pub author:  Option<String>,
  pub date:    Option<NaiveDate>,
}

impl Review {
  fn validate(self) -> Result<Self> {
    if !(1..=5).contains(&self.rating) {
      return Err(invalid("review rating must be between 1 and 5"));
    }
    require_text("review title", &self.title)?;
    Ok(self)
  }
}

impl TripItem for Review {
  type New = NewReview;
  type Patch = ReviewPatch;

  const COLLECTION: Collection = Collection::Reviews;

  fn id(&self) -> Uuid { self.id }

  fn create(input: NewReview, now: DateTime<Utc>) -> Result<Self> {
    Review {
      id:         Uuid::new_v4(),
      rating:     input.rating,
      title:      input.title,
      comment:    input.comment,
      author:     input.author,
      date:       input.date,
      created_at: now,
      updated_at: None,
    }
    .validate()
  }

  fn patched(&self, patch: ReviewPatch, now: DateTime<Utc>) -> Result<Self> {
    let mut next = self.clone();
    set(&mut next.rating, patch.rating);
    set(&mut next.title, patch.title);
    set_opt(&mut next.comment, patch.comment);
    set(&mut next.author, patch.author);
    set(&mut next.date, patch.date);
    next.updated_at = Some(now);
    next.validate()
  }

  fn validated(self, _now: DateTime<Utc>) -> Result<Self> { self.validate() }

  fn collection(trip: &Trip) -> &Vec<Self> { &trip.reviews }

  fn collection_mut(trip: &mut Trip) -> &mut Vec<Self> { &mut trip.reviews }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  #[test]
  fn zero_duration_activity_is_rejected() {
    let err = Activity::create(
      NewActivity::new("Louvre", ActivityKind::Sightseeing, 0),
      Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn expense_currency_is_normalized() {
    let expense = Expense::create(
      NewExpense {
        description:    "Dinner".into(),
        amount:         45.0,
        currency:       " eur ".into(),
        category:       ExpenseCategory::Food,
        date:           date("2025-06-02"),
        payment_method: None,
        notes:          None,
      },
      Utc::now(),
    )
    .unwrap();
    assert_eq!(expense.currency, "EUR");
  }

  #[test]
  fn expense_patch_rejecting_amount_leaves_original_untouched() {
    let original = Expense::create(
      NewExpense {
        description:    "Taxi".into(),
        amount:         20.0,
        currency:       "EUR".into(),
        category:       ExpenseCategory::Transportation,
        date:           date("2025-06-01"),
        payment_method: Some("card".into()),
        notes:          None,
      },
      Utc::now(),
    )
    .unwrap();

    let patch = ExpensePatch { amount: Some(-5.0), ..Default::default() };
    assert!(original.patched(patch, Utc::now()).is_err());
    assert_eq!(original.amount, 20.0);
    assert!(original.updated_at.is_none());
  }

  #[test]
  fn review_rating_bounds() {
    let review = |rating| NewReview {
      rating,
      title: "Great".into(),
      comment: None,
      author: "me".into(),
      date: date("2025-06-05"),
    };
    assert!(Review::create(review(0), Utc::now()).is_err());
    assert!(Review::create(review(6), Utc::now()).is_err());
    assert!(Review::create(review(5), Utc::now()).is_ok());
  }

  #[test]
  fn document_status_from_expiry() {
    let today = date("2025-06-01");
    assert_eq!(
      DocumentStatus::from_expiry(date("2025-05-31"), today),
      DocumentStatus::Expired
    );
    assert_eq!(
      DocumentStatus::from_expiry(date("2025-06-20"), today),
      DocumentStatus::ExpiringSoon
    );
    assert_eq!(
      DocumentStatus::from_expiry(date("2026-01-01"), today),
      DocumentStatus::Valid
    );
  }

  #[test]
  fn uploaded_document_status_follows_expiry() {
    let now = Utc::now();
    let today = now.date_naive();
    let passport = |status, expiry| NewDocument {
      status,
      expiry_date: Some(expiry),
      ..NewDocument::new("Passport", DocumentKind::Passport, true)
    };

    let expired = Document::create(
      passport(DocumentStatus::Valid, today - chrono::Days::new(1)),
      now,
    )
    .unwrap();
    assert_eq!(expired.status, DocumentStatus::Expired);

    let pending = Document::create(
      passport(DocumentStatus::NotUploaded, today - chrono::Days::new(1)),
      now,
    )
    .unwrap();
    assert_eq!(pending.status, DocumentStatus::NotUploaded);

    let renewed = expired
      .patched(
        DocumentPatch {
          expiry_date: Some(Some(today + chrono::Days::new(365))),
          ..Default::default()
        },
        now,
      )
      .unwrap();
    assert_eq!(renewed.status, DocumentStatus::Valid);
  }

  #[test]
  fn duplicate_ids_in_a_replacement_are_rejected() {
    let review = Review::create(
      NewReview {
        rating:  4,
        title:   "Nice".into(),
        comment: None,
        author:  "me".into(),
        date:    date("2025-06-05"),
      },
      Utc::now(),
    )
    .unwrap();
    assert!(validate_all(vec![review.clone()], Utc::now()).is_ok());
    assert!(matches!(
      validate_all(vec![review.clone(), review], Utc::now()),
      Err(Error::Validation(_))
    ));
  }

  #[test]
  fn activity_location_accepts_text_or_coordinates() {
    let text: ActivityLocation = serde_json::from_str(r#""Rue de Rivoli""#).unwrap();
    let coords: ActivityLocation =
      serde_json::from_str(r#"{"lat":48.86,"lng":2.33}"#).unwrap();
    assert_eq!(text, ActivityLocation::Text("Rue de Rivoli".into()));
    assert_eq!(
      coords,
      ActivityLocation::Coordinates(Coordinate { lat: 48.86, lng: 2.33 })
    );
  }
}
