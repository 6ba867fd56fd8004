//! [`ItineraryStore`]: the trip aggregate store.
//!
//! Owns the trip list and the current selection. Every mutation takes the
//! single writer lock, applies the change in memory and writes the full trip
//! list back through the [`RecordStore`] before returning.

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
  Error, Result,
  item::{
    Activity, ActivityPatch, Document, DocumentPatch, Expense, ExpensePatch,
    NewActivity, NewDocument, NewExpense, NewReview, Review, ReviewPatch,
    TripItem,
  },
  ledger::ExpenseSummary,
  packing::PackingCategory,
  store::RecordStore,
  trip::{NewTrip, Trip, TripPatch},
};

/// Name of the record holding the serialized trip list.
pub const TRIPS_RECORD: &str = "trips";

#[derive(Debug, Default)]
struct Itinerary {
  trips:    Vec<Trip>,
  selected: Option<Uuid>,
}

impl Itinerary {
  fn trip(&self, id: Uuid) -> Result<&Trip> {
    self.trips.iter().find(|t| t.id == id).ok_or(Error::TripNotFound(id))
  }

  fn trip_mut(&mut self, id: Uuid) -> Result<&mut Trip> {
    self
      .trips
      .iter_mut()
      .find(|t| t.id == id)
      .ok_or(Error::TripNotFound(id))
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The single writer for all trip state.
///
/// Construct once per session and share by reference (or `Arc`). Mutations
/// are serialized; reads return owned snapshots.
pub struct ItineraryStore<R> {
  records:     R,
  record_name: String,
  state:       Mutex<Itinerary>,
}

impl<R: RecordStore> ItineraryStore<R> {
  /// Load the trip list from [`TRIPS_RECORD`] in `records`.
  pub async fn open(records: R) -> Result<Self> {
    Self::open_named(records, TRIPS_RECORD).await
  }

  /// Load the trip list from a custom record name.
  ///
  /// An absent record is an empty list. The first trip, if any, starts out
  /// selected.
  pub async fn open_named(records: R, name: impl Into<String>) -> Result<Self> {
    let record_name = name.into();
    let record = records
      .load(&record_name)
      .await
      .map_err(|e| Error::Persistence(Box::new(e)))?;

    let trips: Vec<Trip> = match record {
      Some(r) => serde_json::from_value(r.value)?,
      None => Vec::new(),
    };
    tracing::info!(record = %record_name, trips = trips.len(), "itinerary loaded");

    let selected = trips.first().map(|t| t.id);
    Ok(Self {
      records,
      record_name,
      state: Mutex::new(Itinerary { trips, selected }),
    })
  }

  /// Write the whole trip list. On failure the in-memory state is kept.
  async fn persist(&self, state: &Itinerary) -> Result<()> {
    let value = serde_json::to_value(&state.trips)?;
    match self.records.save(&self.record_name, value).await {
      Ok(record) => {
        tracing::debug!(revision = record.revision, "itinerary persisted");
        Ok(())
      }
      Err(e) => {
        tracing::error!(error = %e, "itinerary write failed; keeping in-memory state");
        Err(Error::Persistence(Box::new(e)))
      }
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All trips in insertion order.
  pub async fn trips(&self) -> Vec<Trip> { self.state.lock().await.trips.clone() }

  pub async fn trip(&self, id: Uuid) -> Option<Trip> {
    self.state.lock().await.trip(id).ok().cloned()
  }

  pub async fn selected_trip(&self) -> Option<Trip> {
    let state = self.state.lock().await;
    state.selected.and_then(|id| state.trip(id).ok().cloned())
  }

  /// Select `id` as the current trip. Selection is session state and is not
  /// persisted.
  pub async fn select_trip(&self, id: Uuid) -> Result<Trip> {
    let mut state = self.state.lock().await;
    let trip = state.trip(id)?.clone();
    state.selected = Some(id);
    Ok(trip)
  }

  // ── Trips ─────────────────────────────────────────────────────────────

  /// Create a trip with empty collections, persist it and select it.
  pub async fn create_trip(&self, input: NewTrip) -> Result<Trip> {
    let trip = input.into_trip(Utc::now())?;
    let mut state = self.state.lock().await;
    state.trips.push(trip.clone());
    state.selected = Some(trip.id);
    tracing::info!(trip_id = %trip.id, destination = %trip.destination, "trip created");
    self.persist(&state).await?;
    Ok(trip)
  }

  /// Merge `patch` into the trip. An empty patch only stamps `updated_at`.
  pub async fn update_trip(&self, id: Uuid, patch: TripPatch) -> Result<Trip> {
    let mut state = self.state.lock().await;
    let trip = state.trip_mut(id)?;
    *trip = patch.apply(trip, Utc::now())?;
    let updated = trip.clone();
    self.persist(&state).await?;
    Ok(updated)
  }

  /// Remove a trip and everything it owns. If it was selected, the first
  /// remaining trip becomes selected.
  pub async fn delete_trip(&self, id: Uuid) -> Result<()> {
    let mut state = self.state.lock().await;
    let index = state
      .trips
      .iter()
      .position(|t| t.id == id)
      .ok_or(Error::TripNotFound(id))?;
    state.trips.remove(index);
    if state.selected == Some(id) {
      state.selected = state.trips.first().map(|t| t.id);
    }
    tracing::info!(trip_id = %id, "trip deleted");
    self.persist(&state).await
  }

  /// Attach (or with `None`, detach) a generated packing list.
  pub async fn attach_packing_list(
    &self,
    id: Uuid,
    list: Option<Vec<PackingCategory>>,
  ) -> Result<Trip> {
    self
      .update_trip(id, TripPatch { packing_list: Some(list), ..Default::default() })
      .await
  }

  // ── Nested items ──────────────────────────────────────────────────────

  /// Validate `input` and append it to the trip's `T` collection.
  pub async fn add_item<T: TripItem>(&self, trip_id: Uuid, input: T::New) -> Result<T> {
    let item = T::create(input, Utc::now())?;
    let mut state = self.state.lock().await;
    T::collection_mut(state.trip_mut(trip_id)?).push(item.clone());
    tracing::debug!(%trip_id, item_id = %item.id(), collection = %T::COLLECTION, "item added");
    self.persist(&state).await?;
    Ok(item)
  }

  /// Patch one item in place. A failed validation leaves it untouched.
  pub async fn update_item<T: TripItem>(
    &self,
    trip_id: Uuid,
    item_id: Uuid,
    patch: T::Patch,
  ) -> Result<T> {
    let mut state = self.state.lock().await;
    let items = T::collection_mut(state.trip_mut(trip_id)?);
    let slot = items
      .iter_mut()
      .find(|i| i.id() == item_id)
      .ok_or(Error::ItemNotFound { collection: T::COLLECTION, id: item_id })?;
    *slot = slot.patched(patch, Utc::now())?;
    let updated = slot.clone();
    self.persist(&state).await?;
    Ok(updated)
  }

  pub async fn delete_item<T: TripItem>(&self, trip_id: Uuid, item_id: Uuid) -> Result<()> {
    let mut state = self.state.lock().await;
    let items = T::collection_mut(state.trip_mut(trip_id)?);
    let index = items
      .iter()
      .position(|i| i.id() == item_id)
      .ok_or(Error::ItemNotFound { collection: T::COLLECTION, id: item_id })?;
    items.remove(index);
    self.persist(&state).await
  }

  /// Snapshot of the trip's `T` collection in its listing order.
  pub async fn items<T: TripItem>(&self, trip_id: Uuid) -> Result<Vec<T>> {
    let state = self.state.lock().await;
    Ok(T::listing_order(T::collection(state.trip(trip_id)?).clone()))
  }

  pub async fn add_activity(&self, trip_id: Uuid, input: NewActivity) -> Result<Activity> {
    self.add_item(trip_id, input).await
  }

  pub async fn update_activity(
    &self,
    trip_id: Uuid,
    activity_id: Uuid,
    patch: ActivityPatch,
  ) -> Result<Activity> {
    self.update_item(trip_id, activity_id, patch).await
  }

  pub async fn delete_activity(&self, trip_id: Uuid, activity_id: Uuid) -> Result<()> {
    self.delete_item::<Activity>(trip_id, activity_id).await
  }

  pub async fn add_expense(&self, trip_id: Uuid, input: NewExpense) -> Result<Expense> {
    self.add_item(trip_id, input).await
  }

  pub async fn update_expense(
    &self,
    trip_id: Uuid,
    expense_id: Uuid,
    patch: ExpensePatch,
  ) -> Result<Expense> {
    self.update_item(trip_id, expense_id, patch).await
  }

  pub async fn delete_expense(&self, trip_id: Uuid, expense_id: Uuid) -> Result<()> {
    self.delete_item::<Expense>(trip_id, expense_id).await
  }

  /// The expense ledger of one trip, newest date first.
  pub async fn expenses(&self, trip_id: Uuid) -> Result<Vec<Expense>> {
    self.items(trip_id).await
  }

  pub async fn expense_summary(&self, trip_id: Uuid) -> Result<ExpenseSummary> {
    let expenses: Vec<Expense> = self.items(trip_id).await?;
    Ok(ExpenseSummary::from_expenses(&expenses))
  }

  pub async fn add_document(&self, trip_id: Uuid, input: NewDocument) -> Result<Document> {
    self.add_item(trip_id, input).await
  }

  pub async fn update_document(
    &self,
    trip_id: Uuid,
    document_id: Uuid,
    patch: DocumentPatch,
  ) -> Result<Document> {
    self.update_item(trip_id, document_id, patch).await
  }

  pub async fn delete_document(&self, trip_id: Uuid, document_id: Uuid) -> Result<()> {
    self.delete_item::<Document>(trip_id, document_id).await
  }

  pub async fn add_review(&self, trip_id: Uuid, input: NewReview) -> Result<Review> {
    self.add_item(trip_id, input).await
  }

  pub async fn update_review(
    &self,
    trip_id: Uuid,
    review_id: Uuid,
    patch: ReviewPatch,
  ) -> Result<Review> {
    self.update_item(trip_id, review_id, patch).await
  }

  pub async fn delete_review(&self, trip_id: Uuid, review_id: Uuid) -> Result<()> {
    self.delete_item::<Review>(trip_id, review_id).await
  }
}
