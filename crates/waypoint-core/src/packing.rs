//! Packing list generation.
//!
//! [`generate_packing_list`] is a pure function of the trip and an optional
//! weather snapshot. Category and item order are fixed so regenerating with
//! the same inputs yields an identical list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
  trip::{Trip, TripKind},
  weather::{WeatherProvider, WeatherSnapshot},
};

/// Upper bound for any length-scaled quantity.
pub const MAX_ITEM_QUANTITY: u32 = 7;

/// Above this temperature (°C) sun protection is added.
pub const HEAT_THRESHOLD_C: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingItem {
  pub name:      String,
  pub quantity:  u32,
  #[serde(default)]
  pub packed:    bool,
  #[serde(default)]
  pub essential: bool,
  #[serde(default)]
  pub notes:     Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingCategory {
  pub name:  String,
  pub items: Vec<PackingItem>,
}

impl PackingCategory {
  fn new(name: &str) -> Self { Self { name: name.to_owned(), items: Vec::new() } }

  fn add(&mut self, name: &str, quantity: u32) -> &mut Self {
    self.items.push(PackingItem {
      name: name.to_owned(),
      quantity: quantity.max(1),
      packed: false,
      essential: false,
      notes: None,
    });
    self
  }

  fn essential(&mut self, name: &str, quantity: u32) -> &mut Self {
    self.add(name, quantity);
    if let Some(item) = self.items.last_mut() {
      item.essential = true;
    }
    self
  }

  fn note(&mut self, notes: &str) -> &mut Self {
    if let Some(item) = self.items.last_mut() {
      item.notes = Some(notes.to_owned());
    }
    self
  }

  pub fn contains(&self, item: &str) -> bool { self.items.iter().any(|i| i.name == item) }
}

/// Temperature bands driving the clothing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
  /// Below 10 °C.
  Cold,
  /// 10 °C to 20 °C; also used when there is no weather signal.
  Mild,
  /// Above 20 °C.
  Warm,
}

impl TemperatureBand {
  pub fn from_celsius(t: f64) -> Self {
    if t < 10.0 {
      Self::Cold
    } else if t <= 20.0 {
      Self::Mild
    } else {
      Self::Warm
    }
  }
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// Build a categorized packing list for `trip`.
///
/// Without weather the mild band is used and no condition-specific items are
/// added.
pub fn generate_packing_list(
  trip: &Trip,
  weather: Option<&WeatherSnapshot>,
) -> Vec<PackingCategory> {
  let days = trip.duration_days();
  let travelers = trip.traveler_count();
  let daily = days.min(MAX_ITEM_QUANTITY);
  let layered = days.div_ceil(2).min(MAX_ITEM_QUANTITY);
  let band = weather.map_or(TemperatureBand::Mild, |w| {
    TemperatureBand::from_celsius(w.temperature_c)
  });

  let mut documents = PackingCategory::new("Documents");
  documents
    .essential("Passport", 1)
    .essential("Visa", 1)
    .note("Check entry requirements for your destination")
    .essential("Travel Insurance", 1)
    .essential("Flight Tickets", 1)
    .essential("Hotel Reservations", 1)
    .essential("ID Card", 1);

  let mut clothing = PackingCategory::new("Clothing");
  clothing
    .add("Underwear", daily)
    .add("Socks", daily)
    .add("Sleepwear", 1)
    .add("Comfortable Walking Shoes", 1);
  match band {
    TemperatureBand::Cold => {
      clothing
        .essential("Warm Jacket", 1)
        .add("Sweaters", layered)
        .add("Thermal Underwear", layered)
        .add("Long Pants", layered)
        .add("Gloves", 1)
        .add("Scarf", 1);
    }
    TemperatureBand::Mild => {
      clothing
        .add("Light Jacket", 1)
        .add("Long-sleeve Shirts", layered)
        .add("T-shirts", layered)
        .add("Pants", layered)
        .add("Sweater", 1);
    }
    TemperatureBand::Warm => {
      clothing
        .add("T-shirts", daily)
        .add("Shorts", layered)
        .add("Swimwear", 1)
        .add("Sun Hat", 1)
        .add("Sandals", 1);
    }
  }
  if trip.trip_type == Some(TripKind::Business) {
    clothing.add("Business Attire", layered).add("Dress Shoes", 1);
  }

  let mut accessories = PackingCategory::new("Accessories");
  if let Some(w) = weather {
    if w.condition_mentions("rain") {
      accessories
        .essential("Umbrella", 1)
        .add("Rain Jacket", 1)
        .add("Waterproof Shoes", 1);
    }
    if w.condition_mentions("snow") {
      accessories.add("Winter Boots", 1).add("Warm Hat", 1);
    }
    if w.temperature_c > HEAT_THRESHOLD_C {
      accessories.essential("Sunscreen", 1).add("Sunglasses", 1);
    }
  }
  match trip.trip_type {
    Some(TripKind::Adventure) => {
      accessories
        .add("Hiking Boots", 1)
        .add("Daypack", 1)
        .add("Water Bottle", 1);
    }
    Some(TripKind::Family) => {
      accessories.add("Snacks", 1).add("Travel Games", 1);
    }
    _ => {}
  }

  let mut toiletries = PackingCategory::new("Toiletries");
  toiletries
    .add("Toothbrush", travelers)
    .add("Toothpaste", 1)
    .add("Deodorant", travelers)
    .add("Shampoo", 1);

  let mut electronics = PackingCategory::new("Electronics");
  electronics
    .essential("Phone Charger", 1)
    .add("Power Adapter", 1)
    .add("Power Bank", 1)
    .add("Headphones", travelers);
  if trip.trip_type == Some(TripKind::Business) {
    electronics.add("Laptop", 1).add("Laptop Charger", 1);
  }

  let mut health = PackingCategory::new("Health");
  health
    .add("First Aid Kit", 1)
    .essential("Prescription Medications", travelers)
    .add("Pain Relievers", 1)
    .add("Hand Sanitizer", 1);

  let mut categories = vec![documents, clothing];
  if !accessories.items.is_empty() {
    categories.push(accessories);
  }
  categories.extend([toiletries, electronics, health]);
  categories
}

/// Fetch current weather for the trip destination and generate a list.
///
/// A weather failure is logged and treated as "no weather signal".
pub async fn packing_list_with_weather(
  trip: &Trip,
  weather: &dyn WeatherProvider,
) -> Vec<PackingCategory> {
  let snapshot = match weather.current_weather(&trip.destination).await {
    Ok(w) => Some(w),
    Err(e) => {
      tracing::warn!(destination = %trip.destination, error = %e, "weather unavailable; using neutral band");
      None
    }
  };
  generate_packing_list(trip, snapshot.as_ref())
}

/// Carry `packed` flags from a previous list onto a regenerated one, matching
/// by category and item name. Items that disappeared are dropped.
pub fn carry_over_packed(
  previous: &[PackingCategory],
  mut fresh: Vec<PackingCategory>,
) -> Vec<PackingCategory> {
  let packed: HashSet<(&str, &str)> = previous
    .iter()
    .flat_map(|c| {
      c.items
        .iter()
        .filter(|i| i.packed)
        .map(move |i| (c.name.as_str(), i.name.as_str()))
    })
    .collect();

  for category in &mut fresh {
    for item in &mut category.items {
      if packed.contains(&(category.name.as_str(), item.name.as_str())) {
        item.packed = true;
      }
    }
  }
  fresh
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;
  use chrono::{NaiveDate, Utc};

  use super::*;
  use crate::{error::ProviderError, trip::NewTrip};

  fn trip(days: u32) -> Trip {
    let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let end = start + chrono::Days::new(u64::from(days - 1));
    NewTrip::new("Paris").dates(start, end).into_trip(Utc::now()).unwrap()
  }

  fn find<'a>(list: &'a [PackingCategory], category: &str) -> Option<&'a PackingCategory> {
    list.iter().find(|c| c.name == category)
  }

  fn has(list: &[PackingCategory], item: &str) -> bool {
    list.iter().any(|c| c.contains(item))
  }

  fn quantity(list: &[PackingCategory], item: &str) -> u32 {
    list
      .iter()
      .flat_map(|c| &c.items)
      .find(|i| i.name == item)
      .map(|i| i.quantity)
      .unwrap_or(0)
  }

  #[test]
  fn generation_is_deterministic() {
    let t = trip(5);
    let w = WeatherSnapshot::new(14.0, "light rain");
    let a = serde_json::to_string(&generate_packing_list(&t, Some(&w))).unwrap();
    let b = serde_json::to_string(&generate_packing_list(&t, Some(&w))).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn cold_band_packs_warm_jacket_not_swimwear() {
    let list = generate_packing_list(&trip(5), Some(&WeatherSnapshot::new(5.0, "Clouds")));
    assert!(has(&list, "Warm Jacket"));
    assert!(!has(&list, "Swimwear"));
  }

  #[test]
  fn warm_band_packs_swimwear_and_sun_hat() {
    let list = generate_packing_list(&trip(5), Some(&WeatherSnapshot::new(30.0, "Clear")));
    assert!(has(&list, "Swimwear"));
    assert!(has(&list, "Sun Hat"));
    assert!(!has(&list, "Warm Jacket"));
    assert!(has(&list, "Sunscreen"));
  }

  #[test]
  fn rain_adds_umbrella_at_any_temperature() {
    for t in [-5.0, 15.0, 32.0] {
      let list = generate_packing_list(&trip(3), Some(&WeatherSnapshot::new(t, "Heavy Rain")));
      let accessories = find(&list, "Accessories").expect("accessories category");
      assert!(accessories.contains("Umbrella"), "no umbrella at {t}°C");
    }
  }

  #[test]
  fn snow_adds_winter_gear() {
    let list = generate_packing_list(&trip(3), Some(&WeatherSnapshot::new(-2.0, "snow")));
    assert!(has(&list, "Winter Boots"));
    assert!(has(&list, "Warm Hat"));
  }

  #[test]
  fn no_weather_uses_mild_band_without_extras() {
    let list = generate_packing_list(&trip(4), None);
    assert!(has(&list, "Light Jacket"));
    assert!(find(&list, "Accessories").is_none());
    let names: Vec<_> = list.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
      names,
      ["Documents", "Clothing", "Toiletries", "Electronics", "Health"]
    );
  }

  #[test]
  fn category_order_with_extras() {
    let list = generate_packing_list(&trip(4), Some(&WeatherSnapshot::new(12.0, "rain")));
    let names: Vec<_> = list.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
      names,
      ["Documents", "Clothing", "Accessories", "Toiletries", "Electronics", "Health"]
    );
  }

  #[test]
  fn quantities_scale_with_length_and_are_capped() {
    let short = generate_packing_list(&trip(5), None);
    assert_eq!(quantity(&short, "Socks"), 5);
    assert_eq!(quantity(&short, "T-shirts"), 3);

    let long = generate_packing_list(&trip(21), None);
    assert_eq!(quantity(&long, "Socks"), MAX_ITEM_QUANTITY);
    assert_eq!(quantity(&long, "T-shirts"), MAX_ITEM_QUANTITY);
  }

  #[test]
  fn personal_items_scale_with_travelers_shared_items_do_not() {
    let mut t = trip(5);
    t.travelers = Some(3);
    let list = generate_packing_list(&t, None);
    assert_eq!(quantity(&list, "Toothbrush"), 3);
    assert_eq!(quantity(&list, "Deodorant"), 3);
    assert_eq!(quantity(&list, "Phone Charger"), 1);
    assert_eq!(quantity(&list, "First Aid Kit"), 1);
  }

  #[test]
  fn documents_do_not_depend_on_weather() {
    let cold = generate_packing_list(&trip(5), Some(&WeatherSnapshot::new(0.0, "snow")));
    let none = generate_packing_list(&trip(5), None);
    assert_eq!(find(&cold, "Documents"), find(&none, "Documents"));
  }

  #[test]
  fn business_trip_adds_attire_and_laptop() {
    let mut t = trip(3);
    t.trip_type = Some(TripKind::Business);
    let list = generate_packing_list(&t, None);
    assert!(find(&list, "Clothing").unwrap().contains("Business Attire"));
    assert!(find(&list, "Electronics").unwrap().contains("Laptop"));
  }

  #[test]
  fn carry_over_keeps_checked_items() {
    let t = trip(5);
    let mut previous = generate_packing_list(&t, None);
    previous[0].items[0].packed = true;

    let regenerated = carry_over_packed(&previous, generate_packing_list(&t, None));
    assert_eq!(regenerated, previous);
  }

  struct Offline;

  #[async_trait]
  impl WeatherProvider for Offline {
    async fn current_weather(&self, _place: &str) -> Result<WeatherSnapshot, ProviderError> {
      Err(ProviderError::Http("connection refused".into()))
    }
  }

  #[tokio::test]
  async fn weather_failure_falls_back_to_neutral_band() {
    let t = trip(5);
    let list = packing_list_with_weather(&t, &Offline).await;
    assert_eq!(list, generate_packing_list(&t, None));
  }
}
