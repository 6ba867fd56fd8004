//! Placeholder markers used when no live provider produced anything.
//!
//! Coordinates are jittered around the center using a SHA-256 digest of the
//! destination and marker index, so the same request always yields the same
//! markers.

use serde_json::json;
use sha2::{Digest, Sha256};

use super::{Coordinate, PlaceCategory, PlaceMarker};

pub const SYNTHETIC_MARKER_COUNT: usize = 8;

/// Maximum offset from the center in degrees, per axis.
pub const JITTER_DEGREES: f64 = 0.02;

pub const SYNTHETIC_SOURCE: &str = "synthetic";

const ROTATION: [PlaceCategory; 4] = [
  PlaceCategory::Attraction,
  PlaceCategory::Restaurant,
  PlaceCategory::Hotel,
  PlaceCategory::Activity,
];

fn category_title(category: PlaceCategory) -> &'static str {
  match category {
    PlaceCategory::Activity => "Activity",
    PlaceCategory::Hotel => "Hotel",
    PlaceCategory::Restaurant => "Restaurant",
    PlaceCategory::Attraction => "Attraction",
    PlaceCategory::Expense => "Expense",
    PlaceCategory::Other => "Place",
  }
}

/// Map two digest bytes onto `[-JITTER_DEGREES, JITTER_DEGREES]`.
fn jitter(hi: u8, lo: u8) -> f64 {
  let unit = f64::from(u16::from_be_bytes([hi, lo])) / f64::from(u16::MAX);
  (unit * 2.0 - 1.0) * JITTER_DEGREES
}

/// Generate [`SYNTHETIC_MARKER_COUNT`] markers around `center`.
///
/// With a `category` every marker has that category; otherwise categories
/// rotate through attractions, restaurants, hotels and activities.
pub fn synthetic_markers(
  destination: &str,
  center: Coordinate,
  category: Option<PlaceCategory>,
) -> Vec<PlaceMarker> {
  let seed = destination.trim().to_lowercase();
  let label = if seed.is_empty() { "Sample" } else { destination.trim() };

  (0..SYNTHETIC_MARKER_COUNT)
    .map(|i| {
      let digest = Sha256::new()
        .chain_update(seed.as_bytes())
        .chain_update((i as u64).to_le_bytes())
        .finalize();
      let category = category.unwrap_or(ROTATION[i % ROTATION.len()]);

      PlaceMarker {
        id:         format!("{SYNTHETIC_SOURCE}-{}", hex::encode(&digest[..6])),
        title:      format!("{label} {} {}", category_title(category), i + 1),
        category,
        coordinate: Coordinate {
          lat: center.lat + jitter(digest[0], digest[1]),
          lng: center.lng + jitter(digest[2], digest[3]),
        },
        rating:     Some(3.5 + f64::from(digest[4] % 16) / 10.0),
        address:    None,
        source:     SYNTHETIC_SOURCE.to_owned(),
        payload:    json!({ "synthetic": true }),
      }
    })
    .collect()
}
