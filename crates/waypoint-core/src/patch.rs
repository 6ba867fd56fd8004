//! Helpers shared by the typed patch structures.
//!
//! A patch carries one optional field per mutable attribute. For attributes
//! that are themselves optional, the field is an `Option<Option<T>>`: absent
//! keeps the current value, `null` clears it, and a value replaces it.

use serde::{Deserialize, Deserializer};

/// Deserialize a present field (including an explicit `null`) as `Some(..)`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn double_option<'de, T, D>(
  deserializer: D,
) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

/// Overwrite `target` when the patch carries a value.
pub(crate) fn set<T>(target: &mut T, value: Option<T>) {
  if let Some(v) = value {
    *target = v;
  }
}

/// Overwrite or clear an optional attribute when the patch mentions it.
pub(crate) fn set_opt<T>(target: &mut Option<T>, value: Option<Option<T>>) {
  if let Some(v) = value {
    *target = v;
  }
}
