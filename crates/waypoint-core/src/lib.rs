//! Core types and operations for the Waypoint trip planner.
//!
//! This crate holds the trip aggregate, the generators and the provider
//! traits. It has no HTTP or database dependencies; adapters for those live
//! in sibling crates and plug in through [`store::RecordStore`] and the
//! provider traits.

// Native `async fn` is used for `RecordStore`; dyn-dispatched providers go
// through `async_trait`.
#![allow(async_fn_in_trait)]

pub mod currency;
pub mod documents;
pub mod error;
pub mod item;
pub mod itinerary;
pub mod ledger;
pub mod location;
pub mod packing;
pub mod patch;
pub mod store;
pub mod trip;
pub mod weather;

pub use error::{Error, Result};
