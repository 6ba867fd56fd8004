//! Currency conversion over cached per-base rate tables.
//!
//! Conversion never fails: a fetch failure falls back to the last table for
//! that base, or to an identity table when there is none.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
  time::{Duration, Instant},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::ProviderError, item::Expense};

/// How long a fetched table is served without refetching.
pub const DEFAULT_RATE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Source of exchange rates. `rates("USD")["EUR"]` is the number of euros
/// per dollar.
#[async_trait]
pub trait RateProvider: Send + Sync {
  async fn rates(&self, base: &str) -> Result<HashMap<String, f64>, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
  /// Fetched within the TTL.
  Fresh,
  /// Refresh failed; an expired table is served.
  Stale,
  /// No table was ever fetched for this base; every rate is 1.
  Identity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
  pub base:      String,
  pub rates:     HashMap<String, f64>,
  pub freshness: Freshness,
}

impl RateTable {
  /// Rate from `base` to `code`; missing codes convert 1:1.
  pub fn rate(&self, code: &str) -> f64 {
    if code == self.base {
      return 1.0;
    }
    match self.rates.get(code) {
      Some(rate) => *rate,
      None => {
        tracing::warn!(base = %self.base, %code, "no rate for currency; converting 1:1");
        1.0
      }
    }
  }
}

struct CachedRates {
  rates:      HashMap<String, f64>,
  fetched_at: Instant,
}

pub struct CurrencyConverter {
  provider: Arc<dyn RateProvider>,
  ttl:      Duration,
  cache:    Mutex<HashMap<String, CachedRates>>,
}

fn normalize(code: &str) -> String { code.trim().to_ascii_uppercase() }

impl CurrencyConverter {
  pub fn new(provider: Arc<dyn RateProvider>) -> Self {
    Self {
      provider,
      ttl: DEFAULT_RATE_TTL,
      cache: Mutex::new(HashMap::new()),
    }
  }

  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  /// The table for `base`, refreshed if the cached one is missing or
  /// expired.
  pub async fn rates(&self, base: &str) -> RateTable {
    let base = normalize(base);

    let cached = {
      let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
      cache
        .get(&base)
        .map(|c| (c.rates.clone(), c.fetched_at.elapsed() < self.ttl))
    };

    if let Some((rates, true)) = &cached {
      tracing::debug!(%base, "rate cache hit");
      return RateTable { base, rates: rates.clone(), freshness: Freshness::Fresh };
    }

    match self.provider.rates(&base).await {
      Ok(rates) => {
        tracing::debug!(%base, count = rates.len(), "fetched exchange rates");
        self
          .cache
          .lock()
          .unwrap_or_else(PoisonError::into_inner)
          .insert(base.clone(), CachedRates { rates: rates.clone(), fetched_at: Instant::now() });
        RateTable { base, rates, freshness: Freshness::Fresh }
      }
      Err(e) => match cached {
        Some((rates, _)) => {
          tracing::warn!(%base, error = %e, "rate refresh failed; serving stale table");
          RateTable { base, rates, freshness: Freshness::Stale }
        }
        None => {
          tracing::warn!(%base, error = %e, "rate fetch failed; converting 1:1");
          RateTable { base, rates: HashMap::new(), freshness: Freshness::Identity }
        }
      },
    }
  }

  /// Convert `amount` from one currency to another. Equal codes return the
  /// amount without consulting the provider.
  pub async fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
    let (from, to) = (normalize(from), normalize(to));
    if from == to {
      return amount;
    }
    amount * self.rates(&from).await.rate(&to)
  }

  /// Sum of `expenses` expressed in `target`.
  pub async fn total_in(&self, expenses: &[Expense], target: &str) -> f64 {
    let mut total = 0.0;
    for e in expenses {
      total += self.convert(e.amount, &e.currency, target).await;
    }
    total
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

  use chrono::{NaiveDate, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::item::ExpenseCategory;

  struct Counting {
    calls:   AtomicUsize,
    failing: AtomicBool,
  }

  impl Counting {
    fn new() -> Arc<Self> {
      Arc::new(Self { calls: AtomicUsize::new(0), failing: AtomicBool::new(false) })
    }

    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
  }

  #[async_trait]
  impl RateProvider for Counting {
    async fn rates(&self, base: &str) -> Result<HashMap<String, f64>, ProviderError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if self.failing.load(Ordering::SeqCst) {
        return Err(ProviderError::Http("offline".into()));
      }
      assert_eq!(base, "USD");
      Ok(HashMap::from([("EUR".to_owned(), 0.5), ("JPY".to_owned(), 100.0)]))
    }
  }

  #[tokio::test]
  async fn same_currency_skips_the_provider() {
    let provider = Counting::new();
    let converter = CurrencyConverter::new(provider.clone());
    assert_eq!(converter.convert(100.0, "USD", "usd").await, 100.0);
    assert_eq!(provider.calls(), 0);
  }

  #[tokio::test]
  async fn tables_are_cached_within_ttl() {
    let provider = Counting::new();
    let converter = CurrencyConverter::new(provider.clone());
    assert_eq!(converter.convert(10.0, "usd", "eur").await, 5.0);
    assert_eq!(converter.convert(2.0, "USD", "JPY").await, 200.0);
    assert_eq!(provider.calls(), 1);
  }

  #[tokio::test]
  async fn failed_refresh_serves_stale_table() {
    let provider = Counting::new();
    let converter = CurrencyConverter::new(provider.clone()).with_ttl(Duration::ZERO);
    assert_eq!(converter.rates("USD").await.freshness, Freshness::Fresh);

    provider.failing.store(true, Ordering::SeqCst);
    let table = converter.rates("USD").await;
    assert_eq!(table.freshness, Freshness::Stale);
    assert_eq!(converter.convert(10.0, "USD", "EUR").await, 5.0);
    assert_eq!(provider.calls(), 3);
  }

  #[tokio::test]
  async fn no_table_at_all_converts_one_to_one() {
    let provider = Counting::new();
    provider.failing.store(true, Ordering::SeqCst);
    let converter = CurrencyConverter::new(provider);
    assert_eq!(converter.rates("USD").await.freshness, Freshness::Identity);
    assert_eq!(converter.convert(42.0, "USD", "EUR").await, 42.0);
  }

  #[tokio::test]
  async fn unknown_target_converts_one_to_one() {
    let converter = CurrencyConverter::new(Counting::new());
    assert_eq!(converter.convert(7.0, "USD", "XYZ").await, 7.0);
  }

  #[tokio::test]
  async fn total_in_converts_each_expense() {
    let expense = |amount: f64, currency: &str| Expense {
      id: Uuid::new_v4(),
      description: "x".into(),
      amount,
      currency: currency.into(),
      category: ExpenseCategory::Food,
      date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
      payment_method: None,
      notes: None,
      created_at: Utc::now(),
      updated_at: None,
    };
    let converter = CurrencyConverter::new(Counting::new());
    let total = converter
      .total_in(&[expense(10.0, "USD"), expense(20.0, "USD")], "EUR")
      .await;
    assert_eq!(total, 15.0);
  }
}
