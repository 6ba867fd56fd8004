//! Required-document checklist for a trip.
//!
//! A fixed baseline is always produced. A country lookup, when available and
//! successful, adds a visa and a roaming entry for international travel.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::ProviderError,
  item::{Document, DocumentKind, DocumentStatus},
  trip::Trip,
};

// ─── Country data ────────────────────────────────────────────────────────────

/// International dialling prefix, e.g. root `+3` with suffixes `["3"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialling {
  pub root:     String,
  pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryInfo {
  pub canonical_name: String,
  pub dialling:       Option<Dialling>,
}

#[async_trait]
pub trait CountryLookup: Send + Sync {
  async fn lookup_country(&self, name: &str) -> Result<CountryInfo, ProviderError>;
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// `(name, kind, required)` for the documents every trip needs.
const BASELINE: &[(&str, DocumentKind, bool)] = &[
  ("Passport", DocumentKind::Passport, true),
  ("Travel Insurance", DocumentKind::Insurance, true),
  ("Flight Tickets", DocumentKind::Ticket, true),
  ("Hotel Confirmations", DocumentKind::Reservation, false),
];

fn generated(name: &str, kind: DocumentKind, required: bool) -> Document {
  Document {
    id: Uuid::new_v4(),
    name: name.to_owned(),
    kind,
    required,
    status: DocumentStatus::NotUploaded,
    number: None,
    issue_date: None,
    expiry_date: None,
    notes: None,
    link: None,
    custom: false,
    created_at: Utc::now(),
    updated_at: None,
  }
}

/// The country part of a free-text destination: the last comma-separated
/// segment, so `"Paris, France"` looks up `"France"`.
pub fn country_hint(destination: &str) -> &str {
  destination.rsplit(',').next().unwrap_or(destination).trim()
}

/// Build the document checklist for `trip`.
///
/// Lookup failures degrade to the baseline; this never fails.
pub async fn required_documents(
  trip: &Trip,
  home_country: &str,
  lookup: Option<&dyn CountryLookup>,
) -> Vec<Document> {
  let mut documents: Vec<Document> = BASELINE
    .iter()
    .map(|(name, kind, required)| generated(name, kind.clone(), *required))
    .collect();

  let Some(lookup) = lookup else {
    return documents;
  };
  let hint = country_hint(&trip.destination);
  if hint.is_empty() {
    return documents;
  }

  let country = match lookup.lookup_country(hint).await {
    Ok(c) => c,
    Err(e) => {
      tracing::warn!(destination = %trip.destination, error = %e, "country lookup failed; baseline documents only");
      return documents;
    }
  };

  if !country.canonical_name.eq_ignore_ascii_case(home_country.trim()) {
    let mut visa = generated("Visa", DocumentKind::Visa, true);
    visa.notes = Some(format!("Entry requirements for {}", country.canonical_name));
    documents.push(visa);

    if country.dialling.is_some() {
      documents.push(generated(
        "International SIM/Roaming",
        DocumentKind::Other("sim".to_owned()),
        false,
      ));
    }
  }

  documents
}
