//! Gateway answering from recorded backend responses.
//!
//! Fixture files are TOML:
//!
//! ```toml
//! [[address]]
//! query = "1 Infinite Loop, Cupertino, CA 95014"
//! [address.result]
//! kind = "geocode"
//! latitude = 37.33
//! longitude = -122.03
//! accuracy = 8
//! components = { zip = "95014", city = "Cupertino", state = "CA" }
//!
//! [[address]]
//! query = "742 Evergreen Terrace"
//! country = "CA"
//! error = "connection reset"
//!
//! [[places]]
//! query = "742 Evergreen Terrace"
//! [places.result]
//! place_id = "ChIJ..."
//! partial_match = false
//! ```
//!
//! An entry without `result` records an empty answer. Queries with no
//! matching entry are also empty. Validation analyses are stored raw and
//! normalized on lookup, as a live gateway would.

use super::types::{AddressComponents, Analysis, GeocodeResult, RawAnalysis, ValidationResult};
use super::{LookupGateway, LookupOptions, PlacesLookupResult, PrimaryLookupResult};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// A primary result as recorded from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordedResult {
    /// Postal-validation answer.
    Validation {
        /// Raw analysis block.
        analysis: RawAnalysis,
        /// Standardized components.
        #[serde(default)]
        components: AddressComponents,
    },
    /// Geocoder answer.
    Geocode {
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
        /// Backend precision score.
        accuracy: f64,
        /// Parsed components.
        #[serde(default)]
        components: AddressComponents,
    },
}

impl RecordedResult {
    /// Normalize into the shape the verifier consumes.
    ///
    /// # Errors
    ///
    /// Returns a contract error if a validation analysis is unusable.
    pub fn normalize(&self) -> Result<PrimaryLookupResult> {
        match self {
            Self::Validation {
                analysis,
                components,
            } => Ok(PrimaryLookupResult::Validation(ValidationResult {
                analysis: Analysis::try_from(analysis)?,
                components: components.clone(),
            })),
            Self::Geocode {
                latitude,
                longitude,
                accuracy,
                components,
            } => Ok(PrimaryLookupResult::Geocode(GeocodeResult {
                latitude: *latitude,
                longitude: *longitude,
                accuracy: *accuracy,
                components: components.clone(),
            })),
        }
    }
}

/// A recorded primary lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressFixture {
    /// Query string. Matched trimmed and case-insensitively.
    pub query: String,
    /// Country constraint the lookup must have been sent with.
    #[serde(default)]
    pub country: Option<String>,
    /// Recorded answer.
    #[serde(default)]
    pub result: Option<RecordedResult>,
    /// Simulated transport failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// A recorded places lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesFixture {
    /// Query string. Matched trimmed and case-insensitively.
    pub query: String,
    /// Recorded answer.
    #[serde(default)]
    pub result: Option<PlacesLookupResult>,
    /// Simulated transport failure.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    address: Vec<AddressFixture>,
    #[serde(default)]
    places: Vec<PlacesFixture>,
}

/// In-memory gateway over recorded responses.
#[derive(Debug, Default)]
pub struct FixtureGateway {
    addresses: Vec<AddressFixture>,
    places: Vec<PlacesFixture>,
    address_calls: AtomicUsize,
    places_calls: AtomicUsize,
}

fn same_query(recorded: &str, query: &str) -> bool {
    recorded.trim().eq_ignore_ascii_case(query.trim())
}

fn same_country(recorded: Option<&str>, sent: Option<&str>) -> bool {
    match (recorded, sent) {
        (None, None) => true,
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

impl FixtureGateway {
    /// Create an empty gateway; every lookup is absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse fixtures from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid fixture file.
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: FixtureFile =
            toml::from_str(text).map_err(|e| Error::Config(format!("invalid fixtures: {e}")))?;
        Ok(Self {
            addresses: file.address,
            places: file.places,
            ..Self::default()
        })
    }

    /// Load fixtures from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Record a primary lookup answer.
    #[must_use]
    pub fn with_address(mut self, fixture: AddressFixture) -> Self {
        self.addresses.push(fixture);
        self
    }

    /// Record a places lookup answer.
    #[must_use]
    pub fn with_places(mut self, fixture: PlacesFixture) -> Self {
        self.places.push(fixture);
        self
    }

    /// Number of primary lookups served.
    #[must_use]
    pub fn address_calls(&self) -> usize {
        self.address_calls.load(Ordering::SeqCst)
    }

    /// Number of places lookups served.
    #[must_use]
    pub fn places_calls(&self) -> usize {
        self.places_calls.load(Ordering::SeqCst)
    }
}

impl LookupGateway for FixtureGateway {
    async fn lookup_address(
        &self,
        query: &str,
        options: &LookupOptions,
    ) -> Result<Option<PrimaryLookupResult>> {
        self.address_calls.fetch_add(1, Ordering::SeqCst);

        let Some(fixture) = self.addresses.iter().find(|f| {
            same_query(&f.query, query)
                && same_country(f.country.as_deref(), options.country.as_deref())
        }) else {
            debug!("No recorded {} answer for {query:?}", options.backend);
            return Ok(None);
        };

        if let Some(message) = &fixture.error {
            return Err(Error::Lookup(message.clone()));
        }
        fixture.result.as_ref().map(RecordedResult::normalize).transpose()
    }

    async fn lookup_places(&self, query: &str) -> Result<Option<PlacesLookupResult>> {
        self.places_calls.fetch_add(1, Ordering::SeqCst);

        let Some(fixture) = self.places.iter().find(|f| same_query(&f.query, query)) else {
            debug!("No recorded places answer for {query:?}");
            return Ok(None);
        };

        if let Some(message) = &fixture.error {
            return Err(Error::Lookup(message.clone()));
        }
        Ok(fixture.result.clone())
    }
}
