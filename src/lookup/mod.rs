//! Lookup gateway contract.
//!
//! The verifier never talks to a backend directly. It asks a
//! [`LookupGateway`] for two things:
//!
//! 1. a **primary lookup** against the configured [`Backend`], answering with
//!    either a validation result or a geocode result
//! 2. a **places lookup**, used as a cross-check when the primary result is
//!    less precise than requested
//!
//! ```text
//! AddressVerifier
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │ CachingGateway      │  (optional, LRU across verifications)
//! └─────────┬───────────┘
//!           │ miss
//!           ▼
//! ┌─────────────────────┐
//! │ backend gateway     │  (HTTP client, fixtures, ...)
//! └─────────────────────┘
//! ```
//!
//! Gateways own transport, auth, retries and timeouts. A transport failure
//! is reported as [`Error::Lookup`](crate::Error::Lookup); the verifier
//! degrades it to "no result".

mod cache;
mod fixture;
mod types;

pub use cache::{CacheStats, CachingGateway};
pub use fixture::{AddressFixture, FixtureGateway, PlacesFixture, RecordedResult};
pub use types::{
    AddressComponents, Analysis, Coordinates, DpvMatchCode, GeocodeResult, PlaceComponent,
    PlaceComponents, PlacesLookupResult, PrimaryLookupResult, RawAnalysis, ValidationResult,
    VerificationStatus,
};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary lookup backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// SmartyStreets postal validation.
    SmartyStreets,
    /// Geocodio geocoder.
    Geocodio,
    /// OpenStreetMap Nominatim geocoder.
    #[default]
    Nominatim,
    /// Google geocoder.
    Google,
}

/// Which result shape a backend produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Discrete match codes ([`ValidationResult`]).
    Validation,
    /// Coordinates plus accuracy ([`GeocodeResult`]).
    Geocode,
}

impl Backend {
    /// Result shape to expect from this backend.
    #[must_use]
    pub fn kind(self) -> BackendKind {
        match self {
            Self::SmartyStreets => BackendKind::Validation,
            Self::Geocodio | Self::Nominatim | Self::Google => BackendKind::Geocode,
        }
    }

    /// Stable identifier, as used in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SmartyStreets => "smarty_streets",
            Self::Geocodio => "geocodio",
            Self::Nominatim => "nominatim",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a primary lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LookupOptions {
    /// Backend to query.
    pub backend: Backend,
    /// Country constraint. `None` means the default jurisdiction.
    pub country: Option<String>,
}

/// A source of address lookups.
///
/// Implementations decide how calls are transported. Both calls are awaited
/// once per verifier at most.
#[allow(async_fn_in_trait)]
pub trait LookupGateway {
    /// Look up an address against the primary backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`](crate::Error::Lookup) on transport failure and
    /// a contract error if the backend's analysis cannot be normalized.
    async fn lookup_address(
        &self,
        query: &str,
        options: &LookupOptions,
    ) -> Result<Option<PrimaryLookupResult>>;

    /// Look up an address against the places source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`](crate::Error::Lookup) on transport failure.
    async fn lookup_places(&self, query: &str) -> Result<Option<PlacesLookupResult>>;
}
