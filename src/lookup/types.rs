//! Normalized result shapes handed to the verifier by a gateway.
//!
//! Backends answer in one of two shapes: a postal-validation result with a
//! discrete analysis, or a geocoding result with coordinates and an accuracy
//! score. Loosely keyed backend payloads are mapped onto fixed-field records
//! here so the verifier never probes string keys.

use crate::error::ContractViolation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// `verification_status` values reported by international validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Fully verified.
    Verified,
    /// More than one candidate matched.
    Ambiguous,
    /// Only part of the address matched.
    Partial,
    /// Nothing matched.
    None,
}

impl FromStr for VerificationStatus {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Verified" => Ok(Self::Verified),
            "Ambiguous" => Ok(Self::Ambiguous),
            "Partial" => Ok(Self::Partial),
            "None" => Ok(Self::None),
            other => Err(ContractViolation::UnknownVerificationStatus(other.to_string())),
        }
    }
}

/// Delivery point validation match codes reported by US validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpvMatchCode {
    /// `Y`: confirmed, including any secondary (apartment/suite) number.
    Confirmed,
    /// `N`: not confirmed.
    NotConfirmed,
    /// `S`: primary confirmed, secondary number present but not confirmed.
    SecondaryUnconfirmed,
    /// `D`: primary confirmed, secondary number required but missing.
    SecondaryMissing,
}

impl DpvMatchCode {
    /// The single-letter code as sent on the wire.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Confirmed => "Y",
            Self::NotConfirmed => "N",
            Self::SecondaryUnconfirmed => "S",
            Self::SecondaryMissing => "D",
        }
    }
}

impl FromStr for DpvMatchCode {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Y" => Ok(Self::Confirmed),
            "N" => Ok(Self::NotConfirmed),
            "S" => Ok(Self::SecondaryUnconfirmed),
            "D" => Ok(Self::SecondaryMissing),
            other => Err(ContractViolation::UnknownMatchCode(other.to_string())),
        }
    }
}

impl fmt::Display for DpvMatchCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Analysis block of a validation result. Exactly one kind is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    /// International-style status.
    VerificationStatus(VerificationStatus),
    /// US-style DPV match code.
    DpvMatchCode(DpvMatchCode),
}

/// Analysis block as the backend sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnalysis {
    /// Raw `verification_status`, if any.
    #[serde(default)]
    pub verification_status: Option<String>,
    /// Raw `dpv_match_code`, if any.
    #[serde(default)]
    pub dpv_match_code: Option<String>,
}

impl TryFrom<&RawAnalysis> for Analysis {
    type Error = ContractViolation;

    /// `verification_status` takes precedence when both are sent.
    fn try_from(raw: &RawAnalysis) -> Result<Self, Self::Error> {
        if let Some(status) = raw.verification_status.as_deref() {
            return Ok(Self::VerificationStatus(status.parse()?));
        }
        if let Some(code) = raw.dpv_match_code.as_deref() {
            return Ok(Self::DpvMatchCode(code.parse()?));
        }
        Err(ContractViolation::MissingAnalysis)
    }
}

/// Structured components of a primary result. Each field is independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    /// Postal code.
    #[serde(default)]
    pub zip: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Street number.
    #[serde(default)]
    pub number: Option<String>,
    /// Street name.
    #[serde(default)]
    pub street: Option<String>,
}

/// Result from a postal-validation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Normalized analysis.
    pub analysis: Analysis,
    /// Standardized components, when the backend returned them.
    pub components: AddressComponents,
}

/// Result from a generic geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Backend precision score. Lower is coarser.
    pub accuracy: f64,
    /// Parsed components.
    pub components: AddressComponents,
}

/// What a primary lookup returned. Absence is modelled as `None` by callers.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryLookupResult {
    /// Discrete validation answer.
    Validation(ValidationResult),
    /// Coordinates with an accuracy score.
    Geocode(GeocodeResult),
}

impl PrimaryLookupResult {
    /// Coordinates, for geocoder results only.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Validation(_) => None,
            Self::Geocode(geo) => Some(Coordinates {
                lat: geo.latitude,
                lng: geo.longitude,
            }),
        }
    }

    /// Structured components of either shape.
    #[must_use]
    pub fn components(&self) -> &AddressComponents {
        match self {
            Self::Validation(v) => &v.components,
            Self::Geocode(g) => &g.components,
        }
    }
}

/// One address component of a places lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceComponent {
    /// Component types, most specific first (`postal_code`, `locality`, ...).
    #[serde(default)]
    pub types: Vec<String>,
    /// Short display form (`NY`).
    #[serde(default)]
    pub short_name: String,
    /// Long display form (`New York`).
    #[serde(default)]
    pub long_name: String,
}

/// Result of the secondary places lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacesLookupResult {
    /// Place identifier; required for a successful cross-check.
    #[serde(default)]
    pub place_id: Option<String>,
    /// Set when the places backend only matched part of the query.
    #[serde(default)]
    pub partial_match: bool,
    /// Address components as returned.
    #[serde(default)]
    pub address_components: Vec<PlaceComponent>,
    /// Location, when the backend returned one.
    #[serde(default)]
    pub location: Option<Coordinates>,
}

/// Snapshot of the places components the verifier compares against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceComponents {
    /// `postal_code`.
    pub postal_code: Option<String>,
    /// `locality`.
    pub locality: Option<String>,
    /// `administrative_area_level_1`.
    pub administrative_area_level_1: Option<String>,
    /// `street_number`.
    pub street_number: Option<String>,
    /// `route`.
    pub route: Option<String>,
}

impl PlaceComponents {
    /// Index components by their first type, keeping the short name.
    /// A later component with the same first type replaces an earlier one.
    #[must_use]
    pub fn from_components(components: &[PlaceComponent]) -> Self {
        let mut snapshot = Self::default();
        for component in components {
            let Some(kind) = component.types.first() else {
                continue;
            };
            let slot = match kind.as_str() {
                "postal_code" => &mut snapshot.postal_code,
                "locality" => &mut snapshot.locality,
                "administrative_area_level_1" => &mut snapshot.administrative_area_level_1,
                "street_number" => &mut snapshot.street_number,
                "route" => &mut snapshot.route,
                _ => continue,
            };
            *slot = Some(component.short_name.clone());
        }
        snapshot
    }
}
