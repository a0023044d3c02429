//! Inputs to a verification attempt.

use crate::lookup::{Backend, LookupOptions};

/// Country values meaning "the default jurisdiction". These are never sent
/// to the backend; omitting the constraint implies it.
const DEFAULT_JURISDICTION: [&str; 4] = ["United States", "USA", "US", "840"];

/// Caller-supplied structured address fields, compared against what the
/// backend suggests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    /// Street line (number and name).
    pub address1: Option<String>,
    /// Apartment, suite, unit.
    pub address2: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or region.
    pub state: Option<String>,
    /// Postal code.
    pub postcode: Option<String>,
}

/// An address to verify plus everything that shapes the verification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationQuery {
    /// Free-form address. May be empty.
    pub address: String,
    /// Country name or code.
    pub country: Option<String>,
    /// Locale for failure messages.
    pub locale: Option<String>,
    /// Minimum acceptable accuracy for geocoder results.
    pub accuracy: Option<f64>,
    /// Structured parts for mismatch diagnostics.
    pub address_parts: Option<AddressParts>,
    /// Primary lookup backend.
    pub backend: Backend,
}

impl VerificationQuery {
    /// Create a query for `address` with no constraints.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Set the country hint.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the message locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Require at least this accuracy from geocoder results.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Supply structured parts for mismatch diagnostics.
    #[must_use]
    pub fn with_address_parts(mut self, parts: AddressParts) -> Self {
        self.address_parts = Some(parts);
        self
    }

    /// Select the primary backend.
    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// True if the address is only a 5 or 5+4 digit postal code.
    #[must_use]
    pub fn is_postal_code_only(&self) -> bool {
        let trimmed = self.address.trim();
        let (zip, plus4) = match trimmed.split_once('-') {
            Some((zip, plus4)) => (zip, Some(plus4)),
            None => (trimmed, None),
        };
        let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
        digits(zip, 5) && plus4.map_or(true, |p| digits(p, 4))
    }

    /// Options for the primary lookup. The country is passed through only
    /// when it names a jurisdiction other than the default one.
    #[must_use]
    pub fn lookup_options(&self) -> LookupOptions {
        let country = self
            .country
            .as_deref()
            .filter(|c| !c.trim().is_empty() && !DEFAULT_JURISDICTION.contains(c))
            .map(str::to_string);
        LookupOptions {
            backend: self.backend,
            country,
        }
    }
}
