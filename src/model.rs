//! Record validation on top of the verifier.
//!
//! A persistence layer implements [`AddressRecord`] for its address type and
//! calls [`validate_address`] before saving. The result says which fields to
//! flag; applying them to the record's error set is up to the caller.

use crate::error::Result;
use crate::lookup::{Backend, LookupGateway, PrimaryLookupResult};
use crate::verifier::{AddressParts, AddressVerifier, MessageCatalog, VerificationQuery};
use tracing::debug;

/// An address-bearing record that can be verified.
pub trait AddressRecord {
    /// Address field values in the order they form the query string.
    fn address_fields(&self) -> Vec<Option<String>>;

    /// Country of the record, if it has one.
    fn country(&self) -> Option<String> {
        None
    }

    /// Structured parts, for records that keep street/city/state/postcode
    /// in separate fields.
    fn address_parts(&self) -> Option<AddressParts> {
        None
    }

    /// Store geocoded coordinates.
    fn set_coordinates(&mut self, _latitude: Option<f64>, _longitude: Option<f64>) {}
}

/// Record field an error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    /// Street line.
    Address1,
    /// City.
    City,
    /// State or region.
    State,
    /// Postal code.
    Postcode,
}

/// How a record is verified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOptions {
    /// Copy coordinates onto the record on success.
    pub geocode: bool,
    /// Minimum accuracy for geocoder results.
    pub accuracy: Option<f64>,
    /// Primary backend.
    pub backend: Backend,
}

/// Outcome of validating one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    /// Field errors, in the order they were found.
    pub errors: Vec<(AddressField, String)>,
    /// Primary lookup result, kept for address standardization.
    pub result: Option<PrimaryLookupResult>,
    /// False when the record had no address to verify.
    pub verified: bool,
}

impl ValidationErrors {
    /// True if no field was flagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages attached to `field`.
    pub fn on(&self, field: AddressField) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    fn add(&mut self, field: AddressField, message: Option<String>) {
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            self.errors.push((field, message));
        }
    }
}

/// Verify a record's address.
///
/// Present, non-blank fields are joined with `", "`. A record with nothing to
/// join is not verified. On failure the failure message lands on
/// [`AddressField::Address1`]; on success coordinates are copied (when
/// `geocode` is set). Field mismatches are reported whatever the outcome.
///
/// # Errors
///
/// Returns a contract error if the backend's answer cannot be classified.
pub async fn validate_address<R, G>(
    record: &mut R,
    gateway: &G,
    options: &ValidationOptions,
    catalog: &dyn MessageCatalog,
) -> Result<ValidationErrors>
where
    R: AddressRecord,
    G: LookupGateway,
{
    let address = record
        .address_fields()
        .into_iter()
        .flatten()
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let mut report = ValidationErrors::default();
    if address.is_empty() {
        debug!("Record has no address, skipping verification");
        return Ok(report);
    }

    let mut query = VerificationQuery::new(address).with_backend(options.backend);
    query.country = record.country();
    query.accuracy = options.accuracy;
    query.address_parts = record.address_parts();
    let has_parts = query.address_parts.is_some();

    let mut verifier = AddressVerifier::new(gateway, query).with_catalog(catalog);
    report.verified = true;

    if verifier.success().await? {
        if options.geocode {
            let latitude = verifier.latitude().await?;
            let longitude = verifier.longitude().await?;
            record.set_coordinates(latitude, longitude);
        }
    } else {
        report.add(AddressField::Address1, verifier.failure_message().await?);
    }

    if has_parts {
        report.add(AddressField::City, verifier.confirm_city_error_message().await?);
        report.add(AddressField::State, verifier.confirm_state_error_message().await?);
        report.add(AddressField::Postcode, verifier.confirm_postcode_error_message().await?);
        report.add(
            AddressField::Address1,
            verifier.confirm_street_address_error_message().await?,
        );
    }

    report.result = verifier.result().await?.cloned();
    Ok(report)
}
