//! The address verifier.
//!
//! Performs at most one primary lookup and at most one places lookup per
//! instance. Both are memoized, absent answers included, and every query
//! method reuses them.

use super::messages::{localize, Failure, FailureReason, MessageCatalog, NoCatalog};
use super::query::{AddressParts, VerificationQuery};
use crate::error::{ContractViolation, Error, Result};
use crate::lookup::{
    Analysis, BackendKind, Coordinates, DpvMatchCode, LookupGateway, PlaceComponents,
    PrimaryLookupResult, VerificationStatus,
};
use tracing::{debug, error, info, warn};

/// Message when a validation backend rejects the address.
const ADDRESS_UNCONFIRMED: &str = "Address can't be confirmed";

/// Memoized primary lookup. A contract violation is memoized too, so a
/// broken backend answer is reported again without a second query.
type PrimaryMemo = std::result::Result<Option<PrimaryLookupResult>, ContractViolation>;

/// What a successful places cross-check captured.
#[derive(Debug, Clone)]
struct CrossCheck {
    components: PlaceComponents,
    location: Option<Coordinates>,
}

/// The parts of a primary result classification needs, copied out so the
/// memo borrow ends before a cross-check runs.
enum Shape {
    Absent,
    Analysis(Analysis),
    Accuracy(f64),
}

/// Backend-suggested values compared against the caller's address parts.
#[derive(Debug)]
struct Suggestions {
    postcode: Option<String>,
    city: Option<String>,
    state: Option<String>,
    street_number: Option<String>,
    street_name: Option<String>,
}

/// Verifies one address against a [`LookupGateway`].
///
/// Queries take `&mut self`: an instance serves one caller at a time. Build
/// a fresh verifier for each verification attempt.
pub struct AddressVerifier<'g, G> {
    gateway: &'g G,
    catalog: &'g dyn MessageCatalog,
    query: VerificationQuery,
    primary: Option<PrimaryMemo>,
    cross_check: Option<Option<CrossCheck>>,
    outcome: Option<Option<Failure>>,
}

impl<'g, G: LookupGateway> AddressVerifier<'g, G> {
    /// Create a verifier. No lookup happens until a query method is called.
    #[must_use]
    pub fn new(gateway: &'g G, query: VerificationQuery) -> Self {
        Self {
            gateway,
            catalog: &NoCatalog,
            query,
            primary: None,
            cross_check: None,
            outcome: None,
        }
    }

    /// Use `catalog` to translate failure messages.
    #[must_use]
    pub fn with_catalog(mut self, catalog: &'g dyn MessageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// The query being verified.
    #[must_use]
    pub fn query(&self) -> &VerificationQuery {
        &self.query
    }

    /// The primary lookup result, looking it up on first call.
    ///
    /// Postal-code-only addresses are never looked up and yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn result(&mut self) -> Result<Option<&PrimaryLookupResult>> {
        let memo = match self.primary.take() {
            Some(memo) => memo,
            None => self.fetch_primary().await,
        };
        let memo: &PrimaryMemo = self.primary.insert(memo);
        match memo {
            Ok(result) => Ok(result.as_ref()),
            Err(violation) => Err(Error::Contract(violation.clone())),
        }
    }

    /// True if the address is confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn success(&mut self) -> Result<bool> {
        Ok(self.failure().await?.is_none())
    }

    /// The user-facing failure message, or `None` on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn failure_message(&mut self) -> Result<Option<String>> {
        Ok(self.failure().await?.map(|f| f.message))
    }

    /// The failure reason and message, or `None` on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn failure(&mut self) -> Result<Option<Failure>> {
        if let Some(outcome) = &self.outcome {
            return Ok(outcome.clone());
        }
        let outcome = self.classify().await?;
        match &outcome {
            None => info!("Address confirmed: {:?}", self.query.address),
            Some(failure) => info!(
                "Address not confirmed ({}): {:?}",
                failure.reason, self.query.address
            ),
        }
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Cross-check the address against the places source, once.
    ///
    /// Returns false when the lookup fails or is absent, when the match is
    /// partial, or when no place id came back. On success, the captured
    /// components and location take over from the primary result.
    pub async fn confirmed_with_places(&mut self) -> bool {
        if self.cross_check.is_none() {
            let checked = self.fetch_places().await;
            self.cross_check = Some(checked);
        }
        matches!(self.cross_check, Some(Some(_)))
    }

    /// Best-known coordinates: the places location after a successful
    /// cross-check, otherwise the geocoder's. Classifies the address first,
    /// so the answer does not depend on call order.
    ///
    /// Validation backends carry no coordinates, so no lookup is made for
    /// them here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn coordinates(&mut self) -> Result<Option<Coordinates>> {
        if self.query.backend.kind() == BackendKind::Validation {
            return Ok(self.cross_check_location());
        }
        // Classify first so a cross-check it calls for has run.
        self.failure().await?;
        if let Some(location) = self.cross_check_location() {
            return Ok(Some(location));
        }
        Ok(self
            .result()
            .await?
            .and_then(PrimaryLookupResult::coordinates))
    }

    /// Latitude, see [`coordinates`](Self::coordinates).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn latitude(&mut self) -> Result<Option<f64>> {
        Ok(self.coordinates().await?.map(|c| c.lat))
    }

    /// Longitude, see [`coordinates`](Self::coordinates).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn longitude(&mut self) -> Result<Option<f64>> {
        Ok(self.coordinates().await?.map(|c| c.lng))
    }

    /// Diagnostic when the backend suggests a different postcode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn confirm_postcode_error_message(&mut self) -> Result<Option<String>> {
        let Some(suggested) = self.suggestions().await? else {
            return Ok(None);
        };
        let supplied = self.supplied(|p| p.postcode.as_deref());
        Ok(mismatch("zipcode", suggested.postcode.as_deref(), supplied))
    }

    /// Diagnostic when the backend suggests a different city.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn confirm_city_error_message(&mut self) -> Result<Option<String>> {
        let Some(suggested) = self.suggestions().await? else {
            return Ok(None);
        };
        let supplied = self.supplied(|p| p.city.as_deref());
        Ok(mismatch("city", suggested.city.as_deref(), supplied))
    }

    /// Diagnostic when the backend suggests a different state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn confirm_state_error_message(&mut self) -> Result<Option<String>> {
        let Some(suggested) = self.suggestions().await? else {
            return Ok(None);
        };
        let supplied = self.supplied(|p| p.state.as_deref());
        Ok(mismatch("state", suggested.state.as_deref(), supplied))
    }

    /// Diagnostic when the backend resolved no street number or no street name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Contract`] if the backend's answer cannot be classified.
    pub async fn confirm_street_address_error_message(&mut self) -> Result<Option<String>> {
        let Some(suggested) = self.suggestions().await? else {
            return Ok(None);
        };
        if present(suggested.street_number.as_deref()) && present(suggested.street_name.as_deref())
        {
            return Ok(None);
        }
        Ok(Some(
            "could not be confirmed, missing street number or name".to_string(),
        ))
    }

    async fn fetch_primary(&self) -> PrimaryMemo {
        if self.query.is_postal_code_only() {
            debug!(
                "Skipping lookup for postal-code-only address {:?}",
                self.query.address
            );
            return Ok(None);
        }

        let options = self.query.lookup_options();
        debug!(
            "Looking up {:?} via {} (country={:?})",
            self.query.address, options.backend, options.country
        );
        match self
            .gateway
            .lookup_address(&self.query.address, &options)
            .await
        {
            Ok(result) => Ok(result),
            Err(Error::Contract(violation)) => {
                error!("{} broke its contract: {violation}", options.backend);
                Err(violation)
            }
            Err(e) => {
                warn!("Address lookup failed, treating as no result: {e}");
                Ok(None)
            }
        }
    }

    async fn fetch_places(&self) -> Option<CrossCheck> {
        let places = match self.gateway.lookup_places(&self.query.address).await {
            Ok(Some(places)) => places,
            Ok(None) => {
                debug!("Places cross-check found nothing for {:?}", self.query.address);
                return None;
            }
            Err(e) => {
                warn!("Places lookup failed, cross-check not confirmed: {e}");
                return None;
            }
        };

        if places.partial_match {
            debug!("Places cross-check only partially matched");
            return None;
        }
        if !present(places.place_id.as_deref()) {
            debug!("Places cross-check returned no place id");
            return None;
        }

        Some(CrossCheck {
            components: PlaceComponents::from_components(&places.address_components),
            location: places.location,
        })
    }

    async fn classify(&mut self) -> Result<Option<Failure>> {
        let shape = match self.result().await? {
            None => Shape::Absent,
            Some(PrimaryLookupResult::Validation(v)) => Shape::Analysis(v.analysis),
            Some(PrimaryLookupResult::Geocode(g)) => Shape::Accuracy(g.accuracy),
        };

        let failure = match shape {
            Shape::Absent => Some(self.fail(FailureReason::Unconfirmed)),
            Shape::Analysis(analysis) => self.classify_analysis(analysis),
            Shape::Accuracy(accuracy) => match self.query.accuracy {
                Some(requested) if accuracy < requested => {
                    debug!("Accuracy {accuracy} below requested {requested}, cross-checking");
                    if self.confirmed_with_places().await {
                        None
                    } else {
                        Some(self.fail(FailureReason::Unconfirmed))
                    }
                }
                _ => None,
            },
        };
        Ok(failure)
    }

    fn classify_analysis(&self, analysis: Analysis) -> Option<Failure> {
        match analysis {
            Analysis::VerificationStatus(VerificationStatus::Verified)
            | Analysis::DpvMatchCode(DpvMatchCode::Confirmed) => None,
            Analysis::VerificationStatus(
                VerificationStatus::Ambiguous
                | VerificationStatus::Partial
                | VerificationStatus::None,
            )
            | Analysis::DpvMatchCode(DpvMatchCode::NotConfirmed) => {
                Some(self.fail_with(FailureReason::Unconfirmed, ADDRESS_UNCONFIRMED))
            }
            Analysis::DpvMatchCode(DpvMatchCode::SecondaryUnconfirmed) => {
                Some(self.fail(FailureReason::AptUnconfirmed))
            }
            Analysis::DpvMatchCode(DpvMatchCode::SecondaryMissing) => {
                Some(self.fail(FailureReason::AptMissing))
            }
        }
    }

    fn fail(&self, reason: FailureReason) -> Failure {
        self.fail_with(reason, reason.default_message())
    }

    fn fail_with(&self, reason: FailureReason, default: &str) -> Failure {
        localize(self.catalog, reason, default, self.query.locale.as_deref())
    }

    fn cross_check_location(&self) -> Option<Coordinates> {
        match &self.cross_check {
            Some(Some(check)) => check.location,
            _ => None,
        }
    }

    fn supplied<'a>(
        &'a self,
        field: impl FnOnce(&'a AddressParts) -> Option<&'a str>,
    ) -> Option<&'a str> {
        self.query.address_parts.as_ref().and_then(field)
    }

    /// What the backend suggests, or `None` when no diagnostic applies:
    /// no address parts were supplied, or nothing came back to compare.
    /// Runs classification first so cross-check components are used
    /// whenever classification would capture them.
    async fn suggestions(&mut self) -> Result<Option<Suggestions>> {
        if self.query.address_parts.is_none() {
            return Ok(None);
        }
        self.failure().await?;
        if let Some(Some(check)) = &self.cross_check {
            let c = &check.components;
            return Ok(Some(Suggestions {
                postcode: c.postal_code.clone(),
                city: c.locality.clone(),
                state: c.administrative_area_level_1.clone(),
                street_number: c.street_number.clone(),
                street_name: c.route.clone(),
            }));
        }
        Ok(self.result().await?.map(|result| {
            let c = result.components();
            Suggestions {
                postcode: c.zip.clone(),
                city: c.city.clone(),
                state: c.state.clone(),
                street_number: c.number.clone(),
                street_name: c.street.clone(),
            }
        }))
    }
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn normalized(value: &str) -> String {
    value.trim().to_lowercase()
}

/// `could not be confirmed, suggested <label>: <value>` when the backend's
/// suggestion differs from what was supplied. A blank or missing supplied
/// value differs from any suggestion.
fn mismatch(label: &str, suggested: Option<&str>, supplied: Option<&str>) -> Option<String> {
    let suggested = suggested.filter(|s| !s.trim().is_empty())?;
    let matches = supplied.is_some_and(|s| normalized(s) == normalized(suggested));
    (!matches).then(|| format!("could not be confirmed, suggested {label}: {suggested}"))
}
