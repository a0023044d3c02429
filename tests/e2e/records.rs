//! Record validation against recorded responses.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::TestHarness;
use mainstreet::verifier::{AddressParts, NoCatalog};
use mainstreet::{validate_address, AddressField, AddressRecord, ValidationOptions};

/// A record with separate address columns.
#[derive(Debug, Default)]
struct AddressWithAccuracy {
    street: Option<String>,
    apt: Option<String>,
    city: Option<String>,
    region: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl AddressRecord for AddressWithAccuracy {
    fn address_fields(&self) -> Vec<Option<String>> {
        vec![
            self.street.clone(),
            self.city.clone(),
            self.region.clone(),
            self.postal_code.clone(),
        ]
    }

    fn country(&self) -> Option<String> {
        self.country.clone()
    }

    fn address_parts(&self) -> Option<AddressParts> {
        Some(AddressParts {
            address1: self.street.clone(),
            address2: self.apt.clone(),
            city: self.city.clone(),
            state: self.region.clone(),
            postcode: self.postal_code.clone(),
        })
    }

    fn set_coordinates(&mut self, latitude: Option<f64>, longitude: Option<f64>) {
        self.latitude = latitude;
        self.longitude = longitude;
    }
}

fn options() -> ValidationOptions {
    ValidationOptions {
        geocode: true,
        accuracy: Some(1.0),
        ..ValidationOptions::default()
    }
}

#[tokio::test]
async fn test_valid_record_geocoded() {
    let harness = TestHarness::setup();
    // Joined as "24 Sussex Dr, Ottawa, ON K1M 1M4".
    let mut record = AddressWithAccuracy {
        street: Some("24 Sussex Dr".to_string()),
        city: Some("Ottawa".to_string()),
        region: Some("ON K1M 1M4".to_string()),
        country: Some("Canada".to_string()),
        ..AddressWithAccuracy::default()
    };

    let report = validate_address(&mut record, &harness.gateway, &options(), &NoCatalog)
        .await
        .unwrap();

    assert!(report.verified);
    assert_eq!(record.latitude, Some(45.4443));
    assert_eq!(record.longitude, Some(-75.6937));
    // The region column holds "ON K1M 1M4" and no postcode was given.
    assert_eq!(
        report.on(AddressField::State).collect::<Vec<_>>(),
        vec!["could not be confirmed, suggested state: ON"]
    );
    assert_eq!(
        report.on(AddressField::Postcode).collect::<Vec<_>>(),
        vec!["could not be confirmed, suggested zipcode: K1M 1M4"]
    );
    assert_eq!(report.on(AddressField::City).count(), 0);
    assert_eq!(report.on(AddressField::Address1).count(), 0);
}

#[tokio::test]
async fn test_invalid_record_flags_address1() {
    let harness = TestHarness::setup();
    let mut record = AddressWithAccuracy {
        street: Some("1 Nowhere Rd".to_string()),
        city: Some("Atlantis".to_string()),
        ..AddressWithAccuracy::default()
    };

    let report = validate_address(&mut record, &harness.gateway, &options(), &NoCatalog)
        .await
        .unwrap();

    assert_eq!(
        report.errors,
        vec![(AddressField::Address1, "can't be confirmed".to_string())]
    );
    assert!(report.result.is_none());
    assert!(record.latitude.is_none());
}

#[tokio::test]
async fn test_empty_record_skipped() {
    let harness = TestHarness::setup();
    let mut record = AddressWithAccuracy::default();

    let report = validate_address(&mut record, &harness.gateway, &options(), &NoCatalog)
        .await
        .unwrap();

    assert!(!report.verified);
    assert!(report.is_empty());
    assert_eq!(harness.backend_address_calls(), 0);
}
