//! Verifier behaviour against recorded responses.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::TestHarness;
use mainstreet::lookup::{Backend, PlacesLookupResult};
use mainstreet::verifier::{AddressParts, FailureReason, MessageTable};
use mainstreet::{FixtureGateway, VerificationQuery, VerifierConfig};

#[tokio::test]
async fn test_precise_geocode_confirmed() {
    let harness = TestHarness::setup();
    let mut verifier = harness.verifier_for(
        VerificationQuery::new("1 Infinite Loop, Cupertino, CA 95014").with_accuracy(5.0),
    );

    assert!(verifier.success().await.unwrap());
    assert_eq!(verifier.latitude().await.unwrap(), Some(37.331741));
    assert_eq!(verifier.longitude().await.unwrap(), Some(-122.030333));
    assert_eq!(harness.backend_places_calls(), 0);
}

#[tokio::test]
async fn test_unknown_address_unconfirmed() {
    let harness = TestHarness::setup();
    let mut verifier = harness.verifier("1 Nowhere Rd, Atlantis");

    assert!(!verifier.success().await.unwrap());
    assert_eq!(
        verifier.failure_message().await.unwrap().as_deref(),
        Some("can't be confirmed")
    );
}

#[tokio::test]
async fn test_transport_failure_unconfirmed() {
    let harness = TestHarness::setup();
    let mut verifier = harness.verifier("742 Evergreen Terrace");

    let failure = verifier.failure().await.unwrap().unwrap();
    assert_eq!(failure.reason, FailureReason::Unconfirmed);
}

#[tokio::test]
async fn test_coarse_geocode_rescued_by_places() {
    let harness = TestHarness::setup();
    let query = VerificationQuery::new("350 5th Ave, New York, NY 10118")
        .with_accuracy(5.0)
        .with_address_parts(AddressParts {
            address1: Some("350 5th Ave".to_string()),
            city: Some("New York".to_string()),
            state: Some("NY".to_string()),
            postcode: Some("10118".to_string()),
            ..AddressParts::default()
        });
    let mut verifier = harness.verifier_for(query);

    assert!(verifier.success().await.unwrap());
    assert_eq!(verifier.latitude().await.unwrap(), Some(40.748441));
    assert_eq!(verifier.longitude().await.unwrap(), Some(-73.985664));

    // Places components supersede the geocoder's 10001.
    assert!(verifier.confirm_postcode_error_message().await.unwrap().is_none());
    assert!(verifier
        .confirm_street_address_error_message()
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_coarse_geocode_partial_place_unconfirmed() {
    let harness = TestHarness::setup();
    let mut verifier =
        harness.verifier_for(VerificationQuery::new("Main St, Springfield").with_accuracy(5.0));

    assert!(!verifier.success().await.unwrap());
    assert_eq!(
        verifier.failure_message().await.unwrap().as_deref(),
        Some("can't be confirmed")
    );
    assert_eq!(harness.backend_places_calls(), 1);
}

#[tokio::test]
async fn test_country_hint() {
    let harness = TestHarness::setup();

    let mut verifier = harness.verifier_for(
        VerificationQuery::new("24 Sussex Dr, Ottawa, ON K1M 1M4").with_country("Canada"),
    );
    assert!(verifier.success().await.unwrap());

    // Without the hint the recorded answer does not match.
    let mut verifier = harness.verifier("24 Sussex Dr, Ottawa, ON K1M 1M4");
    assert!(!verifier.success().await.unwrap());
}

#[tokio::test]
async fn test_us_synonyms_are_not_sent() {
    let harness = TestHarness::setup();
    for country in ["United States", "USA", "US", "840"] {
        let mut verifier = harness.verifier_for(
            VerificationQuery::new("1 Infinite Loop, Cupertino, CA 95014").with_country(country),
        );
        assert!(verifier.success().await.unwrap(), "{country}");
    }
}

#[tokio::test]
async fn test_validation_backend_outcomes() {
    let harness = TestHarness::setup_with_config(VerifierConfig {
        backend: Backend::SmartyStreets,
        ..VerifierConfig::default()
    });

    let mut verifier = harness.verifier("1600 Amphitheatre Pkwy, Mountain View, CA 94043");
    assert!(verifier.success().await.unwrap());
    assert!(verifier.latitude().await.unwrap().is_none());

    let mut verifier = harness.verifier("1 Main St Apt 99, Boston, MA 02108");
    assert_eq!(
        verifier.failure_message().await.unwrap().as_deref(),
        Some("Apartment or suite can't be confirmed")
    );

    let mut verifier = harness.verifier("500 Park Ave, New York, NY 10022");
    assert_eq!(
        verifier.failure().await.unwrap().map(|f| f.reason),
        Some(FailureReason::AptMissing)
    );

    let mut verifier = harness.verifier_for(
        VerificationQuery::new("10 Downing St, London")
            .with_backend(Backend::SmartyStreets)
            .with_country("United Kingdom"),
    );
    assert_eq!(
        verifier.failure_message().await.unwrap().as_deref(),
        Some("Address can't be confirmed")
    );
}

#[tokio::test]
async fn test_unknown_status_is_fatal() {
    let harness = TestHarness::setup();
    let mut verifier = harness.verifier_for(
        VerificationQuery::new("Unter den Linden 77, Berlin")
            .with_backend(Backend::SmartyStreets)
            .with_country("Germany"),
    );

    let err = verifier.success().await.unwrap_err();
    assert!(err.is_contract_violation());
    assert!(err.to_string().contains("Maybe"));
}

#[tokio::test]
async fn test_postal_code_only_not_queried() {
    let harness = TestHarness::setup();
    for address in ["95014", "95014-2083"] {
        let mut verifier = harness.verifier(address);
        assert!(!verifier.success().await.unwrap());
    }
    assert_eq!(harness.backend_address_calls(), 0);
}

#[tokio::test]
async fn test_repeat_verification_served_from_cache() {
    let harness = TestHarness::setup();
    for _ in 0..3 {
        let mut verifier = harness.verifier("1 Infinite Loop, Cupertino, CA 95014");
        assert!(verifier.success().await.unwrap());
    }
    assert_eq!(harness.backend_address_calls(), 1);
    assert_eq!(harness.gateway.stats().hits, 2);
}

#[tokio::test]
async fn test_translated_messages_from_config_file() {
    let mut messages = MessageTable::default();
    messages.insert("de", "unconfirmed", "kann nicht bestätigt werden");
    let harness = TestHarness::setup_with_config(VerifierConfig {
        locale: Some("de".to_string()),
        messages,
        ..VerifierConfig::default()
    });

    let mut verifier = harness.verifier("1 Nowhere Rd, Atlantis");
    assert_eq!(
        verifier.failure_message().await.unwrap().as_deref(),
        Some("kann nicht bestätigt werden")
    );

    let reloaded = VerifierConfig::from_file(&harness.config_path).unwrap();
    assert_eq!(reloaded, harness.config);
}

#[test]
fn test_cassette_file_loads() {
    let harness = TestHarness::setup();
    assert!(FixtureGateway::from_file(&harness.cassette_path).is_ok());
}

#[test]
fn test_places_payload_from_json() {
    let payload = serde_json::json!({
        "place_id": "ChIJ2eUgeAK6j4ARbn5u_wAGqWA",
        "address_components": [
            { "long_name": "1600", "short_name": "1600", "types": ["street_number"] },
            { "long_name": "Amphitheatre Parkway", "short_name": "Amphitheatre Pkwy", "types": ["route"] }
        ],
        "location": { "lat": 37.4224764, "lng": -122.0842499 }
    });

    let places: PlacesLookupResult = serde_json::from_value(payload).unwrap();
    assert!(!places.partial_match);
    assert_eq!(places.address_components.len(), 2);
    assert_eq!(places.address_components[1].short_name, "Amphitheatre Pkwy");
    assert_eq!(places.location.map(|l| l.lat), Some(37.4224764));
}
