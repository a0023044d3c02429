//! Test harness wiring recorded responses and configuration together.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mainstreet::{
    AddressVerifier, CachingGateway, FixtureGateway, VerificationQuery, VerifierConfig,
};
use std::path::PathBuf;
use tempfile::TempDir;

/// Recorded responses shared by the suite.
pub const CASSETTE: &str = include_str!("fixtures/cassette.toml");

/// Owns a temp directory with the cassette and a config file on disk.
pub struct TestHarness {
    /// Keeps the directory alive.
    _dir: TempDir,
    /// Path of the written cassette.
    pub cassette_path: PathBuf,
    /// Path of the written config.
    pub config_path: PathBuf,
    /// Loaded configuration.
    pub config: VerifierConfig,
    /// Gateway over the cassette, behind an LRU cache.
    pub gateway: CachingGateway<FixtureGateway>,
}

impl TestHarness {
    /// Set up with the default configuration.
    pub fn setup() -> Self {
        Self::setup_with_config(VerifierConfig::default())
    }

    /// Write `config` and the cassette to a temp dir and load both back.
    pub fn setup_with_config(config: VerifierConfig) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cassette_path = dir.path().join("cassette.toml");
        let config_path = dir.path().join("config.toml");

        std::fs::write(&cassette_path, CASSETTE).expect("write cassette");
        config.to_file(&config_path).expect("write config");

        let config = VerifierConfig::from_file(&config_path).expect("load config");
        let fixtures = FixtureGateway::from_file(&cassette_path).expect("load cassette");
        let gateway = CachingGateway::with_capacity(fixtures, config.cache_capacity);

        Self {
            _dir: dir,
            cassette_path,
            config_path,
            config,
            gateway,
        }
    }

    /// A verifier for `address` with the harness config's defaults.
    pub fn verifier(&self, address: &str) -> AddressVerifier<'_, CachingGateway<FixtureGateway>> {
        self.verifier_for(self.config.query(address))
    }

    /// A verifier for a fully specified query.
    pub fn verifier_for(
        &self,
        query: VerificationQuery,
    ) -> AddressVerifier<'_, CachingGateway<FixtureGateway>> {
        AddressVerifier::new(&self.gateway, query).with_catalog(self.config.catalog())
    }

    /// Primary lookups that reached the recorded backend.
    pub fn backend_address_calls(&self) -> usize {
        self.gateway.inner().address_calls()
    }

    /// Places lookups that reached the recorded backend.
    pub fn backend_places_calls(&self) -> usize {
        self.gateway.inner().places_calls()
    }
}
