//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use mainstreet::lookup::Backend;
use mainstreet::verifier::AddressParts;
use mainstreet::VerifierConfig;
use std::path::PathBuf;

/// Verify a postal address against recorded backend responses.
#[derive(Parser, Debug)]
#[command(name = "mainstreet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address to verify.
    pub address: String,

    /// Fixture file with recorded backend responses.
    #[arg(long, short, env = "MAINSTREET_FIXTURES")]
    pub fixtures: PathBuf,

    /// Country name or code.
    #[arg(long, env = "MAINSTREET_COUNTRY")]
    pub country: Option<String>,

    /// Locale for failure messages.
    #[arg(long, env = "MAINSTREET_LOCALE")]
    pub locale: Option<String>,

    /// Minimum accuracy for geocoder results.
    #[arg(long, env = "MAINSTREET_ACCURACY")]
    pub accuracy: Option<f64>,

    /// Primary lookup backend.
    #[arg(long, value_enum, env = "MAINSTREET_BACKEND")]
    pub backend: Option<CliBackend>,

    /// Street line, for mismatch diagnostics.
    #[arg(long)]
    pub address1: Option<String>,

    /// Apartment or suite.
    #[arg(long)]
    pub address2: Option<String>,

    /// City, for mismatch diagnostics.
    #[arg(long)]
    pub city: Option<String>,

    /// State or region, for mismatch diagnostics.
    #[arg(long)]
    pub state: Option<String>,

    /// Postal code, for mismatch diagnostics.
    #[arg(long)]
    pub postcode: Option<String>,

    /// Log level, overriding the config file.
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,

    /// Path to configuration file.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// Backend CLI enum.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliBackend {
    /// SmartyStreets postal validation.
    SmartyStreets,
    /// Geocodio geocoder.
    Geocodio,
    /// Nominatim geocoder.
    Nominatim,
    /// Google geocoder.
    Google,
}

impl Cli {
    /// Merge CLI arguments into a config.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be loaded.
    pub fn config(&self) -> color_eyre::Result<VerifierConfig> {
        let mut config = if let Some(ref path) = self.config {
            VerifierConfig::from_file(path)?
        } else {
            let path = VerifierConfig::default_path();
            if path.exists() {
                VerifierConfig::from_file(&path)?
            } else {
                VerifierConfig::default()
            }
        };

        if let Some(backend) = self.backend {
            config.backend = backend.into();
        }
        if self.accuracy.is_some() {
            config.accuracy = self.accuracy;
        }
        if self.locale.is_some() {
            config.locale.clone_from(&self.locale);
        }
        if let Some(ref level) = self.log_level {
            config.log_level.clone_from(level);
        }

        Ok(config)
    }

    /// Structured parts, if any part flag was given.
    #[must_use]
    pub fn address_parts(&self) -> Option<AddressParts> {
        let parts = AddressParts {
            address1: self.address1.clone(),
            address2: self.address2.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postcode: self.postcode.clone(),
        };
        (parts != AddressParts::default()).then_some(parts)
    }
}

impl From<CliBackend> for Backend {
    fn from(b: CliBackend) -> Self {
        match b {
            CliBackend::SmartyStreets => Backend::SmartyStreets,
            CliBackend::Geocodio => Backend::Geocodio,
            CliBackend::Nominatim => Backend::Nominatim,
            CliBackend::Google => Backend::Google,
        }
    }
}
