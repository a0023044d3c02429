//! mainstreet CLI entry point.

mod cli;

use clap::Parser;
use cli::Cli;
use mainstreet::{AddressVerifier, CachingGateway, FixtureGateway, LookupGateway, VerifierConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = cli.config()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    info!("mainstreet v{}", env!("CARGO_PKG_VERSION"));

    let fixtures = FixtureGateway::from_file(&cli.fixtures)?;

    let confirmed = if config.cache_capacity == 0 {
        verify(&cli, &config, &fixtures).await?
    } else {
        let gateway = CachingGateway::with_capacity(fixtures, config.cache_capacity);
        verify(&cli, &config, &gateway).await?
    };

    if !confirmed {
        std::process::exit(1);
    }
    Ok(())
}

/// Run one verification and print the outcome. Returns whether the address
/// was confirmed.
async fn verify<G: LookupGateway>(
    cli: &Cli,
    config: &VerifierConfig,
    gateway: &G,
) -> color_eyre::Result<bool> {
    let mut query = config.query(cli.address.clone());
    query.country.clone_from(&cli.country);
    query.address_parts = cli.address_parts();

    let mut verifier = AddressVerifier::new(gateway, query).with_catalog(config.catalog());

    let Some(failure) = verifier.failure().await? else {
        println!("confirmed");
        if let Some(coordinates) = verifier.coordinates().await? {
            println!("coordinates: {}, {}", coordinates.lat, coordinates.lng);
        }
        let diagnostics = [
            ("address1", verifier.confirm_street_address_error_message().await?),
            ("city", verifier.confirm_city_error_message().await?),
            ("state", verifier.confirm_state_error_message().await?),
            ("postcode", verifier.confirm_postcode_error_message().await?),
        ];
        for (field, message) in diagnostics {
            if let Some(message) = message {
                println!("{field}: {message}");
            }
        }
        return Ok(true);
    };

    println!("not confirmed ({}): {}", failure.reason, failure.message);
    Ok(false)
}
