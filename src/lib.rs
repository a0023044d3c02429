//! # mainstreet
//!
//! Address verification on top of pluggable lookup backends.
//!
//! Given a free-form address (and optionally its structured parts), the
//! [`AddressVerifier`] decides whether a backend confirms it and, if not,
//! produces a user-facing reason:
//!
//! - the address can't be confirmed at all
//! - the apartment or suite can't be confirmed, or is missing
//! - the match is less precise than requested and a places cross-check
//!   could not rescue it
//!
//! Two structurally different backends are supported behind one
//! [`LookupGateway`] contract: postal-validation services returning discrete
//! match codes, and geocoders returning a numeric accuracy score.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mainstreet::{AddressVerifier, FixtureGateway, VerificationQuery};
//!
//! let gateway = FixtureGateway::from_file("cassette.toml".as_ref())?;
//! let query = VerificationQuery::new("1600 Pennsylvania Ave NW, Washington, DC 20500")
//!     .with_accuracy(5.0);
//! let mut verifier = AddressVerifier::new(&gateway, query);
//!
//! if verifier.success().await? {
//!     println!("{:?}", verifier.latitude().await?);
//! } else {
//!     println!("{}", verifier.failure_message().await?.unwrap_or_default());
//! }
//! ```

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod verifier;

pub use config::VerifierConfig;
pub use error::{Error, Result};
pub use lookup::{
    Backend, BackendKind, CachingGateway, FixtureGateway, LookupGateway, LookupOptions,
    PlacesLookupResult, PrimaryLookupResult,
};
pub use model::{validate_address, AddressField, AddressRecord, ValidationErrors, ValidationOptions};
pub use verifier::{
    AddressParts, AddressVerifier, Failure, FailureReason, MessageCatalog, NoCatalog,
    VerificationQuery,
};
