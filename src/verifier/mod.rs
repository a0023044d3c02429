//! Address verification.
//!
//! This module decides whether an address is confirmed:
//!
//! ```text
//! success()
//!    │
//!    ▼
//! ┌─────────────────────┐
//! │ primary lookup      │  (memoized, skipped for zip-only input)
//! └─────────┬───────────┘
//!           │
//!    ┌──────┼───────────────┐
//!    │      │               │
//!  NONE  VALIDATION      GEOCODE
//!    │      │               │
//!    ▼      ▼               ▼
//! Unconfirmed  match code   accuracy >= requested?
//!           → reason           │
//!                        ┌─────┴─────┐
//!                       YES          NO
//!                        │           │
//!                        ▼           ▼
//!                     Confirmed   places cross-check
//!                                    │
//!                             ┌──────┴──────┐
//!                          place id     partial/none
//!                             │             │
//!                             ▼             ▼
//!                         Confirmed     Unconfirmed
//! ```
//!
//! Field-level mismatch diagnostics (city, state, postcode, street) are
//! computed separately from the outcome and may fire on a confirmed address.

mod address_verifier;
mod messages;
mod query;

pub use address_verifier::AddressVerifier;
pub use messages::{
    Failure, FailureReason, MessageCatalog, MessageTable, NoCatalog, MESSAGE_SCOPE,
};
pub use query::{AddressParts, VerificationQuery};
