//! End-to-end tests for mainstreet.
//!
//! These drive the verifier and the record-validation hook through the
//! fixture gateway, using recorded backend responses in `fixtures/`.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test e2e
//! ```

mod harness;
mod records;
mod verification;

pub use harness::TestHarness;
