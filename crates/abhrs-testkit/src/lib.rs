//! ABHRS Testing Infrastructure
//!
//! Common setup shared by the integration tests of every crate:
//! a scenario builder that stands up roots, authorities, users, credentials
//! and chains; proptest strategies for protocol inputs; and a tracing
//! subscriber for test output.
//!
//! ```rust,no_run
//! use abhrs_testkit::*;
//!
//! let fixture = ProtocolFixture::builder("my_test").build().unwrap();
//! let alice = fixture
//!     .enroll("alice", abhrs_core::AttributeSet::new().with("role", "doctor"))
//!     .unwrap();
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

/// Scenario fixtures
pub mod fixtures;
/// Proptest strategies
pub mod strategies;
/// Subscriber setup for test output
pub mod tracing_setup;

pub use fixtures::*;
pub use tracing_setup::init_test_tracing;
