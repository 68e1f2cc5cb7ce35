//! Test utilities
//!
//! Manual in-memory implementations of the repository ports and test fixtures.
//!
//! The in-memory repositories back both service unit tests and the router
//! tests (via `InMemoryBackend`). Where a test needs to assert on calls or
//! inject failures, the flow port also has a mockall `MockTestRequestFlowRepository`.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
