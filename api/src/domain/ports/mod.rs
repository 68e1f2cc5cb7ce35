//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod repositories;

#[cfg(test)]
pub use repositories::MockTestRequestFlowRepository;
pub use repositories::{TestRequestFlowRepository, TestRequestRepository, UserRepository};

/// The set of repositories a server instance is wired with.
///
/// Lets the HTTP layer stay generic over storage: PostgreSQL in production,
/// in-memory repositories in tests.
pub trait Backend: Send + Sync + 'static {
    type Users: UserRepository + 'static;
    type Requests: TestRequestRepository + 'static;
    type Flows: TestRequestFlowRepository + 'static;
}
