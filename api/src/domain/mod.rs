//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models representing core business concepts
//! - `workflow`: The test request status state machine
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod ports;
pub mod workflow;
