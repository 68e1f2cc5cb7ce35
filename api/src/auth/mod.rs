//! Authentication and role gating

mod api_key;

pub use api_key::{auth_middleware, require_role};
