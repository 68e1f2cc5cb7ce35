//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, the workflow and ports.

pub mod flow_service;
pub mod test_request_query_service;
pub mod test_request_service;
pub mod test_request_update_service;
pub mod user_service;
pub mod validation;

pub use flow_service::TestRequestFlowService;
pub use test_request_query_service::TestRequestQueryService;
pub use test_request_service::TestRequestService;
pub use test_request_update_service::TestRequestUpdateService;
pub use user_service::{hash_api_key, UserService};
