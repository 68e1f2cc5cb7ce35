//! Test request flow entity
//!
//! Audit trail of status changes on a test request.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::test_request::{RequestStatus, TestRequestId};
use super::user::UserId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequestFlow {
    pub id: i64,
    pub request_id: TestRequestId,
    pub from_status: RequestStatus,
    pub to_status: RequestStatus,
    pub changed_by: UserId,
    pub happened_on: DateTime<Utc>,
}

/// Data needed to record a status change
#[derive(Debug, Clone, PartialEq)]
pub struct NewTestRequestFlow {
    pub request_id: TestRequestId,
    pub from_status: RequestStatus,
    pub to_status: RequestStatus,
    pub changed_by: UserId,
}
