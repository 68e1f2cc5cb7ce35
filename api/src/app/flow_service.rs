//! Test request flow service
//!
//! Read access to the status change history of a request, plus the
//! best-effort recorder used by the services that change status.

use std::sync::Arc;

use crate::app::test_request_query_service::{load_request, not_found};
use crate::domain::entities::{
    NewTestRequestFlow, RequestStatus, Role, TestRequestFlow, TestRequestId, User, UserId,
};
use crate::domain::ports::{TestRequestFlowRepository, TestRequestRepository};
use crate::error::AppError;

/// Roles that may read any request's history
const STAFF_VIEWERS: [Role; 3] = [Role::Tester, Role::Doctor, Role::GovernmentAuthority];

pub struct TestRequestFlowService<TR, FR>
where
    TR: TestRequestRepository,
    FR: TestRequestFlowRepository,
{
    requests: Arc<TR>,
    flows: Arc<FR>,
}

impl<TR, FR> TestRequestFlowService<TR, FR>
where
    TR: TestRequestRepository,
    FR: TestRequestFlowRepository,
{
    pub fn new(requests: Arc<TR>, flows: Arc<FR>) -> Self {
        Self { requests, flows }
    }

    /// Status changes of a request, oldest first.
    ///
    /// Patients only see their own requests; staff see all of them.
    pub async fn history(
        &self,
        id: TestRequestId,
        viewer: &User,
    ) -> Result<Vec<TestRequestFlow>, AppError> {
        let request = load_request(self.requests.as_ref(), id).await?;

        if !viewer.has_any_role(&STAFF_VIEWERS) && !request.is_owned_by(&viewer.id) {
            return Err(not_found(id).into());
        }

        Ok(self.flows.find_by_request(&id).await?)
    }
}

/// Append a flow entry. The status change has already been committed, so a
/// failure here is logged rather than returned.
pub(crate) async fn record_flow<FR>(
    flows: &FR,
    request_id: TestRequestId,
    from_status: RequestStatus,
    to_status: RequestStatus,
    changed_by: UserId,
) where
    FR: TestRequestFlowRepository + ?Sized,
{
    let entry = NewTestRequestFlow {
        request_id,
        from_status,
        to_status,
        changed_by,
    };

    if let Err(e) = flows.record(&entry).await {
        tracing::warn!(
            error = %e,
            request_id = %request_id,
            from = %from_status,
            to = %to_status,
            "Failed to record test request flow"
        );
    }
}
