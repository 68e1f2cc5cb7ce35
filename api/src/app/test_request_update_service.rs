//! Test request update service
//!
//! Status-changing operations for testers and doctors. Each operation:
//! 1. validates the submitted payload
//! 2. loads the request ("Invalid ID" for unknown ids)
//! 3. runs the workflow guard (role + current status)
//! 4. checks the actor owns the stage when finalizing it
//! 5. persists, guarded on the status it was loaded with
//! 6. records the change in the flow log

use std::sync::Arc;

use crate::app::flow_service::record_flow;
use crate::app::test_request_query_service::load_request;
use crate::app::validation::required;
use crate::domain::entities::{
    Consultation, CreateConsultationRequest, CreateLabResult, LabResult, RequestStatus,
    TestRequest, TestRequestId, User,
};
use crate::domain::ports::{TestRequestFlowRepository, TestRequestRepository};
use crate::domain::workflow::{transition, WorkflowAction};
use crate::error::{AppError, DomainError};

pub struct TestRequestUpdateService<TR, FR>
where
    TR: TestRequestRepository,
    FR: TestRequestFlowRepository,
{
    requests: Arc<TR>,
    flows: Arc<FR>,
}

impl<TR, FR> TestRequestUpdateService<TR, FR>
where
    TR: TestRequestRepository,
    FR: TestRequestFlowRepository,
{
    pub fn new(requests: Arc<TR>, flows: Arc<FR>) -> Self {
        Self { requests, flows }
    }

    /// INITIATED -> LAB_TEST_IN_PROGRESS, attaching an empty lab result
    pub async fn assign_for_lab_test(
        &self,
        id: TestRequestId,
        tester: &User,
    ) -> Result<TestRequest, AppError> {
        let request = load_request(self.requests.as_ref(), id).await?;
        let next = transition(request.status, WorkflowAction::AssignForLabTest, tester.role)?;

        let mut updated = request.clone();
        updated.status = next;
        updated.lab_result = Some(LabResult::assigned_to(tester.id));

        self.persist(updated, request.status, tester).await
    }

    /// LAB_TEST_IN_PROGRESS -> LAB_TEST_COMPLETED, recording the readings
    pub async fn update_lab_test(
        &self,
        id: TestRequestId,
        details: &CreateLabResult,
        tester: &User,
    ) -> Result<TestRequest, AppError> {
        required(details.result, "result")?;

        let request = load_request(self.requests.as_ref(), id).await?;
        let next = transition(request.status, WorkflowAction::SubmitLabResult, tester.role)?;

        let mut updated = request.clone();
        let lab_result = updated
            .lab_result
            .as_mut()
            .ok_or_else(|| missing_stage_record(id, "lab result"))?;
        if lab_result.tester_id != tester.id {
            return Err(AppError::Forbidden(format!(
                "Test request {} is assigned to another tester",
                id
            )));
        }
        lab_result.record(details);
        updated.status = next;

        self.persist(updated, request.status, tester).await
    }

    /// LAB_TEST_COMPLETED -> DIAGNOSIS_IN_PROCESS, attaching an empty consultation
    pub async fn assign_for_consultation(
        &self,
        id: TestRequestId,
        doctor: &User,
    ) -> Result<TestRequest, AppError> {
        let request = load_request(self.requests.as_ref(), id).await?;
        let next = transition(
            request.status,
            WorkflowAction::AssignForConsultation,
            doctor.role,
        )?;

        let mut updated = request.clone();
        updated.status = next;
        updated.consultation = Some(Consultation::assigned_to(doctor.id));

        self.persist(updated, request.status, doctor).await
    }

    /// DIAGNOSIS_IN_PROCESS -> COMPLETED, recording the doctor's suggestion
    pub async fn update_consultation(
        &self,
        id: TestRequestId,
        details: &CreateConsultationRequest,
        doctor: &User,
    ) -> Result<TestRequest, AppError> {
        required(details.suggestion, "suggestion")?;

        let request = load_request(self.requests.as_ref(), id).await?;
        let next = transition(
            request.status,
            WorkflowAction::SubmitConsultation,
            doctor.role,
        )?;

        let mut updated = request.clone();
        let consultation = updated
            .consultation
            .as_mut()
            .ok_or_else(|| missing_stage_record(id, "consultation"))?;
        if consultation.doctor_id != doctor.id {
            return Err(AppError::Forbidden(format!(
                "Test request {} is assigned to another doctor",
                id
            )));
        }
        consultation.record(details);
        updated.status = next;

        self.persist(updated, request.status, doctor).await
    }

    async fn persist(
        &self,
        updated: TestRequest,
        previous: RequestStatus,
        actor: &User,
    ) -> Result<TestRequest, AppError> {
        let saved = self.requests.save_transition(&updated, previous).await?;

        tracing::info!(
            request_id = %saved.id,
            from = %previous,
            to = %saved.status,
            user_id = %actor.id,
            "Test request status changed"
        );

        record_flow(self.flows.as_ref(), saved.id, previous, saved.status, actor.id).await;

        Ok(saved)
    }
}

/// A request past the assignment stage without its sub-record is corrupt data
fn missing_stage_record(id: TestRequestId, record: &str) -> AppError {
    AppError::Domain(DomainError::Internal(format!(
        "Test request {} has no {} attached",
        id, record
    )))
}
