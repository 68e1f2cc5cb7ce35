//! Test request workflow
//!
//! The status state machine every test request follows:
//!
//! ```text
//! INITIATED -> LAB_TEST_IN_PROGRESS -> LAB_TEST_COMPLETED -> DIAGNOSIS_IN_PROCESS -> COMPLETED
//! ```
//!
//! Each step is a [`WorkflowAction`] that is only valid from one status and
//! only for one role. [`transition`] is the single place these guards live;
//! services call it before persisting anything.

use crate::domain::entities::{RequestStatus, Role};
use crate::error::DomainError;

/// A status-changing operation on a test request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    AssignForLabTest,
    SubmitLabResult,
    AssignForConsultation,
    SubmitConsultation,
}

impl WorkflowAction {
    /// Status the request must be in for the action to apply
    pub fn required_status(&self) -> RequestStatus {
        match self {
            WorkflowAction::AssignForLabTest => RequestStatus::Initiated,
            WorkflowAction::SubmitLabResult => RequestStatus::LabTestInProgress,
            WorkflowAction::AssignForConsultation => RequestStatus::LabTestCompleted,
            WorkflowAction::SubmitConsultation => RequestStatus::DiagnosisInProcess,
        }
    }

    /// Status the request ends up in
    pub fn target_status(&self) -> RequestStatus {
        match self {
            WorkflowAction::AssignForLabTest => RequestStatus::LabTestInProgress,
            WorkflowAction::SubmitLabResult => RequestStatus::LabTestCompleted,
            WorkflowAction::AssignForConsultation => RequestStatus::DiagnosisInProcess,
            WorkflowAction::SubmitConsultation => RequestStatus::Completed,
        }
    }

    /// Role allowed to perform the action
    pub fn required_role(&self) -> Role {
        match self {
            WorkflowAction::AssignForLabTest | WorkflowAction::SubmitLabResult => Role::Tester,
            WorkflowAction::AssignForConsultation | WorkflowAction::SubmitConsultation => {
                Role::Doctor
            }
        }
    }
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowAction::AssignForLabTest => write!(f, "assign for lab test"),
            WorkflowAction::SubmitLabResult => write!(f, "submit lab result"),
            WorkflowAction::AssignForConsultation => write!(f, "assign for consultation"),
            WorkflowAction::SubmitConsultation => write!(f, "submit consultation"),
        }
    }
}

/// Apply `action` by an actor with `role` to a request currently in `current`.
///
/// Returns the new status, `Forbidden` for the wrong role, or
/// `InvalidStateTransition` when the request is not at the action's stage.
pub fn transition(
    current: RequestStatus,
    action: WorkflowAction,
    role: Role,
) -> Result<RequestStatus, DomainError> {
    if role != action.required_role() {
        return Err(DomainError::Forbidden(format!(
            "Role {} cannot {}",
            role, action
        )));
    }

    if current != action.required_status() {
        return Err(DomainError::InvalidStateTransition(format!(
            "Cannot {} while the request is {} (expected {})",
            action,
            current,
            action.required_status()
        )));
    }

    Ok(action.target_status())
}
