//! Consultation domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Doctor's recommendation after reviewing the lab result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoctorSuggestion {
    NoIssues,
    HomeQuarantine,
    Admit,
}

impl std::fmt::Display for DoctorSuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DoctorSuggestion::NoIssues => write!(f, "NO_ISSUES"),
            DoctorSuggestion::HomeQuarantine => write!(f, "HOME_QUARANTINE"),
            DoctorSuggestion::Admit => write!(f, "ADMIT"),
        }
    }
}

impl std::str::FromStr for DoctorSuggestion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NO_ISSUES" => Ok(DoctorSuggestion::NoIssues),
            "HOME_QUARANTINE" => Ok(DoctorSuggestion::HomeQuarantine),
            "ADMIT" => Ok(DoctorSuggestion::Admit),
            _ => Err(format!("Unknown doctor suggestion: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub suggestion: Option<DoctorSuggestion>,
    pub comments: Option<String>,
    pub doctor_id: UserId,
    pub updated_on: DateTime<Utc>,
}

impl Consultation {
    pub fn assigned_to(doctor_id: UserId) -> Self {
        Self {
            suggestion: None,
            comments: None,
            doctor_id,
            updated_on: Utc::now(),
        }
    }

    pub fn record(&mut self, details: &CreateConsultationRequest) {
        self.suggestion = details.suggestion;
        self.comments = details.comments.clone();
        self.updated_on = Utc::now();
    }
}

/// Payload a doctor submits to complete the request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultationRequest {
    pub comments: Option<String>,
    pub suggestion: Option<DoctorSuggestion>,
}
