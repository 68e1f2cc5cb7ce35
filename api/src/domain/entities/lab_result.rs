//! Lab result domain entity
//!
//! Vitals and the test outcome recorded by a tester. Attached to a request
//! when it enters the lab stage and filled in when the lab test completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Outcome of a COVID-19 test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Positive,
    Negative,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStatus::Positive => write!(f, "POSITIVE"),
            TestStatus::Negative => write!(f, "NEGATIVE"),
        }
    }
}

impl std::str::FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "POSITIVE" => Ok(TestStatus::Positive),
            "NEGATIVE" => Ok(TestStatus::Negative),
            _ => Err(format!("Unknown test status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    pub blood_pressure: Option<String>,
    pub heart_beat: Option<String>,
    pub temperature: Option<String>,
    pub oxygen_level: Option<String>,
    pub comments: Option<String>,
    pub result: Option<TestStatus>,
    /// Tester who picked the request up
    pub tester_id: UserId,
    pub updated_on: DateTime<Utc>,
}

impl LabResult {
    /// Empty result created when a tester takes the request
    pub fn assigned_to(tester_id: UserId) -> Self {
        Self {
            blood_pressure: None,
            heart_beat: None,
            temperature: None,
            oxygen_level: None,
            comments: None,
            result: None,
            tester_id,
            updated_on: Utc::now(),
        }
    }

    /// Fill in the submitted readings. `details` must already be validated.
    pub fn record(&mut self, details: &CreateLabResult) {
        self.blood_pressure = details.blood_pressure.clone();
        self.heart_beat = details.heart_beat.clone();
        self.temperature = details.temperature.clone();
        self.oxygen_level = details.oxygen_level.clone();
        self.comments = details.comments.clone();
        self.result = details.result;
        self.updated_on = Utc::now();
    }
}

/// Payload a tester submits to complete the lab stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabResult {
    pub blood_pressure: Option<String>,
    pub heart_beat: Option<String>,
    pub temperature: Option<String>,
    pub oxygen_level: Option<String>,
    pub comments: Option<String>,
    pub result: Option<TestStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        assert_eq!(TestStatus::Positive.to_string(), "POSITIVE");
        assert_eq!(
            "negative".parse::<TestStatus>().unwrap(),
            TestStatus::Negative
        );
        assert!("maybe".parse::<TestStatus>().is_err());
    }

    #[test]
    fn assigned_lab_result_is_empty() {
        let tester = UserId::new();
        let lab = LabResult::assigned_to(tester);
        assert_eq!(lab.tester_id, tester);
        assert!(lab.result.is_none());
        assert!(lab.comments.is_none());
    }

    #[test]
    fn record_copies_submitted_readings() {
        let mut lab = LabResult::assigned_to(UserId::new());
        let details = CreateLabResult {
            blood_pressure: Some("120/80".to_string()),
            heart_beat: Some("72".to_string()),
            temperature: Some("98.6".to_string()),
            oxygen_level: Some("99".to_string()),
            comments: Some("Taken all relevant data".to_string()),
            result: Some(TestStatus::Positive),
        };

        lab.record(&details);

        assert_eq!(lab.result, Some(TestStatus::Positive));
        assert_eq!(lab.oxygen_level.as_deref(), Some("99"));
    }

    #[test]
    fn parse_create_lab_result_with_null_result() {
        let json = r#"{"bloodPressure": "170", "heartBeat": "90", "result": null}"#;
        let payload: CreateLabResult = serde_json::from_str(json).unwrap();
        assert_eq!(payload.blood_pressure.as_deref(), Some("170"));
        assert!(payload.result.is_none());
    }
}
