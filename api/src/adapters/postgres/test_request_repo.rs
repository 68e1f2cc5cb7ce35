//! PostgreSQL adapter for TestRequestRepository
//!
//! A test request aggregate spans three tables: `test_requests`,
//! `lab_results` and `consultations` (both keyed by request id).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    NotSet, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::entities::{
    Consultation, DoctorSuggestion, LabResult, NewTestRequest, RequestStatus, TestRequest,
    TestRequestId, TestStatus, UserId,
};
use crate::domain::ports::TestRequestRepository;
use crate::entity::{consultations, lab_results, test_requests};
use crate::error::DomainError;

/// PostgreSQL implementation of TestRequestRepository
pub struct PostgresTestRequestRepository {
    db: DatabaseConnection,
}

impl PostgresTestRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TestRequestRepository for PostgresTestRequestRepository {
    async fn find_by_id(&self, id: &TestRequestId) -> Result<Option<TestRequest>, DomainError> {
        find_one(&self.db, *id).await
    }

    async fn find_by_status(&self, status: RequestStatus) -> Result<Vec<TestRequest>, DomainError> {
        let results = test_requests::Entity::find()
            .filter(test_requests::Column::Status.eq(status.to_string()))
            .order_by_asc(test_requests::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, results).await
    }

    async fn find_by_patient(&self, patient: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        let results = test_requests::Entity::find()
            .filter(test_requests::Column::CreatedBy.eq(patient.0))
            .order_by_desc(test_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, results).await
    }

    async fn find_by_tester(&self, tester: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        let results = test_requests::Entity::find()
            .inner_join(lab_results::Entity)
            .filter(lab_results::Column::TesterId.eq(tester.0))
            .order_by_asc(test_requests::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, results).await
    }

    async fn find_by_doctor(&self, doctor: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        let results = test_requests::Entity::find()
            .inner_join(consultations::Entity)
            .filter(consultations::Column::DoctorId.eq(doctor.0))
            .order_by_asc(test_requests::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, results).await
    }

    async fn find_open_by_email_or_phone(
        &self,
        email: &str,
        phone_number: &str,
    ) -> Result<Vec<TestRequest>, DomainError> {
        let results = test_requests::Entity::find()
            .filter(test_requests::Column::Status.ne(RequestStatus::Completed.to_string()))
            .filter(
                Condition::any()
                    .add(test_requests::Column::Email.eq(email))
                    .add(test_requests::Column::PhoneNumber.eq(phone_number)),
            )
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, results).await
    }

    async fn create(&self, request: &NewTestRequest) -> Result<TestRequest, DomainError> {
        let model = test_requests::ActiveModel {
            id: NotSet,
            created_by: Set(request.created_by.0),
            name: Set(request.name.clone()),
            gender: Set(request.gender.to_string()),
            address: Set(request.address.clone()),
            age: Set(request.age),
            email: Set(request.email.clone()),
            phone_number: Set(request.phone_number.clone()),
            pin_code: Set(request.pin_code),
            status: Set(RequestStatus::Initiated.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        to_domain(result, None, None)
    }

    async fn save_transition(
        &self,
        request: &TestRequest,
        expected: RequestStatus,
    ) -> Result<TestRequest, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Row-level compare-and-set: a concurrent transition makes this a no-op
        let updated = test_requests::Entity::update_many()
            .col_expr(
                test_requests::Column::Status,
                Expr::value(request.status.to_string()),
            )
            .filter(test_requests::Column::Id.eq(request.id.0))
            .filter(test_requests::Column::Status.eq(expected.to_string()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if updated.rows_affected == 0 {
            let current = test_requests::Entity::find_by_id(request.id.0)
                .one(&txn)
                .await
                .map_err(db_err)?;
            txn.rollback().await.map_err(db_err)?;

            return Err(match current {
                None => DomainError::NotFound(format!(
                    "test request {} does not exist",
                    request.id
                )),
                Some(current) => DomainError::InvalidStateTransition(format!(
                    "test request {} is {}, expected {}",
                    request.id, current.status, expected
                )),
            });
        }

        if let Some(lab_result) = &request.lab_result {
            upsert_lab_result(&txn, request.id, lab_result).await?;
        }
        if let Some(consultation) = &request.consultation {
            upsert_consultation(&txn, request.id, consultation).await?;
        }

        txn.commit().await.map_err(db_err)?;

        find_one(&self.db, request.id).await?.ok_or_else(|| {
            DomainError::Internal(format!(
                "test request {} disappeared after update",
                request.id
            ))
        })
    }
}

async fn find_one<C>(db: &C, id: TestRequestId) -> Result<Option<TestRequest>, DomainError>
where
    C: ConnectionTrait,
{
    let result = test_requests::Entity::find_by_id(id.0)
        .one(db)
        .await
        .map_err(db_err)?;

    match result {
        Some(model) => Ok(hydrate(db, vec![model]).await?.pop()),
        None => Ok(None),
    }
}

async fn upsert_lab_result<C>(
    db: &C,
    id: TestRequestId,
    lab_result: &LabResult,
) -> Result<(), DomainError>
where
    C: ConnectionTrait,
{
    let model = lab_results::ActiveModel {
        request_id: Set(id.0),
        tester_id: Set(lab_result.tester_id.0),
        blood_pressure: Set(lab_result.blood_pressure.clone()),
        heart_beat: Set(lab_result.heart_beat.clone()),
        temperature: Set(lab_result.temperature.clone()),
        oxygen_level: Set(lab_result.oxygen_level.clone()),
        comments: Set(lab_result.comments.clone()),
        result: Set(lab_result.result.map(|r| r.to_string())),
        updated_on: Set(lab_result.updated_on.fixed_offset()),
    };

    lab_results::Entity::insert(model)
        .on_conflict(
            OnConflict::column(lab_results::Column::RequestId)
                .update_columns([
                    lab_results::Column::TesterId,
                    lab_results::Column::BloodPressure,
                    lab_results::Column::HeartBeat,
                    lab_results::Column::Temperature,
                    lab_results::Column::OxygenLevel,
                    lab_results::Column::Comments,
                    lab_results::Column::Result,
                    lab_results::Column::UpdatedOn,
                ])
                .to_owned(),
        )
        .exec(db)
        .await
        .map_err(db_err)?;

    Ok(())
}

async fn upsert_consultation<C>(
    db: &C,
    id: TestRequestId,
    consultation: &Consultation,
) -> Result<(), DomainError>
where
    C: ConnectionTrait,
{
    let model = consultations::ActiveModel {
        request_id: Set(id.0),
        doctor_id: Set(consultation.doctor_id.0),
        suggestion: Set(consultation.suggestion.map(|s| s.to_string())),
        comments: Set(consultation.comments.clone()),
        updated_on: Set(consultation.updated_on.fixed_offset()),
    };

    consultations::Entity::insert(model)
        .on_conflict(
            OnConflict::column(consultations::Column::RequestId)
                .update_columns([
                    consultations::Column::DoctorId,
                    consultations::Column::Suggestion,
                    consultations::Column::Comments,
                    consultations::Column::UpdatedOn,
                ])
                .to_owned(),
        )
        .exec(db)
        .await
        .map_err(db_err)?;

    Ok(())
}

/// Attach lab results and consultations to request rows, preserving row order
async fn hydrate<C>(
    db: &C,
    models: Vec<test_requests::Model>,
) -> Result<Vec<TestRequest>, DomainError>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = models.iter().map(|m| m.id).collect();

    let mut labs: HashMap<i64, lab_results::Model> = lab_results::Entity::find()
        .filter(lab_results::Column::RequestId.is_in(ids.clone()))
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|m| (m.request_id, m))
        .collect();

    let mut consultations: HashMap<i64, consultations::Model> = consultations::Entity::find()
        .filter(consultations::Column::RequestId.is_in(ids))
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|m| (m.request_id, m))
        .collect();

    models
        .into_iter()
        .map(|m| {
            let lab = labs.remove(&m.id);
            let consultation = consultations.remove(&m.id);
            to_domain(m, lab, consultation)
        })
        .collect()
}

/// Convert SeaORM models to the domain aggregate
fn to_domain(
    model: test_requests::Model,
    lab: Option<lab_results::Model>,
    consultation: Option<consultations::Model>,
) -> Result<TestRequest, DomainError> {
    let lab_result = lab
        .map(|l| -> Result<LabResult, DomainError> {
            Ok(LabResult {
                result: l
                    .result
                    .map(|r| r.parse::<TestStatus>())
                    .transpose()
                    .map_err(DomainError::Internal)?,
                blood_pressure: l.blood_pressure,
                heart_beat: l.heart_beat,
                temperature: l.temperature,
                oxygen_level: l.oxygen_level,
                comments: l.comments,
                tester_id: UserId(l.tester_id),
                updated_on: l.updated_on.with_timezone(&Utc),
            })
        })
        .transpose()?;

    let consultation = consultation
        .map(|c| -> Result<Consultation, DomainError> {
            Ok(Consultation {
                suggestion: c
                    .suggestion
                    .map(|s| s.parse::<DoctorSuggestion>())
                    .transpose()
                    .map_err(DomainError::Internal)?,
                comments: c.comments,
                doctor_id: UserId(c.doctor_id),
                updated_on: c.updated_on.with_timezone(&Utc),
            })
        })
        .transpose()?;

    Ok(TestRequest {
        id: TestRequestId(model.id),
        created_by: UserId(model.created_by),
        gender: model.gender.parse().map_err(DomainError::Internal)?,
        status: model.status.parse().map_err(DomainError::Internal)?,
        name: model.name,
        address: model.address,
        age: model.age,
        email: model.email,
        phone_number: model.phone_number,
        pin_code: model.pin_code,
        created: model.created_at.with_timezone(&Utc),
        lab_result,
        consultation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Gender;
    use chrono::FixedOffset;
    use uuid::Uuid;

    fn row(status: &str) -> test_requests::Model {
        test_requests::Model {
            id: 9,
            created_by: Uuid::new_v4(),
            name: "Jane Patient".to_string(),
            gender: "FEMALE".to_string(),
            address: "12 Main Road".to_string(),
            age: 34,
            email: "jane@example.com".to_string(),
            phone_number: "9876543210".to_string(),
            pin_code: 560001,
            status: status.to_string(),
            created_at: Utc::now().with_timezone(&FixedOffset::east_opt(0).unwrap()),
        }
    }

    #[test]
    fn converts_row_with_sub_records() {
        let tester = Uuid::new_v4();
        let doctor = Uuid::new_v4();
        let now = Utc::now().fixed_offset();
        let lab = lab_results::Model {
            request_id: 9,
            tester_id: tester,
            blood_pressure: Some("120/80".to_string()),
            heart_beat: None,
            temperature: None,
            oxygen_level: None,
            comments: None,
            result: Some("POSITIVE".to_string()),
            updated_on: now,
        };
        let consultation = consultations::Model {
            request_id: 9,
            doctor_id: doctor,
            suggestion: Some("HOME_QUARANTINE".to_string()),
            comments: Some("Take Rest".to_string()),
            updated_on: now,
        };

        let request = to_domain(row("COMPLETED"), Some(lab), Some(consultation)).unwrap();

        assert_eq!(request.id, TestRequestId(9));
        assert_eq!(request.status, RequestStatus::Completed);
        assert_eq!(request.gender, Gender::Female);
        assert_eq!(request.tester(), Some(UserId(tester)));
        assert_eq!(
            request.lab_result.unwrap().result,
            Some(TestStatus::Positive)
        );
        assert_eq!(
            request.consultation.unwrap().suggestion,
            Some(DoctorSuggestion::HomeQuarantine)
        );
    }

    #[test]
    fn corrupt_status_is_an_internal_error() {
        let result = to_domain(row("ON_HOLD"), None, None);
        assert!(matches!(result, Err(DomainError::Internal(_))));
    }
}
