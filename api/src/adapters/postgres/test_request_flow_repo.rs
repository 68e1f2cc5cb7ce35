//! PostgreSQL adapter for TestRequestFlowRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::db_err;
use crate::domain::entities::{NewTestRequestFlow, TestRequestFlow, TestRequestId, UserId};
use crate::domain::ports::TestRequestFlowRepository;
use crate::entity::test_request_flows;
use crate::error::DomainError;

/// PostgreSQL implementation of TestRequestFlowRepository
pub struct PostgresTestRequestFlowRepository {
    db: DatabaseConnection,
}

impl PostgresTestRequestFlowRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TestRequestFlowRepository for PostgresTestRequestFlowRepository {
    async fn record(&self, flow: &NewTestRequestFlow) -> Result<TestRequestFlow, DomainError> {
        let model = test_request_flows::ActiveModel {
            id: NotSet,
            request_id: Set(flow.request_id.0),
            from_status: Set(flow.from_status.to_string()),
            to_status: Set(flow.to_status.to_string()),
            changed_by: Set(flow.changed_by.0),
            happened_on: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        TestRequestFlow::try_from(result)
    }

    async fn find_by_request(
        &self,
        request_id: &TestRequestId,
    ) -> Result<Vec<TestRequestFlow>, DomainError> {
        let results = test_request_flows::Entity::find()
            .filter(test_request_flows::Column::RequestId.eq(request_id.0))
            .order_by_asc(test_request_flows::Column::HappenedOn)
            .order_by_asc(test_request_flows::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        results.into_iter().map(TestRequestFlow::try_from).collect()
    }
}

impl TryFrom<test_request_flows::Model> for TestRequestFlow {
    type Error = DomainError;

    fn try_from(model: test_request_flows::Model) -> Result<Self, Self::Error> {
        Ok(TestRequestFlow {
            id: model.id,
            request_id: TestRequestId(model.request_id),
            from_status: model.from_status.parse().map_err(DomainError::Internal)?,
            to_status: model.to_status.parse().map_err(DomainError::Internal)?,
            changed_by: UserId(model.changed_by),
            happened_on: model.happened_on.with_timezone(&Utc),
        })
    }
}
