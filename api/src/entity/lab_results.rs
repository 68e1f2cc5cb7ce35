use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub request_id: i64,
    pub tester_id: Uuid,
    pub blood_pressure: Option<String>,
    pub heart_beat: Option<String>,
    pub temperature: Option<String>,
    pub oxygen_level: Option<String>,
    pub comments: Option<String>,
    pub result: Option<String>,
    pub updated_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_requests::Entity",
        from = "Column::RequestId",
        to = "super::test_requests::Column::Id"
    )]
    TestRequest,
}

impl Related<super::test_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
