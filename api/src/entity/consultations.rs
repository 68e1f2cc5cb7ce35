use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "consultations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub request_id: i64,
    pub doctor_id: Uuid,
    pub suggestion: Option<String>,
    pub comments: Option<String>,
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
