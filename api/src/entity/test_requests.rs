use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "test_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_by: Uuid,
    pub name: String,
    pub gender: String,
    pub address: String,
    pub age: i32,
    pub email: String,
    pub phone_number: String,
    pub pin_code: i32,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::lab_results::Entity")]
    LabResult,
    #[sea_orm(has_one = "super::consultations::Entity")]
    Consultation,
}

impl Related<super::lab_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabResult.def()
    }
}

impl Related<super::consultations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consultation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
