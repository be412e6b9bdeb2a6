//! `users` table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,
    pub email: String,
    #[sea_orm(nullable)]
    pub class_year: Option<i32>,
    pub banned: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_daily_votes::Entity")]
    DailyVotes,
}

impl Related<super::user_daily_votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyVotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
