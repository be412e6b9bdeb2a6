//! `buckets` table
//!
//! `pairs` holds a JSON array of `[first, second]` id arrays.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "buckets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub category: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub subcategory: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub bucket_index: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub pairs: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
