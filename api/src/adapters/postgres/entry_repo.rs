//! PostgreSQL adapter for EntryRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::domain::entities::{Category, Entry, EntryId};
use crate::domain::ports::EntryRepository;
use crate::entity::entries;
use crate::error::DomainError;

/// PostgreSQL implementation of EntryRepository
pub struct PostgresEntryRepository {
    db: DatabaseConnection,
}

impl PostgresEntryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn in_pool(category: &Category, class_year: Option<i32>) -> sea_orm::Condition {
    let mut condition =
        sea_orm::Condition::all().add(entries::Column::Category.eq(category.as_str()));
    if let Some(year) = class_year {
        condition = condition.add(entries::Column::ClassYear.eq(year));
    }
    condition
}

#[async_trait]
impl EntryRepository for PostgresEntryRepository {
    async fn find_pool(
        &self,
        category: &Category,
        class_year: Option<i32>,
    ) -> Result<Vec<Entry>, DomainError> {
        let results = entries::Entity::find()
            .filter(in_pool(category, class_year))
            .order_by_asc(entries::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_many(
        &self,
        category: &Category,
        ids: &[EntryId],
    ) -> Result<Vec<Entry>, DomainError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let results = entries::Entity::find()
            .filter(entries::Column::Category.eq(category.as_str()))
            .filter(entries::Column::Id.is_in(ids.iter().map(|id| id.as_str())))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_top_by_score(
        &self,
        category: &Category,
        class_year: Option<i32>,
        limit: u64,
    ) -> Result<Vec<Entry>, DomainError> {
        let results = entries::Entity::find()
            .filter(in_pool(category, class_year))
            .order_by_desc(entries::Column::Score)
            .order_by_asc(entries::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

impl From<entries::Model> for Entry {
    fn from(model: entries::Model) -> Self {
        Entry {
            id: EntryId(model.id),
            category: Category(model.category),
            score: model.score,
            class_year: model.class_year,
        }
    }
}
