//! PostgreSQL adapter for BucketRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
};

use crate::domain::entities::{Bucket, Category, NormalizedPair, Subcategory};
use crate::domain::ports::BucketRepository;
use crate::entity::buckets;
use crate::error::DomainError;

/// PostgreSQL implementation of BucketRepository
pub struct PostgresBucketRepository {
    db: DatabaseConnection,
}

impl PostgresBucketRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active_model(bucket: &Bucket) -> Result<buckets::ActiveModel, DomainError> {
    let pairs = serde_json::to_value(&bucket.pairs)
        .map_err(|e| DomainError::Internal(format!("Failed to encode bucket pairs: {}", e)))?;

    Ok(buckets::ActiveModel {
        category: Set(bucket.category.0.clone()),
        subcategory: Set(bucket.subcategory.as_str().to_string()),
        bucket_index: Set(bucket.index as i32),
        pairs: Set(pairs),
        created_at: Set(bucket.created_at.fixed_offset()),
    })
}

#[async_trait]
impl BucketRepository for PostgresBucketRepository {
    async fn replace_for_category(
        &self,
        category: &Category,
        buckets: &[Bucket],
    ) -> Result<(), DomainError> {
        let models = buckets
            .iter()
            .map(to_active_model)
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        buckets::Entity::delete_many()
            .filter(buckets::Column::Category.eq(category.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if !models.is_empty() {
            buckets::Entity::insert_many(models)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find(
        &self,
        category: &Category,
        subcategory: Subcategory,
        index: u32,
    ) -> Result<Option<Bucket>, DomainError> {
        let result = buckets::Entity::find_by_id((
            category.0.clone(),
            subcategory.as_str().to_string(),
            index as i32,
        ))
        .one(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Bucket::try_from).transpose()
    }
}

impl TryFrom<buckets::Model> for Bucket {
    type Error = DomainError;

    fn try_from(model: buckets::Model) -> Result<Self, Self::Error> {
        let subcategory: Subcategory = model
            .subcategory
            .parse()
            .map_err(|_| DomainError::Database(format!("Unknown subcategory {}", model.subcategory)))?;
        let pairs: Vec<NormalizedPair> = serde_json::from_value(model.pairs)
            .map_err(|e| DomainError::Database(format!("Malformed bucket pairs: {}", e)))?;

        Ok(Bucket {
            category: Category(model.category),
            subcategory,
            index: model.bucket_index as u32,
            pairs,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}
