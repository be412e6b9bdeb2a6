//! PostgreSQL adapter for UserRepository

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::domain::entities::{DailyVoteRecord, EntryId, NewUser, Subcategory, User};
use crate::domain::ports::UserRepository;
use crate::entity::{entries, user_daily_votes, users};
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Daily records of a user, oldest first
pub(super) async fn load_daily_records<C: ConnectionTrait>(
    conn: &C,
    uid: &str,
) -> Result<Vec<DailyVoteRecord>, DomainError> {
    let rows = user_daily_votes::Entity::find()
        .filter(user_daily_votes::Column::Uid.eq(uid))
        .order_by_asc(user_daily_votes::Column::VoteDate)
        .all(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    rows.into_iter().map(DailyVoteRecord::try_from).collect()
}

pub(super) fn user_from_parts(model: users::Model, votes: Vec<DailyVoteRecord>) -> User {
    User {
        uid: model.uid,
        email: model.email,
        class_year: model.class_year,
        banned: model.banned,
        votes,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(super) fn counts_to_json(counts: &BTreeMap<Subcategory, u32>) -> serde_json::Value {
    serde_json::Value::Object(
        counts
            .iter()
            .map(|(sub, n)| (sub.as_str().to_string(), serde_json::Value::from(*n)))
            .collect(),
    )
}

impl TryFrom<user_daily_votes::Model> for DailyVoteRecord {
    type Error = DomainError;

    fn try_from(model: user_daily_votes::Model) -> Result<Self, Self::Error> {
        let counts: BTreeMap<Subcategory, u32> = serde_json::from_value(model.counts)
            .map_err(|e| {
                DomainError::Database(format!(
                    "Malformed vote counts for {} on {}: {}",
                    model.uid, model.vote_date, e
                ))
            })?;
        Ok(DailyVoteRecord {
            date: model.vote_date,
            counts,
        })
    }
}

/// Insert an empty record for `date`; an existing one is left untouched
pub(super) async fn insert_empty_record<C: ConnectionTrait>(
    conn: &C,
    uid: &str,
    date: NaiveDate,
) -> Result<(), DbErr> {
    let model = user_daily_votes::ActiveModel {
        uid: Set(uid.to_string()),
        vote_date: Set(date),
        counts: Set(serde_json::json!({})),
    };

    user_daily_votes::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                user_daily_votes::Column::Uid,
                user_daily_votes::Column::VoteDate,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(uid.to_string())
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match result {
            Some(model) => {
                let votes = load_daily_records(&self.db, uid).await?;
                Ok(Some(user_from_parts(model, votes)))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = users::ActiveModel {
            uid: Set(user.uid.clone()),
            email: Set(user.email.clone()),
            class_year: Set(user.class_year),
            banned: Set(false),
            created_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::AlreadyExists(format!("User {} already exists", user.uid))
            }
            _ => DomainError::Database(e.to_string()),
        })?;

        Ok(user_from_parts(result, vec![]))
    }

    async fn set_class_year(&self, uid: &str, class_year: i32) -> Result<(), DomainError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::ClassYear, Expr::value(class_year))
            .filter(users::Column::Uid.eq(uid))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("User {} not found", uid)));
        }
        Ok(())
    }

    async fn ensure_daily_record(&self, uid: &str, date: NaiveDate) -> Result<(), DomainError> {
        insert_empty_record(&self.db, uid, date)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    DomainError::NotFound(format!("User {} not found", uid))
                }
                _ => DomainError::Database(e.to_string()),
            })
    }

    async fn opt_out(&self, uid: &str, own_entry: &EntryId) -> Result<u64, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let banned = users::Entity::update_many()
            .col_expr(users::Column::Banned, Expr::value(true))
            .filter(users::Column::Uid.eq(uid))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if banned.rows_affected == 0 {
            // Dropping the transaction rolls it back
            return Err(DomainError::NotFound(format!("User {} not found", uid)));
        }

        let deleted = entries::Entity::delete_many()
            .filter(entries::Column::Id.eq(own_entry.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(deleted.rows_affected)
    }
}
