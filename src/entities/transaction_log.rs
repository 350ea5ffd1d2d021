use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only audit row. Never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "transaction_logs")]
#[schema(as = TransactionLog)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Entity name, e.g. "Order" or "Builty"
    pub entity: String,
    pub entity_id: i32,
    /// CREATE, UPDATE, DELETE or STATUS:<value>
    pub action: String,
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            return Err(DbErr::Custom("transaction logs are append-only".into()));
        }
        if self.at.is_not_set() {
            self.at = Set(Utc::now());
        }
        Ok(self)
    }
}
