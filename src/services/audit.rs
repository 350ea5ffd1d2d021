use crate::{
    db::DbPool,
    entities::transaction_log::{self, Entity as TransactionLogEntity},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::IntoParams;

pub const CREATE: &str = "CREATE";
pub const UPDATE: &str = "UPDATE";
pub const DELETE: &str = "DELETE";

/// `STATUS:<value>` action recorded when an order's status is overwritten.
pub fn status_action(status: &str) -> String {
    format!("STATUS:{}", status)
}

/// Appends one audit row on `conn`. Callers pass their open transaction so the
/// entry commits or rolls back with the change it describes.
pub async fn record<C>(
    conn: &C,
    entity: &str,
    entity_id: i32,
    action: impl Into<String>,
    note: Option<String>,
) -> Result<transaction_log::Model, DbErr>
where
    C: ConnectionTrait,
{
    let action = action.into();
    debug!(entity, entity_id, action = %action, "Recording audit entry");
    transaction_log::ActiveModel {
        entity: Set(entity.to_string()),
        entity_id: Set(entity_id),
        action: Set(action),
        note: Set(note),
        ..Default::default()
    }
    .insert(conn)
    .await
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditQuery {
    /// Entity name, e.g. `Order`
    pub entity: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub entity_id: Option<i32>,
}

/// Read side of the audit log.
#[derive(Clone)]
pub struct AuditService {
    db_pool: Arc<DbPool>,
    limit: u64,
}

impl AuditService {
    pub fn new(db_pool: Arc<DbPool>, limit: u64) -> Self {
        Self { db_pool, limit }
    }

    /// Most recent entries first.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &AuditQuery) -> Result<Vec<transaction_log::Model>, ServiceError> {
        let mut select = TransactionLogEntity::find();
        if let Some(entity) = query.entity.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            select = select.filter(transaction_log::Column::Entity.eq(entity));
        }
        if let Some(entity_id) = query.entity_id {
            select = select.filter(transaction_log::Column::EntityId.eq(entity_id));
        }

        Ok(select
            .order_by_desc(transaction_log::Column::At)
            .order_by_desc(transaction_log::Column::Id)
            .limit(self.limit)
            .all(&*self.db_pool)
            .await?)
    }
}
