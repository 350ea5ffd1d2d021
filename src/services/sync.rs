//! Party propagation between an order and its builty.
//!
//! Both records carry their own consignor, consignee and booking agent. A
//! write on either side copies its non-empty selections onto the other, and
//! the receiving row's `version` is bumped like any other write.

use crate::{
    entities::{builty, order, OrderStatus},
    errors::ServiceError,
    services::audit,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartySelection {
    pub consignor_id: Option<i32>,
    pub consignee_id: Option<i32>,
    pub booking_agent_id: Option<i32>,
}

impl PartySelection {
    pub fn of_order(model: &order::Model) -> Self {
        Self {
            consignor_id: model.consignor_id,
            consignee_id: model.consignee_id,
            booking_agent_id: model.booking_agent_id,
        }
    }

    pub fn of_builty(model: &builty::Model) -> Self {
        Self {
            consignor_id: model.consignor_id,
            consignee_id: model.consignee_id,
            booking_agent_id: model.booking_agent_id,
        }
    }

    /// `target` with every selection present in `self` written over it.
    /// Empty selections never clear the target.
    pub fn overlay(&self, target: PartySelection) -> PartySelection {
        PartySelection {
            consignor_id: self.consignor_id.or(target.consignor_id),
            consignee_id: self.consignee_id.or(target.consignee_id),
            booking_agent_id: self.booking_agent_id.or(target.booking_agent_id),
        }
    }
}

/// Copies `parties` onto the builty of `order_id`, if there is one.
pub async fn push_to_builty<C>(
    conn: &C,
    order_id: i32,
    parties: PartySelection,
) -> Result<Option<builty::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    let Some(existing) = builty::Entity::find()
        .filter(builty::Column::OrderId.eq(order_id))
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    let current = PartySelection::of_builty(&existing);
    let merged = parties.overlay(current);
    if merged == current {
        return Ok(Some(existing));
    }

    debug!(order_id, builty_id = existing.id, "Pushing order parties to builty");
    let builty_id = existing.id;
    let version = existing.version;
    let mut active: builty::ActiveModel = existing.into();
    active.consignor_id = Set(merged.consignor_id);
    active.consignee_id = Set(merged.consignee_id);
    active.booking_agent_id = Set(merged.booking_agent_id);
    active.version = Set(version + 1);
    let updated = active.update(conn).await?;

    audit::record(
        conn,
        "Builty",
        builty_id,
        audit::UPDATE,
        Some(format!("Parties synced from order #{}", order_id)),
    )
    .await?;

    Ok(Some(updated))
}

/// Copies `parties` onto `order`, optionally forcing its status in the same
/// write. Nothing is written when neither would change the row.
pub async fn push_to_order<C>(
    conn: &C,
    order: order::Model,
    parties: PartySelection,
    status: Option<&OrderStatus>,
) -> Result<order::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let current = PartySelection::of_order(&order);
    let merged = parties.overlay(current);
    let status_changes = status.is_some_and(|s| s.as_str() != order.status);
    if merged == current && !status_changes {
        return Ok(order);
    }

    debug!(order_id = order.id, "Pushing builty parties to order");
    let version = order.version;
    let mut active: order::ActiveModel = order.into();
    active.consignor_id = Set(merged.consignor_id);
    active.consignee_id = Set(merged.consignee_id);
    active.booking_agent_id = Set(merged.booking_agent_id);
    if let Some(status) = status {
        active.status = Set(status.as_str().to_string());
    }
    active.version = Set(version + 1);
    Ok(active.update(conn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_keeps_target_where_source_is_empty() {
        let source = PartySelection {
            consignor_id: None,
            consignee_id: Some(7),
            booking_agent_id: None,
        };
        let target = PartySelection {
            consignor_id: Some(1),
            consignee_id: Some(3),
            booking_agent_id: Some(2),
        };

        assert_eq!(
            source.overlay(target),
            PartySelection {
                consignor_id: Some(1),
                consignee_id: Some(7),
                booking_agent_id: Some(2),
            }
        );
    }

    #[test]
    fn empty_overlay_is_identity() {
        let target = PartySelection {
            consignor_id: Some(4),
            ..Default::default()
        };
        assert_eq!(PartySelection::default().overlay(target), target);
    }
}
