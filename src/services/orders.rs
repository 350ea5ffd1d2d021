use crate::{
    config::{AppConfig, StatusPolicy},
    db::{self, DbPool},
    entities::{
        booking_agent, builty, concerned_person, consignee, consignor, goods, order,
        phone_book, station, Firm, OrderStatus, OrderType,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        audit,
        reference::{ensure_exists, fetch},
        sync::{self, PartySelection},
    },
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use sea_orm::{
    sea_query::{Alias, Expr, Func, Query, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

const ENTITY: &str = "Order";

pub(crate) fn validate_firm(value: &str) -> Result<(), ValidationError> {
    Firm::from_str(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("firm");
        err.message = Some(Cow::from("Firm must be one of the registered company names"));
        err
    })
}

fn validate_order_type(value: &str) -> Result<(), ValidationError> {
    OrderType::from_str(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("order_type");
        err.message = Some(Cow::from("Order type must be PARTY or AGENT"));
        err
    })
}

/// Flat order form, as posted by the order screens or a JSON client.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct OrderInput {
    #[serde(default, deserialize_with = "crate::common::optional_date")]
    #[validate(required)]
    #[schema(value_type = Option<String>, format = Date, example = "2024-06-01")]
    pub date: Option<NaiveDate>,
    /// One of the registered company names; required on create and edit
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    #[validate(required, custom = "validate_firm")]
    pub firm: Option<String>,
    /// `PARTY` (default) or `AGENT`
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    #[validate(custom = "validate_order_type")]
    pub order_type: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub from_station_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub to_station_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub consignor_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub consignee_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub booking_agent_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub consignor_person_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub consignor_phone_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub consignee_person_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub consignee_phone_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub agent_person_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub agent_phone_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    #[validate(required)]
    pub goods_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_f64")]
    #[validate(range(min = 0.0, message = "Weight cannot be negative"))]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "crate::common::optional_f64")]
    #[validate(range(min = 0.0, message = "Rate cannot be negative"))]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    #[validate(length(max = 512, message = "Description must be at most 512 characters"))]
    pub description: Option<String>,
    /// Initial status on create (default `NEW`); on edit, omitted keeps the current one
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    pub status: Option<String>,
    /// Rejects the edit with 409 when the stored version differs
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub expected_version: Option<i32>,
}

/// Validated and parsed form of [`OrderInput`].
#[derive(Debug, Clone)]
struct OrderFields {
    date: NaiveDate,
    firm: Firm,
    order_type: OrderType,
    goods_id: i32,
    status: Option<OrderStatus>,
    input: OrderInput,
}

impl OrderInput {
    fn check(self) -> Result<OrderFields, ServiceError> {
        self.validate()?;
        let date = self
            .date
            .ok_or_else(|| ServiceError::field("date", "Date is required"))?;
        let goods_id = self
            .goods_id
            .ok_or_else(|| ServiceError::field("goods_id", "Goods is required"))?;
        let firm = self
            .firm
            .as_deref()
            .ok_or_else(|| ServiceError::field("firm", "Firm is required"))
            .and_then(|raw| {
                Firm::from_str(raw).map_err(|_| {
                    ServiceError::field("firm", "Firm must be one of the registered company names")
                })
            })?;
        let order_type = match self.order_type.as_deref() {
            Some(raw) => OrderType::from_str(raw)
                .map_err(|_| ServiceError::field("order_type", "Order type must be PARTY or AGENT"))?,
            None => OrderType::default(),
        };
        let status = self.status.as_deref().map(OrderStatus::parse);

        Ok(OrderFields {
            date,
            firm,
            order_type,
            goods_id,
            status,
            input: self,
        })
    }
}

impl OrderFields {
    fn parties(&self) -> PartySelection {
        PartySelection {
            consignor_id: self.input.consignor_id,
            consignee_id: self.input.consignee_id,
            booking_agent_id: self.input.booking_agent_id,
        }
    }

    /// Copies every mutable column onto `active`; status and version are left
    /// to the caller.
    fn apply(&self, active: &mut order::ActiveModel) {
        let input = &self.input;
        active.date = Set(self.date);
        active.firm = Set(self.firm);
        active.order_type = Set(self.order_type);
        active.from_station_id = Set(input.from_station_id);
        active.to_station_id = Set(input.to_station_id);
        active.consignor_id = Set(input.consignor_id);
        active.consignee_id = Set(input.consignee_id);
        active.booking_agent_id = Set(input.booking_agent_id);
        active.consignor_person_id = Set(input.consignor_person_id);
        active.consignor_phone_id = Set(input.consignor_phone_id);
        active.consignee_person_id = Set(input.consignee_person_id);
        active.consignee_phone_id = Set(input.consignee_phone_id);
        active.agent_person_id = Set(input.agent_person_id);
        active.agent_phone_id = Set(input.agent_phone_id);
        active.goods_id = Set(self.goods_id);
        active.weight = Set(input.weight);
        active.rate = Set(input.rate);
        active.description = Set(input.description.clone());
    }
}

/// Referenced rows must exist before they are written.
async fn check_references<C>(conn: &C, fields: &OrderFields) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let input = &fields.input;
    fetch::<goods::Entity, _>(conn, fields.goods_id, "Goods").await?;
    ensure_exists::<station::Entity, _>(conn, input.from_station_id, "Station").await?;
    ensure_exists::<station::Entity, _>(conn, input.to_station_id, "Station").await?;
    ensure_exists::<consignor::Entity, _>(conn, input.consignor_id, "Consignor").await?;
    ensure_exists::<consignee::Entity, _>(conn, input.consignee_id, "Consignee").await?;
    ensure_exists::<booking_agent::Entity, _>(conn, input.booking_agent_id, "Booking agent").await?;
    for person_id in [
        input.consignor_person_id,
        input.consignee_person_id,
        input.agent_person_id,
    ] {
        ensure_exists::<concerned_person::Entity, _>(conn, person_id, "Contact").await?;
    }
    for phone_id in [
        input.consignor_phone_id,
        input.consignee_phone_id,
        input.agent_phone_id,
    ] {
        ensure_exists::<phone_book::Entity, _>(conn, phone_id, "Phone").await?;
    }
    Ok(())
}

fn matches_or_null<C: ColumnTrait, V>(col: C, value: Option<V>) -> SimpleExpr
where
    V: Into<sea_orm::Value>,
{
    match value {
        Some(v) => col.eq(v),
        None => col.is_null(),
    }
}

fn contains_ci<C: ColumnTrait>(col: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(pattern.to_string())
}

fn as_text_contains<C: ColumnTrait>(col: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::cast_as(Expr::col(col), Alias::new("TEXT"))))
        .like(pattern.to_string())
}

/// `active` (the default), `dispatched`, `all`, or a literal status.
pub(crate) fn status_condition(filter: Option<&str>) -> Option<SimpleExpr> {
    let filter = filter.map(str::trim).filter(|f| !f.is_empty()).unwrap_or("active");
    if filter.eq_ignore_ascii_case("all") {
        None
    } else if filter.eq_ignore_ascii_case("active") {
        Some(
            order::Column::Status
                .is_in(OrderStatus::ACTIVE.iter().map(|s| s.as_str().to_string())),
        )
    } else if filter.eq_ignore_ascii_case("dispatched") {
        Some(order::Column::Status.eq(OrderStatus::Dispatched.as_str()))
    } else {
        Some(order::Column::Status.eq(filter))
    }
}

fn search_condition(q: &str) -> Condition {
    let pattern = format!("%{}%", q.to_lowercase());
    let named = |table: Alias, col: Alias, fk: order::Column| {
        fk.in_subquery(
            Query::select()
                .column(Alias::new("id"))
                .from(table)
                .and_where(Expr::expr(Func::lower(Expr::col(col))).like(pattern.clone()))
                .to_owned(),
        )
    };

    Condition::any()
        .add(as_text_contains(order::Column::Id, &pattern))
        .add(as_text_contains(order::Column::Date, &pattern))
        .add(contains_ci(order::Column::Firm, &pattern))
        .add(named(Alias::new("consignors"), Alias::new("name"), order::Column::ConsignorId))
        .add(named(Alias::new("consignees"), Alias::new("name"), order::Column::ConsigneeId))
        .add(named(Alias::new("stations"), Alias::new("name"), order::Column::FromStationId))
        .add(named(Alias::new("stations"), Alias::new("name"), order::Column::ToStationId))
        .add(named(Alias::new("goods"), Alias::new("description"), order::Column::GoodsId))
        .add(named(
            Alias::new("booking_agents"),
            Alias::new("name"),
            order::Column::BookingAgentId,
        ))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// `active` (default), `dispatched`, `all` or an exact status
    pub status: Option<String>,
    /// Case-insensitive substring over id, date, firm, parties, stations, goods and agent
    pub q: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StatusInput {
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    pub status: Option<String>,
}

/// An order with the display names of everything it references.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: order::Model,
    pub from_station_name: Option<String>,
    pub to_station_name: Option<String>,
    pub consignor_name: Option<String>,
    pub consignee_name: Option<String>,
    pub booking_agent_name: Option<String>,
    pub goods_description: Option<String>,
    pub builty_id: Option<i32>,
}

pub(crate) async fn name_map<E, C, F>(
    conn: &C,
    id_col: E::Column,
    ids: Vec<i32>,
    label: F,
) -> Result<HashMap<i32, String>, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    F: Fn(E::Model) -> (i32, String),
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(E::find()
        .filter(id_col.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(label)
        .collect())
}

#[derive(Debug, Clone)]
pub struct OrderSettings {
    pub duplicate_window: chrono::Duration,
    pub search_limit: u64,
    pub status_policy: StatusPolicy,
}

impl From<&AppConfig> for OrderSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            duplicate_window: cfg.duplicate_order_window(),
            search_limit: cfg.search_result_limit,
            status_policy: cfg.status_policy(),
        }
    }
}

/// Order lifecycle: create with duplicate suppression, edit with builty sync,
/// status overwrite, delete, listing and detail.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    settings: OrderSettings,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, settings: OrderSettings) -> Self {
        Self {
            db_pool,
            event_sender,
            settings,
        }
    }

    fn check_policy(&self, from: &OrderStatus, to: &OrderStatus) -> Result<(), ServiceError> {
        if self.settings.status_policy == StatusPolicy::Strict && !from.can_transition_to(to) {
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot move order from {} to {}",
                from, to
            )));
        }
        Ok(())
    }

    /// Text written to the status column: canonical under the strict policy,
    /// the trimmed input otherwise.
    fn status_text(&self, raw: &str, parsed: &OrderStatus) -> String {
        match self.settings.status_policy {
            StatusPolicy::Strict => parsed.as_str().to_string(),
            StatusPolicy::Permissive => raw.trim().to_string(),
        }
    }

    /// Creates an order. An identical submission inside the duplicate window
    /// is rejected instead of stored twice.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: OrderInput) -> Result<order::Model, ServiceError> {
        let fields = input.check()?;
        let status = fields.status.clone().unwrap_or_default();
        self.check_policy(&OrderStatus::New, &status)?;
        let status_text = match fields.input.status.as_deref() {
            Some(raw) => self.status_text(raw, &status),
            None => status.as_str().to_string(),
        };

        let (txn, scope) = db::begin(&self.db_pool, "Order creation").await?;
        let result = async {
            check_references(&txn, &fields).await?;
            self.reject_duplicate(&txn, &fields).await?;

            let mut active = order::ActiveModel {
                status: Set(status_text),
                ..Default::default()
            };
            fields.apply(&mut active);
            let created = active.insert(&txn).await?;
            audit::record(&txn, ENTITY, created.id, audit::CREATE, None).await?;
            Ok::<_, ServiceError>(created)
        }
        .await;

        let created = scope.finish(txn, result).await.map_err(|e| {
            if !matches!(e, ServiceError::DuplicateSubmission(_)) {
                error!(error = %e, "Failed to create order");
            }
            e
        })?;

        counter!("transport_orders_created_total", 1);
        info!(order_id = created.id, status = %created.status, "Order created");
        self.event_sender.publish(Event::OrderCreated(created.id)).await;
        Ok(created)
    }

    async fn reject_duplicate<C>(&self, conn: &C, fields: &OrderFields) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let input = &fields.input;
        let latest = order::Entity::find()
            .filter(order::Column::Date.eq(fields.date))
            .filter(order::Column::Firm.eq(fields.firm))
            .filter(order::Column::OrderType.eq(fields.order_type))
            .filter(matches_or_null(order::Column::ConsignorId, input.consignor_id))
            .filter(matches_or_null(order::Column::ConsigneeId, input.consignee_id))
            .filter(order::Column::GoodsId.eq(fields.goods_id))
            .filter(matches_or_null(order::Column::Weight, input.weight))
            .filter(matches_or_null(order::Column::Rate, input.rate))
            .order_by_desc(order::Column::Id)
            .one(conn)
            .await?;

        if let Some(existing) = latest {
            if existing.created_at >= Utc::now() - self.settings.duplicate_window {
                counter!("transport_orders_duplicate_rejected_total", 1);
                warn!(existing_order_id = existing.id, "Duplicate order submission suppressed");
                return Err(ServiceError::DuplicateSubmission(
                    "Order already exists. Duplicate submission prevented.".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Replaces every mutable field and pushes the non-empty parties onto the
    /// order's builty, if any.
    #[instrument(skip(self, input))]
    pub async fn edit(&self, id: i32, input: OrderInput) -> Result<order::Model, ServiceError> {
        let fields = input.check()?;

        let (txn, scope) = db::begin(&self.db_pool, "Order update").await?;
        let result = async {
            let existing = fetch::<order::Entity, _>(&txn, id, ENTITY).await?;
            if let Some(expected) = fields.input.expected_version {
                if expected != existing.version {
                    return Err(ServiceError::ConcurrentModification {
                        entity: ENTITY,
                        id,
                    });
                }
            }
            if let Some(status) = &fields.status {
                self.check_policy(&OrderStatus::parse(&existing.status), status)?;
            }
            check_references(&txn, &fields).await?;

            let version = existing.version;
            let mut active: order::ActiveModel = existing.into();
            fields.apply(&mut active);
            if let (Some(raw), Some(status)) = (fields.input.status.as_deref(), &fields.status) {
                active.status = Set(self.status_text(raw, status));
            }
            active.version = Set(version + 1);
            let updated = active.update(&txn).await?;

            sync::push_to_builty(&txn, id, fields.parties()).await?;
            audit::record(&txn, ENTITY, id, audit::UPDATE, None).await?;
            Ok::<_, ServiceError>(updated)
        }
        .await;

        let updated = scope.finish(txn, result).await.map_err(|e| {
            error!(order_id = id, error = %e, "Failed to update order");
            e
        })?;

        counter!("transport_orders_updated_total", 1);
        info!(order_id = id, version = updated.version, "Order updated");
        self.event_sender.publish(Event::OrderUpdated(id)).await;
        Ok(updated)
    }

    /// Overwrites the status. Any text is accepted under the permissive
    /// policy; the strict policy applies the transition table.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: i32, raw_status: &str) -> Result<order::Model, ServiceError> {
        if raw_status.trim().is_empty() {
            return Err(ServiceError::field("status", "Status is required"));
        }
        let next = OrderStatus::parse(raw_status);
        let next_text = self.status_text(raw_status, &next);

        let (txn, scope) = db::begin(&self.db_pool, "Order status update").await?;
        let result = async {
            let existing = fetch::<order::Entity, _>(&txn, id, ENTITY).await?;
            let previous = existing.status.clone();
            self.check_policy(&OrderStatus::parse(&previous), &next)?;

            let version = existing.version;
            let mut active: order::ActiveModel = existing.into();
            active.status = Set(next_text.clone());
            active.version = Set(version + 1);
            let updated = active.update(&txn).await?;

            audit::record(&txn, ENTITY, id, audit::status_action(&next_text), None).await?;
            Ok::<_, ServiceError>((previous, updated))
        }
        .await;

        let (previous, updated) = scope.finish(txn, result).await?;
        info!(order_id = id, from = %previous, to = %updated.status, "Order status changed");
        self.event_sender
            .publish(Event::OrderStatusChanged {
                order_id: id,
                old_status: previous,
                new_status: updated.status.clone(),
            })
            .await;
        Ok(updated)
    }

    /// Deletes the order together with its builty.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let (txn, scope) = db::begin(&self.db_pool, "Order deletion").await?;
        let result = async {
            let existing = fetch::<order::Entity, _>(&txn, id, ENTITY).await?;
            if let Some(builty) = builty::Entity::find()
                .filter(builty::Column::OrderId.eq(id))
                .one(&txn)
                .await?
            {
                builty::Entity::delete_by_id(builty.id).exec(&txn).await?;
                audit::record(
                    &txn,
                    "Builty",
                    builty.id,
                    audit::DELETE,
                    Some(format!("Deleted with order #{}", id)),
                )
                .await?;
            }
            order::Entity::delete_by_id(existing.id).exec(&txn).await?;
            audit::record(&txn, ENTITY, id, audit::DELETE, None).await?;
            Ok::<_, ServiceError>(())
        }
        .await;

        scope.finish(txn, result).await?;
        info!(order_id = id, "Order deleted");
        self.event_sender.publish(Event::OrderDeleted(id)).await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<OrderView, ServiceError> {
        let order = fetch::<order::Entity, _>(&*self.db_pool, id, ENTITY).await?;
        let mut views = self.decorate(vec![order]).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Newest first, capped at the configured search limit.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &OrderListQuery) -> Result<Vec<OrderView>, ServiceError> {
        let mut select = order::Entity::find();
        if let Some(cond) = status_condition(query.status.as_deref()) {
            select = select.filter(cond);
        }
        if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            select = select.filter(search_condition(q));
        }

        let orders = select
            .order_by_desc(order::Column::Id)
            .limit(self.settings.search_limit)
            .all(&*self.db_pool)
            .await?;
        self.decorate(orders).await
    }

    async fn decorate(&self, orders: Vec<order::Model>) -> Result<Vec<OrderView>, ServiceError> {
        let db = &*self.db_pool;
        let collect = |f: fn(&order::Model) -> Option<i32>| -> Vec<i32> {
            let mut ids: Vec<i32> = orders.iter().filter_map(f).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };

        let stations = name_map::<station::Entity, _, _>(
            db,
            station::Column::Id,
            {
                let mut ids = collect(|o| o.from_station_id);
                ids.extend(collect(|o| o.to_station_id));
                ids
            },
            |m| (m.id, m.name),
        )
        .await?;
        let consignors = name_map::<consignor::Entity, _, _>(
            db,
            consignor::Column::Id,
            collect(|o| o.consignor_id),
            |m| (m.id, m.name),
        )
        .await?;
        let consignees = name_map::<consignee::Entity, _, _>(
            db,
            consignee::Column::Id,
            collect(|o| o.consignee_id),
            |m| (m.id, m.name),
        )
        .await?;
        let agents = name_map::<booking_agent::Entity, _, _>(
            db,
            booking_agent::Column::Id,
            collect(|o| o.booking_agent_id),
            |m| (m.id, m.name),
        )
        .await?;
        let goods = name_map::<goods::Entity, _, _>(
            db,
            goods::Column::Id,
            collect(|o| Some(o.goods_id)),
            |m| (m.id, m.description),
        )
        .await?;
        let builty_ids: HashMap<i32, i32> = if orders.is_empty() {
            HashMap::new()
        } else {
            builty::Entity::find()
                .filter(builty::Column::OrderId.is_in(orders.iter().map(|o| o.id)))
                .all(db)
                .await?
                .into_iter()
                .map(|b| (b.order_id, b.id))
                .collect()
        };

        let name = |map: &HashMap<i32, String>, id: Option<i32>| id.and_then(|id| map.get(&id).cloned());
        Ok(orders
            .into_iter()
            .map(|order| OrderView {
                from_station_name: name(&stations, order.from_station_id),
                to_station_name: name(&stations, order.to_station_id),
                consignor_name: name(&consignors, order.consignor_id),
                consignee_name: name(&consignees, order.consignee_id),
                booking_agent_name: name(&agents, order.booking_agent_id),
                goods_description: name(&goods, Some(order.goods_id)),
                builty_id: builty_ids.get(&order.id).copied(),
                order,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_input() -> OrderInput {
        OrderInput {
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            firm: Some("Jalaram Cargo".into()),
            goods_id: Some(5),
            weight: Some(2.5),
            rate: Some(80.0),
            ..Default::default()
        }
    }

    #[test]
    fn missing_required_fields_are_reported_together() {
        let err = OrderInput::default().check().unwrap_err();
        let fields: Vec<_> = err
            .field_errors()
            .unwrap()
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("date", "Date is required"),
                ("firm", "Firm is required"),
                ("goods_id", "Goods is required")
            ]
        );
    }

    #[test]
    fn order_type_defaults_when_omitted() {
        let fields = valid_input().check().unwrap();
        assert_eq!(fields.firm, Firm::JalaramCargo);
        assert_eq!(fields.order_type, OrderType::Party);
        assert_eq!(fields.status, None);
    }

    #[test]
    fn unknown_firm_is_a_field_error() {
        let input = OrderInput {
            firm: Some("Acme Logistics".into()),
            order_type: Some("courier".into()),
            ..valid_input()
        };
        let err = input.check().unwrap_err();
        let fields: Vec<_> = err
            .field_errors()
            .unwrap()
            .iter()
            .map(|e| e.field.clone())
            .collect();
        assert_eq!(fields, vec!["firm".to_string(), "order_type".to_string()]);
    }

    #[test]
    fn overlong_description_is_rejected() {
        let input = OrderInput {
            description: Some("x".repeat(513)),
            ..valid_input()
        };
        assert_matches!(input.check(), Err(ServiceError::FieldErrors(_)));
    }

    #[test]
    fn status_filter_defaults_to_active() {
        assert!(status_condition(None).is_some());
        assert!(status_condition(Some("all")).is_none());
        assert!(status_condition(Some("  ")).is_some());
    }
}
