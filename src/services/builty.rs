use crate::{
    db::{self, DbPool},
    entities::{
        booking_agent, builty, concerned_person, consignee, consignor, driver, goods, order, owner,
        phone_book, station, vehicle, BuiltyStatus, Firm, OrderStatus, OrderType, PartyKind,
    },
    errors::{FieldError, ServiceError},
    events::{Event, EventSender},
    services::{
        audit,
        orders::{name_map, validate_firm},
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
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

const ENTITY: &str = "Builty";

/// Flat builty form. `order_id` is only read on create.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BuiltyInput {
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub order_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    #[validate(required)]
    pub vehicle_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    #[validate(required)]
    pub driver_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    #[validate(required)]
    pub owner_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    #[validate(required)]
    pub from_station_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    #[validate(required)]
    pub to_station_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_date")]
    #[validate(required)]
    #[schema(value_type = Option<String>, format = Date, example = "2024-06-02")]
    pub date: Option<NaiveDate>,
    /// Defaults to the order's firm
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    #[validate(custom = "validate_firm")]
    pub firm: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    #[validate(length(max = 64, message = "LR number must be at most 64 characters"))]
    pub lr_no: Option<String>,
    /// `IN_TRANSIT` (default), `DELIVERED`, `PENDING` or any custom text
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    pub invoice_no: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    pub eway_bill_no: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub goods_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_f64")]
    #[validate(range(min = 0.0, message = "Actual weight cannot be negative"))]
    pub actual_weight: Option<f64>,
    #[serde(default, deserialize_with = "crate::common::optional_f64")]
    #[validate(range(min = 0.0, message = "Charged weight cannot be negative"))]
    pub charged_weight: Option<f64>,
    #[serde(default, deserialize_with = "crate::common::optional_f64")]
    #[validate(range(min = 0.0, message = "Rate cannot be negative"))]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "crate::common::optional_f64")]
    #[validate(range(min = 0.0, message = "Advance amount cannot be negative"))]
    pub advance_amount: Option<f64>,
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
    /// Rejects the edit with 409 when the stored version differs
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub expected_version: Option<i32>,
}

#[derive(Debug, Clone)]
struct BuiltyFields {
    vehicle_id: i32,
    driver_id: i32,
    owner_id: i32,
    from_station_id: i32,
    to_station_id: i32,
    date: NaiveDate,
    firm: Option<Firm>,
    status: Option<BuiltyStatus>,
    input: BuiltyInput,
}

fn required(value: Option<i32>, field: &str, label: &str) -> Result<i32, ServiceError> {
    value.ok_or_else(|| ServiceError::field(field, format!("{} is required", label)))
}

impl BuiltyInput {
    /// Every missing required field is reported, not just the first. With
    /// `need_order` the order reference joins the required set.
    fn check(self, need_order: bool) -> Result<BuiltyFields, ServiceError> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => FieldError::from_validation(&e),
        };
        if need_order && self.order_id.is_none() {
            errors.push(FieldError::new("order_id", "Order is required"));
        }
        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(ServiceError::FieldErrors(errors));
        }

        let firm = self
            .firm
            .as_deref()
            .map(Firm::from_str)
            .transpose()
            .map_err(|_| ServiceError::field("firm", "Firm must be one of the registered company names"))?;

        Ok(BuiltyFields {
            vehicle_id: required(self.vehicle_id, "vehicle_id", "Vehicle")?,
            driver_id: required(self.driver_id, "driver_id", "Driver")?,
            owner_id: required(self.owner_id, "owner_id", "Owner")?,
            from_station_id: required(self.from_station_id, "from_station_id", "From station")?,
            to_station_id: required(self.to_station_id, "to_station_id", "To station")?,
            date: self
                .date
                .ok_or_else(|| ServiceError::field("date", "Date is required"))?,
            firm,
            status: self.status.as_deref().map(BuiltyStatus::parse),
            input: self,
        })
    }
}

impl BuiltyFields {
    fn parties(&self) -> PartySelection {
        PartySelection {
            consignor_id: self.input.consignor_id,
            consignee_id: self.input.consignee_id,
            booking_agent_id: self.input.booking_agent_id,
        }
    }

    /// Copies every mutable column; order, status, firm and version are set
    /// by the caller.
    fn apply(&self, active: &mut builty::ActiveModel) {
        let input = &self.input;
        active.vehicle_id = Set(self.vehicle_id);
        active.driver_id = Set(self.driver_id);
        active.owner_id = Set(self.owner_id);
        active.from_station_id = Set(self.from_station_id);
        active.to_station_id = Set(self.to_station_id);
        active.date = Set(self.date);
        active.lr_no = Set(input.lr_no.clone());
        active.invoice_no = Set(input.invoice_no.clone());
        active.eway_bill_no = Set(input.eway_bill_no.clone());
        active.goods_id = Set(input.goods_id);
        active.actual_weight = Set(input.actual_weight);
        active.charged_weight = Set(input.charged_weight);
        active.rate = Set(input.rate);
        active.advance_amount = Set(input.advance_amount);
        active.consignor_id = Set(input.consignor_id);
        active.consignee_id = Set(input.consignee_id);
        active.booking_agent_id = Set(input.booking_agent_id);
        active.consignor_person_id = Set(input.consignor_person_id);
        active.consignor_phone_id = Set(input.consignor_phone_id);
        active.consignee_person_id = Set(input.consignee_person_id);
        active.consignee_phone_id = Set(input.consignee_phone_id);
        active.agent_person_id = Set(input.agent_person_id);
        active.agent_phone_id = Set(input.agent_phone_id);
    }
}

async fn check_references<C>(conn: &C, fields: &BuiltyFields) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let input = &fields.input;
    fetch::<vehicle::Entity, _>(conn, fields.vehicle_id, "Vehicle").await?;
    fetch::<driver::Entity, _>(conn, fields.driver_id, "Driver").await?;
    fetch::<owner::Entity, _>(conn, fields.owner_id, "Owner").await?;
    fetch::<station::Entity, _>(conn, fields.from_station_id, "Station").await?;
    fetch::<station::Entity, _>(conn, fields.to_station_id, "Station").await?;
    ensure_exists::<goods::Entity, _>(conn, input.goods_id, "Goods").await?;
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

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BuiltyListQuery {
    /// `all` (default) or an exact status
    pub status: Option<String>,
    /// Case-insensitive substring over id, firm, LR, invoice, lorry, driver, owner and stations
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DraftQuery {
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    pub order_id: Option<i32>,
}

fn search_condition(q: &str) -> Condition {
    let pattern = format!("%{}%", q.to_lowercase());
    let text = |col: builty::Column| -> SimpleExpr {
        Expr::expr(Func::lower(Expr::col(col))).like(pattern.clone())
    };
    let named = |table: &str, col: &str, fk: builty::Column| -> SimpleExpr {
        fk.in_subquery(
            Query::select()
                .column(Alias::new("id"))
                .from(Alias::new(table))
                .and_where(Expr::expr(Func::lower(Expr::col(Alias::new(col)))).like(pattern.clone()))
                .to_owned(),
        )
    };

    Condition::any()
        .add(
            Expr::expr(Expr::cast_as(Expr::col(builty::Column::Id), Alias::new("TEXT")))
                .like(pattern.clone()),
        )
        .add(text(builty::Column::Firm))
        .add(text(builty::Column::LrNo))
        .add(text(builty::Column::InvoiceNo))
        .add(named("vehicles", "lorry_no", builty::Column::VehicleId))
        .add(named("drivers", "name", builty::Column::DriverId))
        .add(named("owners", "name", builty::Column::OwnerId))
        .add(named("stations", "name", builty::Column::FromStationId))
        .add(named("stations", "name", builty::Column::ToStationId))
}

/// A builty with the display names of what it references.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BuiltyView {
    #[serde(flatten)]
    pub builty: builty::Model,
    pub lorry_no: Option<String>,
    pub driver_name: Option<String>,
    pub owner_name: Option<String>,
    pub from_station_name: Option<String>,
    pub to_station_name: Option<String>,
    pub goods_description: Option<String>,
    pub consignor_name: Option<String>,
    pub consignee_name: Option<String>,
    pub booking_agent_name: Option<String>,
}

/// Builty fields pre-filled from an order. PARTY orders carry their
/// consignor and consignee contacts; AGENT orders carry the agent's.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BuiltyDraft {
    pub order_id: i32,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub firm: Firm,
    pub order_type: OrderType,
    pub from_station_id: Option<i32>,
    pub to_station_id: Option<i32>,
    pub goods_id: i32,
    pub actual_weight: Option<f64>,
    pub charged_weight: Option<f64>,
    pub rate: Option<f64>,
    pub consignor_id: Option<i32>,
    pub consignee_id: Option<i32>,
    pub consignor_person_id: Option<i32>,
    pub consignor_phone_id: Option<i32>,
    pub consignee_person_id: Option<i32>,
    pub consignee_phone_id: Option<i32>,
    pub booking_agent_id: Option<i32>,
    pub agent_person_id: Option<i32>,
    pub agent_phone_id: Option<i32>,
    /// Set when the order already has a builty
    pub existing_builty_id: Option<i32>,
}

impl BuiltyDraft {
    pub fn from_order(order: &order::Model, today: NaiveDate) -> Self {
        let mut draft = BuiltyDraft {
            order_id: order.id,
            date: today,
            firm: order.firm,
            order_type: order.order_type,
            from_station_id: order.from_station_id,
            to_station_id: order.to_station_id,
            goods_id: order.goods_id,
            actual_weight: order.weight,
            charged_weight: order.weight,
            rate: order.rate,
            consignor_id: None,
            consignee_id: None,
            consignor_person_id: None,
            consignor_phone_id: None,
            consignee_person_id: None,
            consignee_phone_id: None,
            booking_agent_id: None,
            agent_person_id: None,
            agent_phone_id: None,
            existing_builty_id: None,
        };
        match order.order_type {
            OrderType::Party => {
                draft.consignor_id = order.consignor_id;
                draft.consignee_id = order.consignee_id;
                draft.consignor_person_id = order.consignor_person_id;
                draft.consignor_phone_id = order.consignor_phone_id;
                draft.consignee_person_id = order.consignee_person_id;
                draft.consignee_phone_id = order.consignee_phone_id;
            }
            OrderType::Agent => {
                draft.booking_agent_id = order.booking_agent_id;
                draft.agent_person_id = order.agent_person_id;
                draft.agent_phone_id = order.agent_phone_id;
            }
        }
        draft
    }
}

/// Builty creation and editing, including the write-back onto the order.
#[derive(Clone)]
pub struct BuiltyService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    search_limit: u64,
}

impl BuiltyService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, search_limit: u64) -> Self {
        Self {
            db_pool,
            event_sender,
            search_limit,
        }
    }

    /// Inserts the builty, forces its order to DISPATCHED and copies the
    /// non-empty parties onto the order, all in one transaction.
    #[instrument(skip(self, input), fields(order_id = ?input.order_id))]
    pub async fn create(&self, input: BuiltyInput) -> Result<builty::Model, ServiceError> {
        let fields = input.check(true)?;
        let order_id = required(fields.input.order_id, "order_id", "Order")?;

        let (txn, scope) = db::begin(&self.db_pool, "Builty creation").await?;
        let result = async {
            let order = fetch::<order::Entity, _>(&txn, order_id, "Order").await?;
            if let Some(existing) = builty::Entity::find()
                .filter(builty::Column::OrderId.eq(order_id))
                .one(&txn)
                .await?
            {
                return Err(ServiceError::Conflict(format!(
                    "Order {} already has builty #{}",
                    order_id, existing.id
                )));
            }
            check_references(&txn, &fields).await?;

            let mut active = builty::ActiveModel {
                order_id: Set(order_id),
                firm: Set(fields.firm.unwrap_or(order.firm)),
                status: Set(fields.status.clone().unwrap_or_default().as_str().to_string()),
                ..Default::default()
            };
            fields.apply(&mut active);
            let created = active.insert(&txn).await?;

            let previous_status = order.status.clone();
            let order = sync::push_to_order(
                &txn,
                order,
                PartySelection::of_builty(&created),
                Some(&OrderStatus::Dispatched),
            )
            .await?;

            audit::record(&txn, ENTITY, created.id, audit::CREATE, None).await?;
            if previous_status != order.status {
                audit::record(
                    &txn,
                    "Order",
                    order_id,
                    audit::status_action(&order.status),
                    Some(format!("Builty #{} created", created.id)),
                )
                .await?;
            }
            Ok::<_, ServiceError>((created, previous_status, order.status))
        }
        .await;

        let (created, previous_status, new_status) =
            scope.finish(txn, result).await.map_err(|e| {
                error!(error = %e, "Failed to create builty");
                e
            })?;

        counter!("transport_builty_created_total", 1);
        info!(builty_id = created.id, order_id, "Builty created and order dispatched");
        self.event_sender
            .publish(Event::BuiltyCreated {
                builty_id: created.id,
                order_id,
            })
            .await;
        if previous_status != new_status {
            self.event_sender
                .publish(Event::OrderStatusChanged {
                    order_id,
                    old_status: previous_status,
                    new_status,
                })
                .await;
        }
        Ok(created)
    }

    /// Updates everything but the order reference and pushes the non-empty
    /// parties onto the order again.
    #[instrument(skip(self, input))]
    pub async fn edit(&self, id: i32, input: BuiltyInput) -> Result<builty::Model, ServiceError> {
        let fields = input.check(false)?;

        let (txn, scope) = db::begin(&self.db_pool, "Builty update").await?;
        let result = async {
            let existing = fetch::<builty::Entity, _>(&txn, id, ENTITY).await?;
            if let Some(order_id) = fields.input.order_id {
                if order_id != existing.order_id {
                    return Err(ServiceError::field(
                        "order_id",
                        "Order cannot be changed once a builty exists",
                    ));
                }
            }
            if let Some(expected) = fields.input.expected_version {
                if expected != existing.version {
                    return Err(ServiceError::ConcurrentModification { entity: ENTITY, id });
                }
            }
            check_references(&txn, &fields).await?;

            let order_id = existing.order_id;
            let version = existing.version;
            let mut active: builty::ActiveModel = existing.into();
            fields.apply(&mut active);
            if let Some(firm) = fields.firm {
                active.firm = Set(firm);
            }
            if let Some(status) = &fields.status {
                active.status = Set(status.as_str().to_string());
            }
            active.version = Set(version + 1);
            let updated = active.update(&txn).await?;

            let order = fetch::<order::Entity, _>(&txn, order_id, "Order").await?;
            sync::push_to_order(&txn, order, fields.parties(), None).await?;
            audit::record(&txn, ENTITY, id, audit::UPDATE, None).await?;
            Ok::<_, ServiceError>(updated)
        }
        .await;

        let updated = scope.finish(txn, result).await.map_err(|e| {
            error!(builty_id = id, error = %e, "Failed to update builty");
            e
        })?;

        counter!("transport_builty_updated_total", 1);
        info!(builty_id = id, version = updated.version, "Builty updated");
        self.event_sender
            .publish(Event::BuiltyUpdated {
                builty_id: id,
                order_id: updated.order_id,
            })
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<BuiltyView, ServiceError> {
        let found = fetch::<builty::Entity, _>(&*self.db_pool, id, ENTITY).await?;
        self.decorate(vec![found])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Newest first, capped at the configured search limit.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &BuiltyListQuery) -> Result<Vec<BuiltyView>, ServiceError> {
        let mut select = builty::Entity::find();
        if let Some(status) = query
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        {
            select = select.filter(builty::Column::Status.eq(status));
        }
        if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            select = select.filter(search_condition(q));
        }

        let rows = select
            .order_by_desc(builty::Column::Id)
            .limit(self.search_limit)
            .all(&*self.db_pool)
            .await?;
        self.decorate(rows).await
    }

    /// Pre-fills a builty from an order.
    #[instrument(skip(self))]
    pub async fn draft(&self, order_id: Option<i32>) -> Result<BuiltyDraft, ServiceError> {
        let order_id = required(order_id, "order_id", "Order")?;
        let db = &*self.db_pool;
        let order = fetch::<order::Entity, _>(db, order_id, "Order").await?;

        let mut draft = BuiltyDraft::from_order(&order, Utc::now().date_naive());
        draft.existing_builty_id = builty::Entity::find()
            .filter(builty::Column::OrderId.eq(order_id))
            .one(db)
            .await?
            .map(|b| b.id);

        // Fill contacts the order left blank with the party's primary person.
        if order.order_type == OrderType::Party {
            if draft.consignor_person_id.is_none() {
                if let Some(id) = draft.consignor_id {
                    (draft.consignor_person_id, draft.consignor_phone_id) =
                        primary_contact(db, PartyKind::Consignor, id).await?;
                }
            }
            if draft.consignee_person_id.is_none() {
                if let Some(id) = draft.consignee_id {
                    (draft.consignee_person_id, draft.consignee_phone_id) =
                        primary_contact(db, PartyKind::Consignee, id).await?;
                }
            }
        } else if draft.agent_person_id.is_none() {
            if let Some(id) = draft.booking_agent_id {
                (draft.agent_person_id, draft.agent_phone_id) =
                    primary_contact(db, PartyKind::Agent, id).await?;
            }
        }

        Ok(draft)
    }

    async fn decorate(&self, rows: Vec<builty::Model>) -> Result<Vec<BuiltyView>, ServiceError> {
        let db = &*self.db_pool;
        let ids = |f: fn(&builty::Model) -> Option<i32>| -> Vec<i32> {
            let mut ids: Vec<i32> = rows.iter().filter_map(f).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };

        let vehicles = name_map::<vehicle::Entity, _, _>(
            db,
            vehicle::Column::Id,
            ids(|b| Some(b.vehicle_id)),
            |m| (m.id, m.lorry_no),
        )
        .await?;
        let drivers = name_map::<driver::Entity, _, _>(
            db,
            driver::Column::Id,
            ids(|b| Some(b.driver_id)),
            |m| (m.id, m.name),
        )
        .await?;
        let owners = name_map::<owner::Entity, _, _>(
            db,
            owner::Column::Id,
            ids(|b| Some(b.owner_id)),
            |m| (m.id, m.name),
        )
        .await?;
        let stations = name_map::<station::Entity, _, _>(
            db,
            station::Column::Id,
            {
                let mut all = ids(|b| Some(b.from_station_id));
                all.extend(ids(|b| Some(b.to_station_id)));
                all
            },
            |m| (m.id, m.name),
        )
        .await?;
        let goods = name_map::<goods::Entity, _, _>(
            db,
            goods::Column::Id,
            ids(|b| b.goods_id),
            |m| (m.id, m.description),
        )
        .await?;
        let consignors = name_map::<consignor::Entity, _, _>(
            db,
            consignor::Column::Id,
            ids(|b| b.consignor_id),
            |m| (m.id, m.name),
        )
        .await?;
        let consignees = name_map::<consignee::Entity, _, _>(
            db,
            consignee::Column::Id,
            ids(|b| b.consignee_id),
            |m| (m.id, m.name),
        )
        .await?;
        let agents = name_map::<booking_agent::Entity, _, _>(
            db,
            booking_agent::Column::Id,
            ids(|b| b.booking_agent_id),
            |m| (m.id, m.name),
        )
        .await?;

        let name = |map: &HashMap<i32, String>, id: Option<i32>| id.and_then(|id| map.get(&id).cloned());
        Ok(rows
            .into_iter()
            .map(|b| BuiltyView {
                lorry_no: name(&vehicles, Some(b.vehicle_id)),
                driver_name: name(&drivers, Some(b.driver_id)),
                owner_name: name(&owners, Some(b.owner_id)),
                from_station_name: name(&stations, Some(b.from_station_id)),
                to_station_name: name(&stations, Some(b.to_station_id)),
                goods_description: name(&goods, b.goods_id),
                consignor_name: name(&consignors, b.consignor_id),
                consignee_name: name(&consignees, b.consignee_id),
                booking_agent_name: name(&agents, b.booking_agent_id),
                builty: b,
            })
            .collect())
    }
}

/// Primary person of a party and that person's primary phone.
async fn primary_contact<C>(
    conn: &C,
    kind: PartyKind,
    entity_id: i32,
) -> Result<(Option<i32>, Option<i32>), ServiceError>
where
    C: ConnectionTrait,
{
    let Some(person) = concerned_person::Entity::find()
        .filter(concerned_person::Column::EntityType.eq(kind))
        .filter(concerned_person::Column::EntityId.eq(entity_id))
        .filter(concerned_person::Column::IsPrimary.eq(true))
        .one(conn)
        .await?
    else {
        return Ok((None, None));
    };

    let phone = phone_book::Entity::find()
        .filter(phone_book::Column::ConcernedPersonId.eq(person.id))
        .order_by_desc(phone_book::Column::IsPrimary)
        .order_by_asc(phone_book::Column::Id)
        .one(conn)
        .await?;
    Ok((Some(person.id), phone.map(|p| p.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn complete_input() -> BuiltyInput {
        BuiltyInput {
            order_id: Some(1),
            vehicle_id: Some(2),
            driver_id: Some(3),
            owner_id: Some(4),
            from_station_id: Some(5),
            to_station_id: Some(6),
            date: NaiveDate::from_ymd_opt(2024, 6, 2),
            ..Default::default()
        }
    }

    #[test]
    fn every_missing_required_field_is_reported() {
        let err = BuiltyInput::default().check(true).unwrap_err();
        let fields: Vec<_> = err
            .field_errors()
            .unwrap()
            .iter()
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(
            fields,
            vec![
                "date",
                "driver_id",
                "from_station_id",
                "order_id",
                "owner_id",
                "to_station_id",
                "vehicle_id"
            ]
        );
    }

    #[test]
    fn missing_driver_names_the_driver() {
        let input = BuiltyInput {
            driver_id: None,
            ..complete_input()
        };
        let err = input.check(true).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Driver is required");
    }

    #[test]
    fn edit_does_not_require_order() {
        let input = BuiltyInput {
            order_id: None,
            ..complete_input()
        };
        assert!(input.check(false).is_ok());
    }

    fn order_fixture(order_type: OrderType) -> order::Model {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        order::Model {
            id: 11,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            firm: Firm::JalaramCargo,
            order_type,
            from_station_id: Some(1),
            to_station_id: Some(2),
            consignor_id: Some(3),
            consignee_id: Some(4),
            booking_agent_id: Some(5),
            consignor_person_id: Some(6),
            consignor_phone_id: Some(7),
            consignee_person_id: None,
            consignee_phone_id: None,
            agent_person_id: Some(8),
            agent_phone_id: Some(9),
            goods_id: 10,
            weight: Some(2.5),
            rate: Some(80.0),
            description: None,
            status: "NEW".into(),
            version: 1,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn party_draft_carries_parties_not_agent() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let draft = BuiltyDraft::from_order(&order_fixture(OrderType::Party), today);
        assert_eq!(draft.date, today);
        assert_eq!(draft.firm, Firm::JalaramCargo);
        assert_eq!(draft.actual_weight, Some(2.5));
        assert_eq!(draft.charged_weight, Some(2.5));
        assert_eq!(draft.consignor_id, Some(3));
        assert_eq!(draft.consignor_phone_id, Some(7));
        assert_eq!(draft.booking_agent_id, None);
        assert_eq!(draft.agent_person_id, None);
    }

    #[test]
    fn agent_draft_carries_agent_contact_only() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let draft = BuiltyDraft::from_order(&order_fixture(OrderType::Agent), today);
        assert_eq!(draft.booking_agent_id, Some(5));
        assert_eq!(draft.agent_phone_id, Some(9));
        assert_eq!(draft.consignor_id, None);
        assert_eq!(draft.consignee_id, None);
    }
}
