use crate::{
    common::title_case,
    db::{self, DbPool},
    entities::{
        booking_agent, consignee, consignor, driver, goods, order, owner, pin_code, station,
        vehicle,
    },
    errors::{FieldError, ServiceError},
    services::audit,
};
use sea_orm::{
    sea_query::{Alias, Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PrimaryKeyTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Reference tables reachable through the lookup and CRUD endpoints.
/// Orders only take part in lookups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, strum::EnumString, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum ReferenceKind {
    #[strum(to_string = "station", serialize = "stations")]
    Station,
    #[strum(to_string = "pin_code", serialize = "pin_codes", serialize = "pincode")]
    PinCode,
    #[strum(to_string = "goods")]
    Goods,
    #[strum(to_string = "consignor", serialize = "consignors")]
    Consignor,
    #[strum(to_string = "consignee", serialize = "consignees")]
    Consignee,
    #[strum(
        to_string = "booking_agent",
        serialize = "booking_agents",
        serialize = "agent",
        serialize = "agents"
    )]
    BookingAgent,
    #[strum(to_string = "owner", serialize = "owners")]
    Owner,
    #[strum(to_string = "driver", serialize = "drivers")]
    Driver,
    #[strum(to_string = "vehicle", serialize = "vehicles")]
    Vehicle,
    #[strum(to_string = "order", serialize = "orders")]
    Order,
}

impl ReferenceKind {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        ReferenceKind::from_str(raw.trim())
            .map_err(|_| ServiceError::NotFound(format!("Unknown reference type '{}'", raw)))
    }

    /// Entity name written to the audit log.
    pub fn entity_name(&self) -> &'static str {
        match self {
            ReferenceKind::Station => "Station",
            ReferenceKind::PinCode => "PinCode",
            ReferenceKind::Goods => "Goods",
            ReferenceKind::Consignor => "Consignor",
            ReferenceKind::Consignee => "Consignee",
            ReferenceKind::BookingAgent => "BookingAgent",
            ReferenceKind::Owner => "Owner",
            ReferenceKind::Driver => "Driver",
            ReferenceKind::Vehicle => "Vehicle",
            ReferenceKind::Order => "Order",
        }
    }

    fn editable(&self) -> Result<(), ServiceError> {
        match self {
            ReferenceKind::Order => Err(orders_not_editable()),
            _ => Ok(()),
        }
    }
}

fn orders_not_editable() -> ServiceError {
    ServiceError::BadRequest("Orders are managed through the order endpoints".to_string())
}

/// One autocomplete entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LookupItem {
    pub id: i32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuickCreated {
    pub id: i32,
    pub label: String,
    /// False when an existing row with the same label was returned
    pub created: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QuickCreateInput {
    /// Name, goods description, lorry number or pin code depending on the type
    #[serde(
        default,
        alias = "description",
        alias = "lorry_no",
        alias = "code",
        deserialize_with = "crate::common::optional_string"
    )]
    pub name: Option<String>,
    /// Only used for stations and pin codes
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    pub state: Option<String>,
}

/// Lorry numbers are compared and stored upper-case with single spaces.
pub fn normalize_lorry_no(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn contains_ci<C: ColumnTrait>(col: C, q: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(format!("%{}%", q.to_lowercase()))
}

fn equals_ci<C: ColumnTrait>(col: C, value: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).eq(value.to_lowercase())
}

/// Loads a row or reports `<label> <id> not found`.
pub async fn fetch<E, C>(conn: &C, id: i32, label: &str) -> Result<E::Model, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found(label, id))
}

/// Checks an optional foreign key before it is written.
pub async fn ensure_exists<E, C>(conn: &C, id: Option<i32>, label: &str) -> Result<(), ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    match id {
        Some(id) => fetch::<E, C>(conn, id, label).await.map(|_| ()),
        None => Ok(()),
    }
}

async fn find_by_label<E, C>(conn: &C, col: E::Column, value: &str) -> Result<Option<E::Model>, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    Ok(E::find().filter(equals_ci(col, value)).one(conn).await?)
}

fn to_json<T: Serialize>(model: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(model).map_err(|e| ServiceError::InternalError(e.to_string()))
}

/// Overlays `patch` onto the stored row's JSON. Only known, mutable keys are
/// accepted; name-like fields get the same normalisation as quick-create.
fn merge_patch(base: &mut Value, patch: Map<String, Value>) -> Result<(), ServiceError> {
    let Value::Object(row) = base else {
        return Err(ServiceError::InternalError("row did not serialise to an object".into()));
    };

    let mut errors = Vec::new();
    for (key, value) in patch {
        if key == "id" || key == "created_at" || !row.contains_key(&key) {
            errors.push(FieldError::new(&key, format!("{} cannot be updated", key)));
            continue;
        }
        let value = match (key.as_str(), value) {
            ("name" | "description", Value::String(s)) => {
                let normalised = title_case(&s);
                if normalised.is_empty() {
                    errors.push(FieldError::new(&key, format!("{} is required", key)));
                    continue;
                }
                Value::String(normalised)
            }
            ("lorry_no", Value::String(s)) => Value::String(normalize_lorry_no(&s)),
            ("code", Value::String(s)) => Value::String(s.trim().to_string()),
            (_, Value::String(s)) if s.trim().is_empty() => Value::Null,
            (_, Value::String(s)) => coerce_like(row.get(&key), s),
            (_, other) => other,
        };
        row.insert(key, value);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::FieldErrors(errors))
    }
}

/// Form posts deliver every value as text; numbers and flags are parsed
/// back when the stored column holds one.
fn coerce_like(current: Option<&Value>, raw: String) -> Value {
    let trimmed = raw.trim();
    match current {
        Some(Value::Number(_)) => trimmed
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| trimmed.parse::<f64>().map(Value::from))
            .unwrap_or(Value::String(raw)),
        Some(Value::Bool(_)) => match trimmed.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Value::Bool(true),
            "off" | "false" | "no" | "0" => Value::Bool(false),
            _ => Value::String(raw),
        },
        _ => Value::String(raw),
    }
}

macro_rules! patch_row {
    ($txn:expr, $module:ident, $id:expr, $patch:expr, $label:expr) => {{
        let existing = fetch::<$module::Entity, _>($txn, $id, $label).await?;
        let mut merged = to_json(&existing)?;
        merge_patch(&mut merged, $patch)?;
        let mut active: $module::ActiveModel = existing.into();
        active
            .set_from_json(merged)
            .map_err(|e| ServiceError::BadRequest(format!("Invalid field value: {}", e)))?;
        to_json(&active.update($txn).await?)?
    }};
}

macro_rules! list_rows {
    ($conn:expr, $module:ident, $col:ident) => {{
        $module::Entity::find()
            .order_by_asc($module::Column::$col)
            .all($conn)
            .await?
            .iter()
            .map(to_json::<$module::Model>)
            .collect::<Result<Vec<_>, _>>()?
    }};
}

/// Label search over one table: the filter applies only to a non-empty `q`.
macro_rules! lookup_rows {
    ($conn:expr, $select:expr, $q:expr => $filter:expr, order $col:expr, $limit:expr, |$m:ident| $label:expr) => {{
        let mut select = $select;
        if !$q.is_empty() {
            select = select.filter($filter);
        }
        select
            .order_by_asc($col)
            .limit($limit)
            .all($conn)
            .await?
            .into_iter()
            .map(|$m| LookupItem {
                id: $m.id,
                label: $label,
            })
            .collect()
    }};
}

/// Lookup, quick-create and plain CRUD over the reference tables.
#[derive(Clone)]
pub struct ReferenceService {
    db_pool: Arc<DbPool>,
    lookup_limit: u64,
}

impl ReferenceService {
    pub fn new(db_pool: Arc<DbPool>, lookup_limit: u64) -> Self {
        Self {
            db_pool,
            lookup_limit,
        }
    }

    /// Case-insensitive substring search on the label column, ordered by label.
    /// Drivers may be narrowed to the one assigned to `vehicle_id`.
    #[instrument(skip(self))]
    pub async fn lookup(
        &self,
        kind: ReferenceKind,
        q: Option<&str>,
        vehicle_id: Option<i32>,
    ) -> Result<Vec<LookupItem>, ServiceError> {
        let db = &*self.db_pool;
        let q = q.map(str::trim).unwrap_or_default();
        let limit = self.lookup_limit;

        let items = match kind {
            ReferenceKind::Station => lookup_rows!(
                db, station::Entity::find(), q => contains_ci(station::Column::Name, q),
                order station::Column::Name, limit, |m| m.name
            ),
            ReferenceKind::PinCode => lookup_rows!(
                db,
                pin_code::Entity::find(),
                q => Condition::any()
                    .add(contains_ci(pin_code::Column::Code, q))
                    .add(contains_ci(pin_code::Column::State, q)),
                order pin_code::Column::Code,
                limit,
                |m| m.label()
            ),
            ReferenceKind::Goods => lookup_rows!(
                db, goods::Entity::find(), q => contains_ci(goods::Column::Description, q),
                order goods::Column::Description, limit, |m| m.description
            ),
            ReferenceKind::Consignor => lookup_rows!(
                db, consignor::Entity::find(), q => contains_ci(consignor::Column::Name, q),
                order consignor::Column::Name, limit, |m| m.name
            ),
            ReferenceKind::Consignee => lookup_rows!(
                db, consignee::Entity::find(), q => contains_ci(consignee::Column::Name, q),
                order consignee::Column::Name, limit, |m| m.name
            ),
            ReferenceKind::BookingAgent => lookup_rows!(
                db, booking_agent::Entity::find(), q => contains_ci(booking_agent::Column::Name, q),
                order booking_agent::Column::Name, limit, |m| m.name
            ),
            ReferenceKind::Owner => lookup_rows!(
                db, owner::Entity::find(), q => contains_ci(owner::Column::Name, q),
                order owner::Column::Name, limit, |m| m.name
            ),
            ReferenceKind::Driver => {
                let mut select = driver::Entity::find();
                if let Some(vehicle_id) = vehicle_id {
                    let vehicle =
                        fetch::<vehicle::Entity, _>(db, vehicle_id, "Vehicle").await?;
                    match vehicle.driver_id {
                        Some(driver_id) => {
                            select = select.filter(driver::Column::Id.eq(driver_id));
                        }
                        None => return Ok(Vec::new()),
                    }
                }
                lookup_rows!(
                    db, select, q => contains_ci(driver::Column::Name, q),
                    order driver::Column::Name, limit, |m| m.name
                )
            }
            ReferenceKind::Vehicle => lookup_rows!(
                db, vehicle::Entity::find(), q => contains_ci(vehicle::Column::LorryNo, q),
                order vehicle::Column::LorryNo, limit, |m| m.lorry_no
            ),
            ReferenceKind::Order => {
                let mut select = order::Entity::find();
                if !q.is_empty() {
                    select = select.filter(
                        Expr::expr(Expr::cast_as(
                            Expr::col(order::Column::Id),
                            Alias::new("TEXT"),
                        ))
                        .like(format!("%{}%", q.trim_start_matches('#'))),
                    );
                }
                select
                    .order_by_desc(order::Column::Id)
                    .limit(limit)
                    .all(db)
                    .await?
                    .into_iter()
                    .map(|m| LookupItem {
                        id: m.id,
                        label: format!("Order #{}", m.id),
                    })
                    .collect()
            }
        };

        Ok(items)
    }

    /// Returns the row whose label matches case-insensitively, creating it
    /// when there is none. New rows are audited.
    #[instrument(skip(self, input))]
    pub async fn quick_create(
        &self,
        kind: ReferenceKind,
        input: QuickCreateInput,
    ) -> Result<QuickCreated, ServiceError> {
        kind.editable()?;
        let raw = input.name.unwrap_or_default();
        let (field, label) = match kind {
            ReferenceKind::Goods => ("description", title_case(&raw)),
            ReferenceKind::Vehicle => ("lorry_no", normalize_lorry_no(&raw)),
            ReferenceKind::PinCode => ("code", raw.trim().to_string()),
            _ => ("name", title_case(&raw)),
        };
        if label.is_empty() {
            return Err(ServiceError::field(field, format!("{} is required", field)));
        }
        let state = input.state.map(|s| title_case(&s));

        let (txn, scope) = db::begin(&self.db_pool, "Quick create").await?;
        let result = self.quick_create_in(&txn, kind, label, state).await;
        let outcome = scope.finish(txn, result).await?;

        if outcome.created {
            info!(kind = %kind, id = outcome.id, label = %outcome.label, "Reference row quick-created");
        }
        Ok(outcome)
    }

    async fn quick_create_in<C>(
        &self,
        conn: &C,
        kind: ReferenceKind,
        label: String,
        state: Option<String>,
    ) -> Result<QuickCreated, ServiceError>
    where
        C: ConnectionTrait,
    {
        let existing = |id: i32, label: String| QuickCreated {
            id,
            label,
            created: false,
        };

        let created_id = match kind {
            ReferenceKind::Station => {
                if let Some(m) = find_by_label::<station::Entity, _>(conn, station::Column::Name, &label).await? {
                    return Ok(existing(m.id, m.name));
                }
                station::ActiveModel {
                    name: Set(label.clone()),
                    state: Set(state),
                    ..Default::default()
                }
                .insert(conn)
                .await?
                .id
            }
            ReferenceKind::PinCode => {
                if let Some(m) = pin_code::Entity::find()
                    .filter(pin_code::Column::Code.eq(label.as_str()))
                    .one(conn)
                    .await?
                {
                    return Ok(existing(m.id, m.label()));
                }
                let m = pin_code::ActiveModel {
                    code: Set(label.clone()),
                    state: Set(state),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                audit::record(conn, kind.entity_name(), m.id, audit::CREATE, Some("Quick-created".into())).await?;
                return Ok(QuickCreated {
                    id: m.id,
                    label: m.label(),
                    created: true,
                });
            }
            ReferenceKind::Goods => {
                if let Some(m) = find_by_label::<goods::Entity, _>(conn, goods::Column::Description, &label).await? {
                    return Ok(existing(m.id, m.description));
                }
                goods::ActiveModel {
                    description: Set(label.clone()),
                    ..Default::default()
                }
                .insert(conn)
                .await?
                .id
            }
            ReferenceKind::Consignor => {
                if let Some(m) = find_by_label::<consignor::Entity, _>(conn, consignor::Column::Name, &label).await? {
                    return Ok(existing(m.id, m.name));
                }
                consignor::ActiveModel {
                    name: Set(label.clone()),
                    ..Default::default()
                }
                .insert(conn)
                .await?
                .id
            }
            ReferenceKind::Consignee => {
                if let Some(m) = find_by_label::<consignee::Entity, _>(conn, consignee::Column::Name, &label).await? {
                    return Ok(existing(m.id, m.name));
                }
                consignee::ActiveModel {
                    name: Set(label.clone()),
                    ..Default::default()
                }
                .insert(conn)
                .await?
                .id
            }
            ReferenceKind::BookingAgent => {
                if let Some(m) = find_by_label::<booking_agent::Entity, _>(conn, booking_agent::Column::Name, &label).await? {
                    return Ok(existing(m.id, m.name));
                }
                booking_agent::ActiveModel {
                    name: Set(label.clone()),
                    state: Set(state),
                    ..Default::default()
                }
                .insert(conn)
                .await?
                .id
            }
            ReferenceKind::Owner => {
                if let Some(m) = find_by_label::<owner::Entity, _>(conn, owner::Column::Name, &label).await? {
                    return Ok(existing(m.id, m.name));
                }
                owner::ActiveModel {
                    name: Set(label.clone()),
                    ..Default::default()
                }
                .insert(conn)
                .await?
                .id
            }
            ReferenceKind::Driver => {
                if let Some(m) = find_by_label::<driver::Entity, _>(conn, driver::Column::Name, &label).await? {
                    return Ok(existing(m.id, m.name));
                }
                driver::ActiveModel {
                    name: Set(label.clone()),
                    ..Default::default()
                }
                .insert(conn)
                .await?
                .id
            }
            ReferenceKind::Vehicle => {
                if let Some(m) = find_by_label::<vehicle::Entity, _>(conn, vehicle::Column::LorryNo, &label).await? {
                    return Ok(existing(m.id, m.lorry_no));
                }
                vehicle::ActiveModel {
                    lorry_no: Set(label.clone()),
                    ..Default::default()
                }
                .insert(conn)
                .await?
                .id
            }
            ReferenceKind::Order => return Err(orders_not_editable()),
        };

        audit::record(
            conn,
            kind.entity_name(),
            created_id,
            audit::CREATE,
            Some("Quick-created".into()),
        )
        .await?;

        Ok(QuickCreated {
            id: created_id,
            label,
            created: true,
        })
    }

    /// Every row of `kind`, ordered by its label.
    #[instrument(skip(self))]
    pub async fn list(&self, kind: ReferenceKind) -> Result<Vec<Value>, ServiceError> {
        kind.editable()?;
        let db = &*self.db_pool;
        let rows = match kind {
            ReferenceKind::Station => list_rows!(db, station, Name),
            ReferenceKind::PinCode => list_rows!(db, pin_code, Code),
            ReferenceKind::Goods => list_rows!(db, goods, Description),
            ReferenceKind::Consignor => list_rows!(db, consignor, Name),
            ReferenceKind::Consignee => list_rows!(db, consignee, Name),
            ReferenceKind::BookingAgent => list_rows!(db, booking_agent, Name),
            ReferenceKind::Owner => list_rows!(db, owner, Name),
            ReferenceKind::Driver => list_rows!(db, driver, Name),
            ReferenceKind::Vehicle => list_rows!(db, vehicle, LorryNo),
            ReferenceKind::Order => Vec::new(),
        };
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, kind: ReferenceKind, id: i32) -> Result<Value, ServiceError> {
        kind.editable()?;
        let db = &*self.db_pool;
        let label = kind.entity_name();
        match kind {
            ReferenceKind::Station => to_json(&fetch::<station::Entity, _>(db, id, label).await?),
            ReferenceKind::PinCode => to_json(&fetch::<pin_code::Entity, _>(db, id, label).await?),
            ReferenceKind::Goods => to_json(&fetch::<goods::Entity, _>(db, id, label).await?),
            ReferenceKind::Consignor => to_json(&fetch::<consignor::Entity, _>(db, id, label).await?),
            ReferenceKind::Consignee => to_json(&fetch::<consignee::Entity, _>(db, id, label).await?),
            ReferenceKind::BookingAgent => {
                to_json(&fetch::<booking_agent::Entity, _>(db, id, label).await?)
            }
            ReferenceKind::Owner => to_json(&fetch::<owner::Entity, _>(db, id, label).await?),
            ReferenceKind::Driver => to_json(&fetch::<driver::Entity, _>(db, id, label).await?),
            ReferenceKind::Vehicle => to_json(&fetch::<vehicle::Entity, _>(db, id, label).await?),
            ReferenceKind::Order => return Err(orders_not_editable()),
        }
    }

    /// Applies the supplied fields and records an `UPDATE` audit entry.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        kind: ReferenceKind,
        id: i32,
        patch: Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        kind.editable()?;
        let (txn, scope) = db::begin(&self.db_pool, "Reference update").await?;
        let result = async {
            let txn = &txn;
            let label = kind.entity_name();
            let updated = match kind {
                ReferenceKind::Station => patch_row!(txn, station, id, patch, label),
                ReferenceKind::PinCode => patch_row!(txn, pin_code, id, patch, label),
                ReferenceKind::Goods => patch_row!(txn, goods, id, patch, label),
                ReferenceKind::Consignor => patch_row!(txn, consignor, id, patch, label),
                ReferenceKind::Consignee => patch_row!(txn, consignee, id, patch, label),
                ReferenceKind::BookingAgent => patch_row!(txn, booking_agent, id, patch, label),
                ReferenceKind::Owner => patch_row!(txn, owner, id, patch, label),
                ReferenceKind::Driver => patch_row!(txn, driver, id, patch, label),
                ReferenceKind::Vehicle => patch_row!(txn, vehicle, id, patch, label),
                ReferenceKind::Order => return Err(orders_not_editable()),
            };
            audit::record(txn, label, id, audit::UPDATE, None).await?;
            Ok::<_, ServiceError>(updated)
        }
        .await;

        let updated = scope.finish(txn, result).await?;
        info!(kind = %kind, id, "Reference row updated");
        Ok(updated)
    }
}
