//! Concerned persons and their phone numbers.
//!
//! Each party has at most one primary person and each person at most one
//! primary phone. Promotions clear the siblings first and then set the target
//! inside the same transaction; partial unique indexes back this up.

use crate::{
    db::{self, DbPool},
    entities::{concerned_person, phone_book, PartyKind},
    errors::ServiceError,
    services::{
        audit,
        party_directory::{resolve_names, PartyDirectory, PartyRef},
        reference::fetch,
    },
};
use metrics::counter;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn validate_party_kind(value: &str) -> Result<(), ValidationError> {
    PartyKind::from_str(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("entity_type");
        err.message = Some(Cow::from(
            "Entity type must be CONSIGNOR, CONSIGNEE, AGENT, DRIVER or OWNER",
        ));
        err
    })
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PersonInput {
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    #[validate(required, custom = "validate_party_kind")]
    pub entity_type: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    #[validate(required)]
    pub entity_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    #[validate(
        required,
        length(max = 128, message = "Name must be at most 128 characters")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "crate::common::flexible_bool")]
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PhoneInput {
    #[serde(default, deserialize_with = "crate::common::optional_id")]
    #[validate(required)]
    pub concerned_person_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    #[validate(
        required,
        length(max = 32, message = "Phone number must be at most 32 characters")
    )]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "crate::common::flexible_bool")]
    pub is_primary: Option<bool>,
}

/// Full replacement of a phone row; `is_primary` defaults to false.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PhoneUpdate {
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    #[validate(
        required,
        length(max = 32, message = "Phone number must be at most 32 characters")
    )]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "crate::common::optional_string")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "crate::common::flexible_bool")]
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SearchType {
    Phone,
    Name,
    Company,
    #[default]
    All,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhoneSearchQuery {
    pub q: Option<String>,
    /// `phone`, `name`, `company` or `all` (default)
    #[serde(rename = "type")]
    pub search_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PhoneSearchResult {
    pub id: i32,
    pub phone_number: String,
    pub label: String,
    pub is_primary: bool,
    pub entity_type: PartyKind,
    pub entity_id: i32,
    pub entity_name: String,
    pub person_name: String,
    pub person_designation: String,
    pub person_is_primary: bool,
    /// "Shree Cotton Mills (CONSIGNOR) - 9825012345"
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PersonView {
    pub id: i32,
    pub entity_type: PartyKind,
    pub entity_id: i32,
    pub name: String,
    pub designation: Option<String>,
    pub is_primary: bool,
}

impl From<concerned_person::Model> for PersonView {
    fn from(m: concerned_person::Model) -> Self {
        Self {
            id: m.id,
            entity_type: m.entity_type,
            entity_id: m.entity_id,
            name: m.name,
            designation: m.designation,
            is_primary: m.is_primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PhoneView {
    pub id: i32,
    pub concerned_person_id: i32,
    pub phone_number: String,
    pub label: String,
    pub is_primary: bool,
    /// Only filled when listing across an entity's persons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
}

impl From<phone_book::Model> for PhoneView {
    fn from(m: phone_book::Model) -> Self {
        Self {
            label: m.label_or_default().to_string(),
            id: m.id,
            concerned_person_id: m.concerned_person_id,
            phone_number: m.phone_number,
            is_primary: m.is_primary,
            person_name: None,
        }
    }
}

fn parse_kind(raw: &str) -> Result<PartyKind, ServiceError> {
    PartyKind::from_str(raw.trim()).map_err(|_| {
        ServiceError::field(
            "entity_type",
            "Entity type must be CONSIGNOR, CONSIGNEE, AGENT, DRIVER or OWNER",
        )
    })
}

/// Phone numbers are stored without inner whitespace.
pub fn normalize_phone(raw: &str) -> String {
    raw.split_whitespace().collect()
}

async fn clear_primary_persons<C>(conn: &C, kind: PartyKind, entity_id: i32) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    concerned_person::Entity::update_many()
        .col_expr(concerned_person::Column::IsPrimary, Expr::value(false))
        .filter(concerned_person::Column::EntityType.eq(kind))
        .filter(concerned_person::Column::EntityId.eq(entity_id))
        .filter(concerned_person::Column::IsPrimary.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

async fn clear_primary_phones<C>(conn: &C, person_id: i32) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    phone_book::Entity::update_many()
        .col_expr(phone_book::Column::IsPrimary, Expr::value(false))
        .filter(phone_book::Column::ConcernedPersonId.eq(person_id))
        .filter(phone_book::Column::IsPrimary.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

async fn ensure_number_free<C>(conn: &C, number: &str, except: Option<i32>) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let mut select = phone_book::Entity::find().filter(phone_book::Column::PhoneNumber.eq(number));
    if let Some(id) = except {
        select = select.filter(phone_book::Column::Id.ne(id));
    }
    if let Some(taken) = select.one(conn).await? {
        counter!("transport_phone_duplicate_rejected_total", 1);
        warn!(phone_id = taken.id, "Phone number already registered");
        return Err(ServiceError::Conflict(format!(
            "Phone number {} already exists",
            number
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PhoneBookService {
    db_pool: Arc<DbPool>,
    directory: Arc<dyn PartyDirectory>,
    search_limit: u64,
}

impl PhoneBookService {
    pub fn new(db_pool: Arc<DbPool>, directory: Arc<dyn PartyDirectory>, search_limit: u64) -> Self {
        Self {
            db_pool,
            directory,
            search_limit,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn add_person(&self, input: PersonInput) -> Result<PersonView, ServiceError> {
        input.validate()?;
        let kind = parse_kind(input.entity_type.as_deref().unwrap_or_default())?;
        let entity_id = input
            .entity_id
            .ok_or_else(|| ServiceError::field("entity_id", "Entity is required"))?;
        let name = input
            .name
            .clone()
            .ok_or_else(|| ServiceError::field("name", "Name is required"))?;
        let party = PartyRef::new(kind, entity_id);
        if !self.directory.exists(party).await? {
            return Err(ServiceError::NotFound(format!("{} not found", party)));
        }
        let is_primary = input.is_primary.unwrap_or(false);

        let (txn, scope) = db::begin(&self.db_pool, "Contact creation").await?;
        let result = async {
            if is_primary {
                clear_primary_persons(&txn, kind, entity_id).await?;
            }
            let person = concerned_person::ActiveModel {
                entity_type: Set(kind),
                entity_id: Set(entity_id),
                name: Set(name),
                designation: Set(input.designation.clone()),
                is_primary: Set(is_primary),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            audit::record(&txn, "ConcernedPerson", person.id, audit::CREATE, None).await?;
            Ok::<_, ServiceError>(person)
        }
        .await;

        let person = scope.finish(txn, result).await?;
        info!(person_id = person.id, party = %party, is_primary, "Concerned person added");
        Ok(person.into())
    }

    /// Makes `person_id` the only primary contact of its party.
    #[instrument(skip(self))]
    pub async fn set_primary_person(&self, person_id: i32) -> Result<PersonView, ServiceError> {
        let (txn, scope) = db::begin(&self.db_pool, "Primary contact update").await?;
        let result = async {
            let person = fetch::<concerned_person::Entity, _>(&txn, person_id, "Contact").await?;
            clear_primary_persons(&txn, person.entity_type, person.entity_id).await?;
            let mut active: concerned_person::ActiveModel = person.into();
            active.is_primary = Set(true);
            Ok::<_, ServiceError>(active.update(&txn).await?)
        }
        .await;

        let person = scope.finish(txn, result).await?;
        info!(person_id, "Primary contact set");
        Ok(person.into())
    }

    /// Persons of a party, primary first then by name.
    #[instrument(skip(self))]
    pub async fn list_persons(&self, entity_type: &str, entity_id: i32) -> Result<Vec<PersonView>, ServiceError> {
        let kind = parse_kind(entity_type)?;
        Ok(concerned_person::Entity::find()
            .filter(concerned_person::Column::EntityType.eq(kind))
            .filter(concerned_person::Column::EntityId.eq(entity_id))
            .order_by_desc(concerned_person::Column::IsPrimary)
            .order_by_asc(concerned_person::Column::Name)
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(PersonView::from)
            .collect())
    }

    #[instrument(skip(self, input))]
    pub async fn add_phone(&self, input: PhoneInput) -> Result<PhoneView, ServiceError> {
        input.validate()?;
        let person_id = input
            .concerned_person_id
            .ok_or_else(|| ServiceError::field("concerned_person_id", "Concerned person is required"))?;
        let number = normalize_phone(input.phone_number.as_deref().unwrap_or_default());
        if number.is_empty() {
            return Err(ServiceError::field("phone_number", "Phone number is required"));
        }
        let is_primary = input.is_primary.unwrap_or(false);

        let (txn, scope) = db::begin(&self.db_pool, "Phone creation").await?;
        let result = async {
            fetch::<concerned_person::Entity, _>(&txn, person_id, "Contact").await?;
            ensure_number_free(&txn, &number, None).await?;
            if is_primary {
                clear_primary_phones(&txn, person_id).await?;
            }
            let phone = phone_book::ActiveModel {
                concerned_person_id: Set(person_id),
                phone_number: Set(number.clone()),
                label: Set(input.label.clone()),
                is_primary: Set(is_primary),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            audit::record(&txn, "PhoneBook", phone.id, audit::CREATE, None).await?;
            Ok::<_, ServiceError>(phone)
        }
        .await;

        let phone = scope.finish(txn, result).await?;
        info!(phone_id = phone.id, person_id, is_primary, "Phone added");
        Ok(phone.into())
    }

    #[instrument(skip(self, input))]
    pub async fn update_phone(&self, phone_id: i32, input: PhoneUpdate) -> Result<PhoneView, ServiceError> {
        input.validate()?;
        let number = normalize_phone(input.phone_number.as_deref().unwrap_or_default());
        if number.is_empty() {
            return Err(ServiceError::field("phone_number", "Phone number is required"));
        }
        let is_primary = input.is_primary.unwrap_or(false);

        let (txn, scope) = db::begin(&self.db_pool, "Phone update").await?;
        let result = async {
            let phone = fetch::<phone_book::Entity, _>(&txn, phone_id, "Phone").await?;
            ensure_number_free(&txn, &number, Some(phone_id)).await?;
            if is_primary {
                clear_primary_phones(&txn, phone.concerned_person_id).await?;
            }
            let mut active: phone_book::ActiveModel = phone.into();
            active.phone_number = Set(number.clone());
            active.label = Set(input.label.clone());
            active.is_primary = Set(is_primary);
            let updated = active.update(&txn).await?;
            audit::record(&txn, "PhoneBook", phone_id, audit::UPDATE, None).await?;
            Ok::<_, ServiceError>(updated)
        }
        .await;

        let phone = scope.finish(txn, result).await?;
        info!(phone_id, is_primary, "Phone updated");
        Ok(phone.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_phone(&self, phone_id: i32) -> Result<(), ServiceError> {
        let (txn, scope) = db::begin(&self.db_pool, "Phone deletion").await?;
        let result = async {
            let phone = fetch::<phone_book::Entity, _>(&txn, phone_id, "Phone").await?;
            phone_book::Entity::delete_by_id(phone.id).exec(&txn).await?;
            audit::record(&txn, "PhoneBook", phone_id, audit::DELETE, None).await?;
            Ok::<_, ServiceError>(())
        }
        .await;

        scope.finish(txn, result).await?;
        info!(phone_id, "Phone deleted");
        Ok(())
    }

    /// Makes `phone_id` the only primary phone of its person.
    #[instrument(skip(self))]
    pub async fn set_primary_phone(&self, phone_id: i32) -> Result<PhoneView, ServiceError> {
        let (txn, scope) = db::begin(&self.db_pool, "Primary phone update").await?;
        let result = async {
            let phone = fetch::<phone_book::Entity, _>(&txn, phone_id, "Phone").await?;
            clear_primary_phones(&txn, phone.concerned_person_id).await?;
            let mut active: phone_book::ActiveModel = phone.into();
            active.is_primary = Set(true);
            Ok::<_, ServiceError>(active.update(&txn).await?)
        }
        .await;

        let phone = scope.finish(txn, result).await?;
        info!(phone_id, "Primary phone set");
        Ok(phone.into())
    }

    /// Phones of one person, primary first then by id.
    #[instrument(skip(self))]
    pub async fn list_phones(&self, person_id: i32) -> Result<Vec<PhoneView>, ServiceError> {
        let db = &*self.db_pool;
        fetch::<concerned_person::Entity, _>(db, person_id, "Contact").await?;
        Ok(phone_book::Entity::find()
            .filter(phone_book::Column::ConcernedPersonId.eq(person_id))
            .order_by_desc(phone_book::Column::IsPrimary)
            .order_by_asc(phone_book::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(PhoneView::from)
            .collect())
    }

    /// Phones across every person of a party, primary first then by id.
    #[instrument(skip(self))]
    pub async fn entity_phones(&self, entity_type: &str, entity_id: i32) -> Result<Vec<PhoneView>, ServiceError> {
        let kind = parse_kind(entity_type)?;
        let rows = phone_book::Entity::find()
            .find_also_related(concerned_person::Entity)
            .filter(concerned_person::Column::EntityType.eq(kind))
            .filter(concerned_person::Column::EntityId.eq(entity_id))
            .order_by_desc(phone_book::Column::IsPrimary)
            .order_by_asc(phone_book::Column::Id)
            .all(&*self.db_pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(phone, person)| {
                let mut view = PhoneView::from(phone);
                view.person_name = person.map(|p| p.name);
                view
            })
            .collect())
    }

    /// Searches by phone number, person name, owning party name, or all three.
    /// Party names are resolved through the directory for every candidate.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &PhoneSearchQuery) -> Result<Vec<PhoneSearchResult>, ServiceError> {
        let q = query.q.as_deref().map(str::trim).unwrap_or_default();
        if q.is_empty() {
            return Ok(Vec::new());
        }
        let search_type = query
            .search_type
            .as_deref()
            .map(|t| SearchType::from_str(t.trim()).unwrap_or_default())
            .unwrap_or_default();
        let needle = q.to_lowercase();
        let pattern = format!("%{}%", needle);
        let db = &*self.db_pool;

        let base = || phone_book::Entity::find().find_also_related(concerned_person::Entity);
        let by_phone = || phone_book::Column::PhoneNumber.like(format!("%{}%", normalize_phone(q)));
        let by_name = || Expr::expr(Func::lower(Expr::col((concerned_person::Entity, concerned_person::Column::Name)))).like(pattern.clone());

        let candidates = match search_type {
            SearchType::Phone => base().filter(by_phone()).all(db).await?,
            SearchType::Name => base().filter(by_name()).all(db).await?,
            SearchType::Company | SearchType::All => base().all(db).await?,
        };

        let pairs: Vec<(phone_book::Model, concerned_person::Model)> = candidates
            .into_iter()
            .filter_map(|(phone, person)| person.map(|p| (phone, p)))
            .collect();
        let names = resolve_names(
            self.directory.as_ref(),
            pairs
                .iter()
                .map(|(_, person)| PartyRef::new(person.entity_type, person.entity_id)),
        )
        .await?;

        let phone_needle = normalize_phone(q);
        let mut seen = HashSet::new();
        let mut results: Vec<PhoneSearchResult> = pairs
            .into_iter()
            .filter_map(|(phone, person)| {
                let entity_name = names
                    .get(&PartyRef::new(person.entity_type, person.entity_id))
                    .cloned();
                let company_hit = entity_name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle));
                let keep = match search_type {
                    SearchType::Phone | SearchType::Name => true,
                    SearchType::Company => company_hit,
                    SearchType::All => {
                        company_hit
                            || phone.phone_number.contains(&phone_needle)
                            || person.name.to_lowercase().contains(&needle)
                    }
                };
                if !keep || !seen.insert(phone.id) {
                    return None;
                }

                let entity_name = entity_name.unwrap_or_else(|| "Unknown".to_string());
                Some(PhoneSearchResult {
                    display_name: format!(
                        "{} ({}) - {}",
                        entity_name, person.entity_type, phone.phone_number
                    ),
                    label: phone.label_or_default().to_string(),
                    id: phone.id,
                    phone_number: phone.phone_number,
                    is_primary: phone.is_primary,
                    entity_type: person.entity_type,
                    entity_id: person.entity_id,
                    entity_name,
                    person_name: person.name,
                    person_designation: person.designation.unwrap_or_default(),
                    person_is_primary: person.is_primary,
                })
            })
            .collect();

        results.sort_by(|a, b| b.is_primary.cmp(&a.is_primary).then(a.id.cmp(&b.id)));
        results.truncate(self.search_limit as usize);
        Ok(results)
    }
}
