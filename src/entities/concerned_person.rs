use super::enums::PartyKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// A named contact at a consignor, consignee, agent, driver or owner.
///
/// `(entity_type, entity_id)` is a polymorphic owner reference without a
/// foreign key; see [`crate::services::party_directory`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "concerned_persons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub entity_type: PartyKind,
    pub entity_id: i32,
    pub name: String,
    pub designation: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::phone_book::Entity")]
    Phones,
}

impl Related<super::phone_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phones.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(Utc::now());
        }
        Ok(self)
    }
}
