use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "phone_book")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub concerned_person_id: i32,
    /// Unique across the whole directory
    #[sea_orm(unique)]
    pub phone_number: String,
    pub is_primary: bool,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn label_or_default(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or("Primary")
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::concerned_person::Entity",
        from = "Column::ConcernedPersonId",
        to = "super::concerned_person::Column::Id",
        on_delete = "Cascade"
    )]
    ConcernedPerson,
}

impl Related<super::concerned_person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConcernedPerson.def()
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
