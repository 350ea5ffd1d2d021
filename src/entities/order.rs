use super::enums::{Firm, OrderType};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A shipment request. Party columns (consignor/consignee) and agent columns
/// always exist; `order_type` decides which set is meaningful.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "orders")]
#[schema(as = Order)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: NaiveDate,
    pub firm: Firm,
    pub order_type: OrderType,
    pub from_station_id: Option<i32>,
    pub to_station_id: Option<i32>,

    pub consignor_id: Option<i32>,
    pub consignee_id: Option<i32>,
    pub booking_agent_id: Option<i32>,
    pub consignor_person_id: Option<i32>,
    pub consignor_phone_id: Option<i32>,
    pub consignee_person_id: Option<i32>,
    pub consignee_phone_id: Option<i32>,
    pub agent_person_id: Option<i32>,
    pub agent_phone_id: Option<i32>,

    pub goods_id: i32,
    pub weight: Option<f64>,
    pub rate: Option<f64>,
    pub description: Option<String>,
    pub status: String,
    /// Bumped on every write, including writes caused by builty sync
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::builty::Entity")]
    Builty,
    #[sea_orm(
        belongs_to = "super::goods::Entity",
        from = "Column::GoodsId",
        to = "super::goods::Column::Id",
        on_delete = "Restrict"
    )]
    Goods,
}

impl Related<super::builty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Builty.def()
    }
}

impl Related<super::goods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goods.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            if self.created_at.is_not_set() {
                self.created_at = Set(now);
            }
            if self.version.is_not_set() {
                self.version = Set(1);
            }
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
