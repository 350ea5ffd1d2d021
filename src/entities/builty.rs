use super::enums::Firm;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lorry receipt for exactly one order. Carries its own copy of the party
/// selections, which is pushed back onto the order on every write.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "builty")]
#[schema(as = Builty)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub order_id: i32,
    pub vehicle_id: i32,
    pub driver_id: i32,
    pub owner_id: i32,
    pub date: NaiveDate,
    pub firm: Firm,
    pub lr_no: Option<String>,
    pub from_station_id: i32,
    pub to_station_id: i32,
    pub status: String,
    pub invoice_no: Option<String>,
    pub eway_bill_no: Option<String>,
    pub goods_id: Option<i32>,
    pub actual_weight: Option<f64>,
    pub charged_weight: Option<f64>,
    pub rate: Option<f64>,
    pub advance_amount: Option<f64>,

    pub consignor_id: Option<i32>,
    pub consignee_id: Option<i32>,
    pub booking_agent_id: Option<i32>,
    pub consignor_person_id: Option<i32>,
    pub consignor_phone_id: Option<i32>,
    pub consignee_person_id: Option<i32>,
    pub consignee_phone_id: Option<i32>,
    pub agent_person_id: Option<i32>,
    pub agent_phone_id: Option<i32>,

    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id",
        on_delete = "Restrict"
    )]
    Vehicle,
    #[sea_orm(
        belongs_to = "super::driver::Entity",
        from = "Column::DriverId",
        to = "super::driver::Column::Id",
        on_delete = "Restrict"
    )]
    Driver,
    #[sea_orm(
        belongs_to = "super::owner::Entity",
        from = "Column::OwnerId",
        to = "super::owner::Column::Id",
        on_delete = "Restrict"
    )]
    Owner,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl Related<super::driver::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
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
