//! Seed data script - populates the database with a small booking office
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - 4 stations and 3 goods descriptions
//! - 2 consignors, 2 consignees and a booking agent, each with a contact
//! - 2 owners, 2 drivers and 2 vehicles
//! - 3 orders, one of them dispatched with a builty

use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, Utc};
use sea_orm::EntityTrait;
use serde_json::{json, Map, Value};
use tokio::sync::mpsc;
use tracing::info;

use transport_api::{
    config, db,
    entities::order,
    events::{self, EventSender},
    services::{
        builty::BuiltyInput,
        orders::OrderInput,
        phonebook::{PersonInput, PhoneInput},
        reference::{QuickCreateInput, ReferenceKind},
    },
    AppState,
};

async fn quick(state: &AppState, kind: ReferenceKind, name: &str, region: Option<&str>) -> anyhow::Result<i32> {
    let created = state
        .services
        .reference
        .quick_create(
            kind,
            QuickCreateInput {
                name: Some(name.to_string()),
                state: region.map(str::to_string),
            },
        )
        .await
        .with_context(|| format!("creating {} {}", kind, name))?;
    Ok(created.id)
}

async fn patch(state: &AppState, kind: ReferenceKind, id: i32, fields: Value) -> anyhow::Result<()> {
    let fields: Map<String, Value> = match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    state.services.reference.update(kind, id, fields).await?;
    Ok(())
}

async fn contact(
    state: &AppState,
    entity_type: &str,
    entity_id: i32,
    name: &str,
    phone: &str,
) -> anyhow::Result<()> {
    let person = state
        .services
        .phonebook
        .add_person(PersonInput {
            entity_type: Some(entity_type.to_string()),
            entity_id: Some(entity_id),
            name: Some(name.to_string()),
            designation: Some("Manager".to_string()),
            is_primary: Some(true),
        })
        .await?;
    state
        .services
        .phonebook
        .add_phone(PhoneInput {
            concerned_person_id: Some(person.id),
            phone_number: Some(phone.to_string()),
            label: None,
            is_primary: Some(true),
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("=== Transport API Seed Data ===");
    let pool = db::establish_connection_from_app_config(&cfg).await?;
    db::run_migrations(&pool).await?;

    if order::Entity::find().one(&pool).await?.is_some() {
        info!("Orders already present; nothing to seed");
        return Ok(());
    }

    let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
    tokio::spawn(events::process_events(event_rx));
    let state = AppState::new(Arc::new(pool), cfg, EventSender::new(event_tx));

    info!("Creating stations and goods...");
    let surat = quick(&state, ReferenceKind::Station, "surat", Some("Gujarat")).await?;
    let ahmedabad = quick(&state, ReferenceKind::Station, "ahmedabad", Some("Gujarat")).await?;
    let mumbai = quick(&state, ReferenceKind::Station, "mumbai", Some("Maharashtra")).await?;
    let indore = quick(&state, ReferenceKind::Station, "indore", Some("Madhya Pradesh")).await?;
    let cotton = quick(&state, ReferenceKind::Goods, "cotton bales", None).await?;
    let yarn = quick(&state, ReferenceKind::Goods, "polyester yarn", None).await?;
    let dyes = quick(&state, ReferenceKind::Goods, "textile dyes", None).await?;

    info!("Creating parties...");
    let mills = quick(&state, ReferenceKind::Consignor, "shree cotton mills", None).await?;
    patch(&state, ReferenceKind::Consignor, mills, json!({"station_id": surat, "gstin": "24AAACS1234F1Z5"})).await?;
    let spinners = quick(&state, ReferenceKind::Consignor, "narmada spinners", None).await?;
    patch(&state, ReferenceKind::Consignor, spinners, json!({"station_id": ahmedabad})).await?;
    let garments = quick(&state, ReferenceKind::Consignee, "bombay garments", None).await?;
    patch(&state, ReferenceKind::Consignee, garments, json!({"station_id": mumbai})).await?;
    let fabrics = quick(&state, ReferenceKind::Consignee, "malwa fabrics", None).await?;
    patch(&state, ReferenceKind::Consignee, fabrics, json!({"station_id": indore})).await?;
    let agent = quick(&state, ReferenceKind::BookingAgent, "patel roadlines", None).await?;
    patch(&state, ReferenceKind::BookingAgent, agent, json!({"station_id": surat, "city": "Surat"})).await?;

    contact(&state, "CONSIGNOR", mills, "Ramesh Shah", "9825012345").await?;
    contact(&state, "CONSIGNOR", spinners, "Kiran Desai", "9825054321").await?;
    contact(&state, "CONSIGNEE", garments, "Anil Mehta", "9820098200").await?;
    contact(&state, "CONSIGNEE", fabrics, "Sunita Jain", "9893011223").await?;
    contact(&state, "AGENT", agent, "Bharat Patel", "9879900112").await?;

    info!("Creating fleet...");
    let owner_a = quick(&state, ReferenceKind::Owner, "mahesh transport", None).await?;
    let owner_b = quick(&state, ReferenceKind::Owner, "gujarat carriers", None).await?;
    let driver_a = quick(&state, ReferenceKind::Driver, "suresh yadav", None).await?;
    patch(&state, ReferenceKind::Driver, driver_a, json!({"license_no": "GJ05 20190012345"})).await?;
    let driver_b = quick(&state, ReferenceKind::Driver, "rajesh kumar", None).await?;
    let truck_a = quick(&state, ReferenceKind::Vehicle, "gj 05 at 4521", None).await?;
    patch(&state, ReferenceKind::Vehicle, truck_a, json!({"owner_id": owner_a, "driver_id": driver_a, "capacity": 16.0})).await?;
    let truck_b = quick(&state, ReferenceKind::Vehicle, "gj 01 bx 7788", None).await?;
    patch(&state, ReferenceKind::Vehicle, truck_b, json!({"owner_id": owner_b, "driver_id": driver_b, "capacity": 9.0})).await?;
    contact(&state, "DRIVER", driver_a, "Suresh Yadav", "9909012121").await?;

    info!("Creating orders...");
    let today = Utc::now().date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

    let first = state
        .services
        .orders
        .create(OrderInput {
            date: Some(yesterday),
            firm: Some("New Jalaram Transport Service".to_string()),
            from_station_id: Some(surat),
            to_station_id: Some(mumbai),
            consignor_id: Some(mills),
            consignee_id: Some(garments),
            goods_id: Some(cotton),
            weight: Some(12.5),
            rate: Some(1800.0),
            description: Some("120 bales".to_string()),
            ..Default::default()
        })
        .await?;
    state
        .services
        .orders
        .create(OrderInput {
            date: Some(today),
            firm: Some("Jayshree Transport Company".to_string()),
            order_type: Some("AGENT".to_string()),
            from_station_id: Some(surat),
            to_station_id: Some(indore),
            booking_agent_id: Some(agent),
            goods_id: Some(dyes),
            weight: Some(4.0),
            rate: Some(2200.0),
            ..Default::default()
        })
        .await?;
    state
        .services
        .orders
        .create(OrderInput {
            date: Some(today),
            firm: Some("Jalaram Cargo".to_string()),
            from_station_id: Some(ahmedabad),
            to_station_id: Some(indore),
            consignor_id: Some(spinners),
            consignee_id: Some(fabrics),
            goods_id: Some(yarn),
            weight: Some(8.0),
            rate: Some(1500.0),
            status: Some("CONFIRMED".to_string()),
            ..Default::default()
        })
        .await?;

    info!("Dispatching order #{}...", first.id);
    let draft = state.services.builty.draft(Some(first.id)).await?;
    let builty = state
        .services
        .builty
        .create(BuiltyInput {
            order_id: Some(first.id),
            vehicle_id: Some(truck_a),
            driver_id: Some(driver_a),
            owner_id: Some(owner_a),
            from_station_id: draft.from_station_id,
            to_station_id: draft.to_station_id,
            date: Some(today),
            lr_no: Some(format!("LR-{:05}", first.id)),
            goods_id: Some(draft.goods_id),
            actual_weight: draft.actual_weight,
            charged_weight: draft.charged_weight,
            rate: draft.rate,
            advance_amount: Some(5000.0),
            consignor_person_id: draft.consignor_person_id,
            consignor_phone_id: draft.consignor_phone_id,
            consignee_person_id: draft.consignee_person_id,
            consignee_phone_id: draft.consignee_phone_id,
            ..Default::default()
        })
        .await?;

    info!("=== Seed complete: builty #{} issued for order #{} ===", builty.id, first.id);
    Ok(())
}
