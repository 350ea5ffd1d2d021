mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use common::{builty_body, order_body, TestApp};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;
use transport_api::{
    config::StatusPolicy,
    entities::{builty, order, transaction_log, Firm},
    errors::ServiceError,
    services::{orders::OrderInput, reference::ReferenceKind},
};

fn ids(body: &serde_json::Value) -> Vec<i32> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|row| row["id"].as_i64().unwrap() as i32)
        .collect()
}

async fn search_orders(app: &TestApp, q: &str) -> Vec<i32> {
    ids(&app.get(&format!("/api/v1/orders?status=all&q={q}")).await.body)
}

async fn create_order(app: &TestApp, body: serde_json::Value) -> i32 {
    let res = app.json(Method::POST, "/api/v1/orders", Some(body)).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    res.body["data"]["id"].as_i64().expect("order id") as i32
}

async fn load_order(app: &TestApp, id: i32) -> order::Model {
    order::Entity::find_by_id(id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .expect("order exists")
}

async fn audit_actions(app: &TestApp, entity: &str, id: i32) -> Vec<String> {
    transaction_log::Entity::find()
        .filter(transaction_log::Column::Entity.eq(entity))
        .filter(transaction_log::Column::EntityId.eq(id))
        .order_by_asc(transaction_log::Column::Id)
        .all(&*app.state.db)
        .await
        .unwrap()
        .into_iter()
        .map(|log| log.action)
        .collect()
}

#[tokio::test]
async fn new_order_without_status_is_new() {
    let (app, fx) = TestApp::with_fixtures().await;
    assert_eq!(fx.goods[4], 5);

    let id = create_order(&app, order_body(&fx)).await;
    let stored = load_order(&app, id).await;

    assert_eq!(stored.status, "NEW");
    assert_eq!(stored.goods_id, 5);
    assert_eq!(stored.weight, Some(2.5));
    assert_eq!(stored.rate, Some(80.0));
    assert_eq!(stored.version, 1);
    assert_eq!(audit_actions(&app, "Order", id).await, vec!["CREATE"]);
}

#[tokio::test]
async fn identical_submission_within_window_is_stored_once() {
    let (app, fx) = TestApp::with_fixtures().await;

    create_order(&app, order_body(&fx)).await;
    let second = app
        .json(Method::POST, "/api/v1/orders", Some(order_body(&fx)))
        .await;

    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["success"], false);
    assert_eq!(
        second.body["message"],
        "Order already exists. Duplicate submission prevented."
    );
    let stored = order::Entity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn different_weight_is_not_a_duplicate() {
    let (app, fx) = TestApp::with_fixtures().await;

    create_order(&app, order_body(&fx)).await;
    let mut other = order_body(&fx);
    other["weight"] = json!(3.0);
    create_order(&app, other).await;

    assert_eq!(order::Entity::find().count(&*app.state.db).await.unwrap(), 2);
}

#[tokio::test]
async fn zero_duplicate_window_allows_resubmission() {
    let app = TestApp::with_config(|cfg| cfg.duplicate_order_window_secs = 0).await;
    let station = app.quick(ReferenceKind::Station, "Surat").await;
    let goods = app.quick(ReferenceKind::Goods, "Cotton").await;
    let body = json!({
        "date": "2024-06-01",
        "firm": "Jalaram Cargo",
        "from_station_id": station,
        "goods_id": goods
    });

    create_order(&app, body.clone()).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    create_order(&app, body).await;

    assert_eq!(order::Entity::find().count(&*app.state.db).await.unwrap(), 2);
}

#[tokio::test]
async fn order_validation_reports_every_field() {
    let (app, _fx) = TestApp::with_fixtures().await;

    let res = app
        .json(
            Method::POST,
            "/api/v1/orders",
            Some(json!({"weight": -1, "firm": "Acme Logistics"})),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = res.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    for expected in ["date", "firm", "goods_id", "weight"] {
        assert!(fields.contains(&expected), "missing {expected} in {fields:?}");
    }
}

#[tokio::test]
async fn unknown_reference_is_not_found() {
    let (app, fx) = TestApp::with_fixtures().await;
    let mut body = order_body(&fx);
    body["consignee_id"] = json!(999);

    let res = app.json(Method::POST, "/api/v1/orders", Some(body)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(order::Entity::find().count(&*app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn builty_creation_dispatches_the_order() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;

    let res = app
        .json(Method::POST, "/api/v1/builty", Some(builty_body(&fx, order_id)))
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    let builty_id = res.body["data"]["id"].as_i64().unwrap() as i32;
    assert_eq!(res.body["data"]["status"], "IN_TRANSIT");
    assert_eq!(res.body["redirect_url"], format!("/api/v1/builty/{builty_id}"));

    let stored = load_order(&app, order_id).await;
    assert_eq!(stored.status, "DISPATCHED");
    assert_eq!(
        audit_actions(&app, "Order", order_id).await,
        vec!["CREATE", "STATUS:DISPATCHED"]
    );
    assert_eq!(audit_actions(&app, "Builty", builty_id).await, vec!["CREATE"]);

    let detail = app.get(&format!("/api/v1/orders/{order_id}")).await;
    assert_eq!(detail.body["data"]["builty_id"], builty_id);
    assert_eq!(detail.body["data"]["goods_description"], "Machinery");
}

#[tokio::test]
async fn builty_creation_dispatches_even_a_closed_order() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;
    app.state.services.orders.set_status(order_id, "CLOSED").await.unwrap();

    app.state
        .services
        .builty
        .create(serde_json::from_value(builty_body(&fx, order_id)).unwrap())
        .await
        .unwrap();

    assert_eq!(load_order(&app, order_id).await.status, "DISPATCHED");
}

#[tokio::test]
async fn an_order_takes_at_most_one_builty() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;

    let first = app
        .json(Method::POST, "/api/v1/builty", Some(builty_body(&fx, order_id)))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .json(Method::POST, "/api/v1/builty", Some(builty_body(&fx, order_id)))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);

    let count = builty::Entity::find()
        .filter(builty::Column::OrderId.eq(order_id))
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn builty_without_driver_changes_nothing() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;
    let mut body = builty_body(&fx, order_id);
    body.as_object_mut().unwrap().remove("driver_id");

    let res = app.json(Method::POST, "/api/v1/builty", Some(body)).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    let errors = res.body["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e["field"] == "driver_id" && e["message"].as_str().unwrap().contains("Driver")));

    assert_eq!(builty::Entity::find().count(&*app.state.db).await.unwrap(), 0);
    assert_eq!(load_order(&app, order_id).await.status, "NEW");
}

#[tokio::test]
async fn builty_parties_are_copied_onto_the_order() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;

    let mut body = builty_body(&fx, order_id);
    body["consignor_id"] = json!(fx.consignors[1]);
    body["booking_agent_id"] = json!(fx.agent);
    body["consignee_id"] = json!(0);
    app.json(Method::POST, "/api/v1/builty", Some(body)).await;

    let stored = load_order(&app, order_id).await;
    assert_eq!(stored.consignor_id, Some(fx.consignors[1]));
    assert_eq!(stored.booking_agent_id, Some(fx.agent));
    // Empty selections leave the order's party alone.
    assert_eq!(stored.consignee_id, Some(fx.consignees[2]));
}

#[tokio::test]
async fn builty_edit_pushes_parties_and_bumps_order_version() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;
    let created = app
        .json(Method::POST, "/api/v1/builty", Some(builty_body(&fx, order_id)))
        .await;
    let builty_id = created.body["data"]["id"].as_i64().unwrap();
    let version_before = load_order(&app, order_id).await.version;

    let mut body = builty_body(&fx, order_id);
    body["consignee_id"] = json!(fx.consignees[5]);
    let res = app
        .json(Method::PUT, &format!("/api/v1/builty/{builty_id}"), Some(body))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let stored = load_order(&app, order_id).await;
    assert_eq!(stored.consignee_id, Some(fx.consignees[5]));
    assert_eq!(stored.version, version_before + 1);
}

#[tokio::test]
async fn editing_order_consignee_updates_the_builty() {
    let (app, fx) = TestApp::with_fixtures().await;
    assert_eq!((fx.consignees[2], fx.consignees[6]), (3, 7));

    let order_id = create_order(&app, order_body(&fx)).await;
    let created = app
        .json(Method::POST, "/api/v1/builty", Some(builty_body(&fx, order_id)))
        .await;
    let builty_id = created.body["data"]["id"].as_i64().unwrap() as i32;
    let builty_version = created.body["data"]["version"].as_i64().unwrap();

    let mut edit = order_body(&fx);
    edit["consignee_id"] = json!(7);
    let res = app
        .json(Method::PUT, &format!("/api/v1/orders/{order_id}"), Some(edit))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let stored = builty::Entity::find_by_id(builty_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.consignee_id, Some(7));
    assert_eq!(i64::from(stored.version), builty_version + 1);
    assert_eq!(
        audit_actions(&app, "Builty", builty_id).await,
        vec!["CREATE", "UPDATE"]
    );
}

#[tokio::test]
async fn order_edit_without_builty_still_succeeds() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;

    let mut edit = order_body(&fx);
    edit["description"] = json!("Urgent");
    let res = app
        .json(Method::PUT, &format!("/api/v1/orders/{order_id}"), Some(edit))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["description"], "Urgent");
    assert_eq!(res.body["data"]["version"], 2);
}

#[tokio::test]
async fn stale_version_is_rejected() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;

    let mut first = order_body(&fx);
    first["expected_version"] = json!(1);
    first["description"] = json!("first");
    let ok = app
        .json(Method::PUT, &format!("/api/v1/orders/{order_id}"), Some(first))
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    let mut second = order_body(&fx);
    second["expected_version"] = json!(1);
    second["description"] = json!("second");
    let stale = app
        .json(Method::PUT, &format!("/api/v1/orders/{order_id}"), Some(second))
        .await;
    assert_eq!(stale.status, StatusCode::CONFLICT);
    assert_eq!(
        load_order(&app, order_id).await.description.as_deref(),
        Some("first")
    );
}

#[tokio::test]
async fn unknown_status_is_stored_verbatim() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;

    let res = app
        .json(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({"status": "BANANA"})),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(load_order(&app, order_id).await.status, "BANANA");
    assert_eq!(
        audit_actions(&app, "Order", order_id).await,
        vec!["CREATE", "STATUS:BANANA"]
    );
}

#[tokio::test]
async fn blank_status_is_a_field_error() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;

    let res = app
        .json(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({"status": "  "})),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"][0]["field"], "status");
}

#[tokio::test]
async fn strict_policy_rejects_backward_moves() {
    let app = TestApp::with_config(|cfg| cfg.order_status_policy = "strict".into()).await;
    assert_eq!(app.state.config.status_policy(), StatusPolicy::Strict);
    let station = app.quick(ReferenceKind::Station, "Surat").await;
    let goods = app.quick(ReferenceKind::Goods, "Cotton").await;
    let orders = &app.state.services.orders;
    let created = orders
        .create(OrderInput {
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            firm: Some("Jalaram Cargo".into()),
            from_station_id: Some(station),
            goods_id: Some(goods),
            ..Default::default()
        })
        .await
        .unwrap();

    orders.set_status(created.id, "DISPATCHED").await.unwrap();
    assert_matches!(
        orders.set_status(created.id, "NEW").await,
        Err(ServiceError::InvalidStatus(_))
    );
    assert_matches!(
        orders.set_status(created.id, "BANANA").await,
        Err(ServiceError::InvalidStatus(_))
    );
    let closed = orders.set_status(created.id, "closed").await.unwrap();
    assert_eq!(closed.status, "CLOSED");
}

#[tokio::test]
async fn deleting_an_order_removes_its_builty() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;
    app.json(Method::POST, "/api/v1/builty", Some(builty_body(&fx, order_id)))
        .await;

    let res = app
        .json(Method::DELETE, &format!("/api/v1/orders/{order_id}"), None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["redirect_url"], "/api/v1/orders");

    assert_eq!(order::Entity::find().count(&*app.state.db).await.unwrap(), 0);
    assert_eq!(builty::Entity::find().count(&*app.state.db).await.unwrap(), 0);
    assert_eq!(
        audit_actions(&app, "Order", order_id).await.last().map(String::as_str),
        Some("DELETE")
    );

    let missing = app.get(&format!("/api/v1/orders/{order_id}")).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_list_hides_dispatched_by_default_and_searches_names() {
    let (app, fx) = TestApp::with_fixtures().await;
    let dispatched = create_order(&app, order_body(&fx)).await;
    app.json(Method::POST, "/api/v1/builty", Some(builty_body(&fx, dispatched)))
        .await;
    let mut other = order_body(&fx);
    other["consignee_id"] = json!(fx.consignees[6]);
    let open = create_order(&app, other).await;

    let active = app.get("/api/v1/orders").await;
    let ids: Vec<i64> = active.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![i64::from(open)]);

    let all = app.get("/api/v1/orders?status=all").await;
    assert_eq!(all.body["data"].as_array().unwrap().len(), 2);

    let by_name = app.get("/api/v1/orders?status=all&q=malwa").await;
    let hits = by_name.body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["consignee_name"], "Malwa Fabrics");
}

#[tokio::test]
async fn draft_copies_order_and_primary_contacts() {
    let (app, fx) = TestApp::with_fixtures().await;
    let person = app
        .add_person("CONSIGNOR", fx.consignors[0], "Ramesh Shah", true)
        .await;
    let phone = app.add_phone(person.id, "98250 12345", true).await;
    let order_id = create_order(&app, order_body(&fx)).await;

    let res = app
        .get(&format!("/api/v1/builty/draft?order_id={order_id}"))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let draft = &res.body["data"];
    assert_eq!(draft["goods_id"], fx.goods[4]);
    assert_eq!(draft["actual_weight"], 2.5);
    assert_eq!(draft["charged_weight"], 2.5);
    assert_eq!(draft["consignor_person_id"], person.id);
    assert_eq!(draft["consignor_phone_id"], phone.id);
    assert!(draft["existing_builty_id"].is_null());
}

#[tokio::test]
async fn order_without_firm_is_a_field_error() {
    let (app, fx) = TestApp::with_fixtures().await;
    let mut body = order_body(&fx);
    body.as_object_mut().unwrap().remove("firm");

    let res = app.json(Method::POST, "/api/v1/orders", Some(body)).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"], json!([{"field": "firm", "message": "Firm is required"}]));
    assert_eq!(order::Entity::find().count(&*app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn order_edit_without_firm_keeps_the_stored_firm() {
    let (app, fx) = TestApp::with_fixtures().await;
    let mut body = order_body(&fx);
    body["firm"] = json!("Jalaram Cargo");
    let order_id = create_order(&app, body.clone()).await;

    body.as_object_mut().unwrap().remove("firm");
    body["description"] = json!("Edited");
    let res = app
        .json(Method::PUT, &format!("/api/v1/orders/{order_id}"), Some(body))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["errors"][0]["field"], "firm");
    let stored = load_order(&app, order_id).await;
    assert_eq!(stored.firm, Firm::JalaramCargo);
    assert_eq!(stored.description, None);
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn status_text_is_stored_as_entered() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = create_order(&app, order_body(&fx)).await;

    let res = app
        .json(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({"status": " confirmed "})),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(load_order(&app, order_id).await.status, "confirmed");
    assert_eq!(
        audit_actions(&app, "Order", order_id).await,
        vec!["CREATE", "STATUS:confirmed"]
    );
}

#[tokio::test]
async fn order_list_filters_by_status_bucket() {
    let (app, fx) = TestApp::with_fixtures().await;
    let dispatched = create_order(&app, order_body(&fx)).await;
    app.json(Method::POST, "/api/v1/builty", Some(builty_body(&fx, dispatched)))
        .await;
    let mut body = order_body(&fx);
    body["weight"] = json!(4.0);
    let held = create_order(&app, body).await;
    app.state.services.orders.set_status(held, "HOLD").await.unwrap();
    let mut body = order_body(&fx);
    body["weight"] = json!(6.0);
    let fresh = create_order(&app, body).await;

    assert_eq!(ids(&app.get("/api/v1/orders").await.body), vec![fresh]);
    assert_eq!(
        ids(&app.get("/api/v1/orders?status=dispatched").await.body),
        vec![dispatched]
    );
    assert_eq!(ids(&app.get("/api/v1/orders?status=HOLD").await.body), vec![held]);
    assert_eq!(
        ids(&app.get("/api/v1/orders?status=all").await.body),
        vec![fresh, held, dispatched]
    );
}

#[tokio::test]
async fn order_search_covers_dates_firms_stations_goods_and_agents() {
    let (app, fx) = TestApp::with_fixtures().await;
    let first = create_order(&app, order_body(&fx)).await;
    let mut body = order_body(&fx);
    body["date"] = json!("2024-07-15");
    body["firm"] = json!("Jalaram Cargo");
    body["from_station_id"] = json!(fx.stations[2]);
    body["goods_id"] = json!(fx.goods[1]);
    body["booking_agent_id"] = json!(fx.agent);
    let second = create_order(&app, body).await;

    assert_eq!(search_orders(&app, "2024-07").await, vec![second]);
    assert_eq!(search_orders(&app, "jalaram%20cargo").await, vec![second]);
    assert_eq!(search_orders(&app, "INDORE").await, vec![second]);
    assert_eq!(search_orders(&app, "yarn").await, vec![second]);
    assert_eq!(search_orders(&app, "machinery").await, vec![first]);
    assert_eq!(search_orders(&app, "patel").await, vec![second]);
    assert!(search_orders(&app, "nowhere").await.is_empty());
    assert!(search_orders(&app, &first.to_string()).await.contains(&first));
}

#[tokio::test]
async fn order_list_is_capped_at_the_search_limit() {
    let app = TestApp::with_config(|cfg| cfg.search_result_limit = 2).await;
    let fx = app.seed().await;
    let mut created = Vec::new();
    for weight in [1.0, 2.0, 3.0] {
        let mut body = order_body(&fx);
        body["weight"] = json!(weight);
        created.push(create_order(&app, body).await);
    }

    let listed = ids(&app.get("/api/v1/orders?status=all").await.body);
    assert_eq!(listed, vec![created[2], created[1]]);
}

#[tokio::test]
async fn builty_list_filters_by_status_and_searches() {
    let (app, fx) = TestApp::with_fixtures().await;
    let first_order = create_order(&app, order_body(&fx)).await;
    let mut body = order_body(&fx);
    body["weight"] = json!(9.0);
    let second_order = create_order(&app, body).await;

    let in_transit = app
        .json(Method::POST, "/api/v1/builty", Some(builty_body(&fx, first_order)))
        .await
        .body["data"]["id"]
        .as_i64()
        .unwrap() as i32;
    let lorry = app.quick(ReferenceKind::Vehicle, "mh 04 ab 9001").await;
    let driver = app.quick(ReferenceKind::Driver, "Rajesh Kumar").await;
    let mut body = builty_body(&fx, second_order);
    body["vehicle_id"] = json!(lorry);
    body["driver_id"] = json!(driver);
    body["lr_no"] = json!("LR-777");
    body["status"] = json!("DELIVERED");
    let delivered = app
        .json(Method::POST, "/api/v1/builty", Some(body))
        .await
        .body["data"]["id"]
        .as_i64()
        .unwrap() as i32;

    assert_eq!(
        ids(&app.get("/api/v1/builty").await.body),
        vec![delivered, in_transit]
    );
    assert_eq!(
        ids(&app.get("/api/v1/builty?status=IN_TRANSIT").await.body),
        vec![in_transit]
    );
    assert_eq!(ids(&app.get("/api/v1/builty?q=lr-777").await.body), vec![delivered]);
    assert_eq!(ids(&app.get("/api/v1/builty?q=gj%2005").await.body), vec![in_transit]);

    let by_driver = app.get("/api/v1/builty?q=rajesh").await;
    assert_eq!(ids(&by_driver.body), vec![delivered]);
    assert_eq!(by_driver.body["data"][0]["driver_name"], "Rajesh Kumar");
    assert_eq!(by_driver.body["data"][0]["lorry_no"], "MH 04 AB 9001");
}
