mod common;

use axum::http::{header, Method, StatusCode};
use common::{builty_body, order_body, Fixtures, TestApp};
use sea_orm::{EntityTrait, PaginatorTrait};
use transport_api::entities::{builty, order};

fn order_form(fx: &Fixtures) -> String {
    serde_urlencoded::to_string([
        ("date", "2024-06-01".to_string()),
        ("firm", "Jalaram Cargo".to_string()),
        ("from_station_id", fx.stations[0].to_string()),
        ("to_station_id", fx.stations[1].to_string()),
        ("consignor_id", fx.consignors[0].to_string()),
        ("consignee_id", fx.consignees[2].to_string()),
        ("booking_agent_id", "0".to_string()),
        ("goods_id", fx.goods[4].to_string()),
        ("weight", "2.5".to_string()),
        ("rate", "80".to_string()),
        ("description", "  ".to_string()),
    ])
    .unwrap()
}

#[tokio::test]
async fn browser_form_post_redirects_to_the_new_order() {
    let (app, fx) = TestApp::with_fixtures().await;

    let res = app.form("/api/v1/orders", &order_form(&fx), false).await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    let stored = order::Entity::find().all(&*app.state.db).await.unwrap();
    assert_eq!(stored.len(), 1);
    let created = &stored[0];
    assert_eq!(res.location(), Some(format!("/api/v1/orders/{}", created.id).as_str()));
    assert_eq!(created.booking_agent_id, None);
    assert_eq!(created.description, None);
    assert_eq!(created.weight, Some(2.5));
}

#[tokio::test]
async fn ajax_form_post_gets_the_json_envelope() {
    let (app, fx) = TestApp::with_fixtures().await;

    let res = app.form("/api/v1/orders", &order_form(&fx), true).await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.location().is_none());
    assert_eq!(res.body["success"], true);
    let id = res.body["data"]["id"].as_i64().unwrap();
    assert_eq!(res.body["message"], format!("Order #{id} created"));
    assert_eq!(res.body["redirect_url"], format!("/api/v1/orders/{id}"));
}

#[tokio::test]
async fn accept_json_also_selects_ajax_mode() {
    let (app, fx) = TestApp::with_fixtures().await;
    let created = app
        .json(Method::POST, "/api/v1/orders", Some(order_body(&fx)))
        .await;
    let id = created.body["data"]["id"].as_i64().unwrap();

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/orders/{id}/status"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "application/json")
        .body(axum::body::Body::from("status=CONFIRMED"))
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["status"], "CONFIRMED");
    assert_eq!(res.body["message"], format!("Order #{id} marked CONFIRMED"));
}

#[tokio::test]
async fn form_failures_answer_with_error_json_in_both_modes() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = app
        .json(Method::POST, "/api/v1/orders", Some(order_body(&fx)))
        .await
        .body["data"]["id"]
        .as_i64()
        .unwrap();
    let form = format!(
        "order_id={order_id}&vehicle_id={}&owner_id={}&from_station_id={}&to_station_id={}&date=2024-06-02&driver_id=",
        fx.vehicle, fx.owner, fx.stations[0], fx.stations[1]
    );

    for ajax in [false, true] {
        let res = app.form("/api/v1/builty", &form, ajax).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "ajax={ajax}");
        assert!(res.location().is_none());
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["errors"][0]["field"], "driver_id");
        assert_eq!(res.body["errors"][0]["message"], "Driver is required");
        assert!(res.body["timestamp"].is_string());
    }
    assert_eq!(builty::Entity::find().count(&*app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_form_values_are_bad_requests() {
    let (app, _fx) = TestApp::with_fixtures().await;

    let res = app
        .form("/api/v1/orders", "date=01/06/2024&goods_id=1", true)
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
}

#[tokio::test]
async fn delete_via_post_alias_redirects_to_the_list() {
    let (app, fx) = TestApp::with_fixtures().await;
    let order_id = app
        .json(Method::POST, "/api/v1/orders", Some(order_body(&fx)))
        .await
        .body["data"]["id"]
        .as_i64()
        .unwrap();
    app.json(
        Method::POST,
        "/api/v1/builty",
        Some(builty_body(&fx, order_id as i32)),
    )
    .await;

    let res = app
        .form(&format!("/api/v1/orders/{order_id}/delete"), "", false)
        .await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/api/v1/orders"));
    assert_eq!(order::Entity::find().count(&*app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn checkbox_values_toggle_primary_flags() {
    let (app, fx) = TestApp::with_fixtures().await;
    let person = app.add_person("OWNER", fx.owner, "Mahesh Patel", true).await;

    let res = app
        .form(
            "/api/v1/phonebook/phones",
            &format!("concerned_person_id={}&phone_number=98240+00001&is_primary=on", person.id),
            false,
        )
        .await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(
        res.location(),
        Some(format!("/api/v1/phonebook/persons/{}/phones", person.id).as_str())
    );
    let phones = app
        .state
        .services
        .phonebook
        .list_phones(person.id)
        .await
        .unwrap();
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0].phone_number, "9824000001");
    assert!(phones[0].is_primary);
}

#[tokio::test]
async fn health_and_status_report_the_service() {
    let app = TestApp::new().await;

    let health = app.get("/api/v1/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "up");
    assert_eq!(health.body["database"], "up");

    let status = app.get("/api/v1/status").await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body["environment"], "test");
    assert_eq!(status.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new().await;

    let res = app.get("/api/v1/orders/9999").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.headers.contains_key("x-request-id"));
    assert_eq!(
        res.body["request_id"].as_str(),
        res.headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
    );
}
