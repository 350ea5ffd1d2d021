#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;
use transport_api::{
    config::AppConfig,
    db,
    events::{self, EventSender},
    services::{
        phonebook::{PersonInput, PersonView, PhoneInput, PhoneView},
        reference::{QuickCreateInput, ReferenceKind},
    },
    AppState,
};

/// A decoded response: status, headers and the JSON body (Null when empty).
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Harness backed by a fresh SQLite file with the real migrations applied.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _dir: TempDir,
    _event_task: tokio::task::JoinHandle<()>,
}

/// Reference rows created by [`TestApp::with_fixtures`]. Ids are assigned in
/// insertion order so goods 5 and consignees 3 and 7 exist.
pub struct Fixtures {
    pub stations: Vec<i32>,
    pub goods: Vec<i32>,
    pub consignors: Vec<i32>,
    pub consignees: Vec<i32>,
    pub agent: i32,
    pub owner: i32,
    pub driver: i32,
    pub vehicle: i32,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("transport_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        // One connection keeps SQLite writers from tripping over each other.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_task = tokio::spawn(events::process_events(event_rx));
        let state = AppState::new(Arc::new(pool), cfg, EventSender::new(event_tx));
        let router = transport_api::app_router(state.clone());

        Self {
            router,
            state,
            _dir: dir,
            _event_task: event_task,
        }
    }

    /// A fresh app with the reference rows most tests need.
    pub async fn with_fixtures() -> (Self, Fixtures) {
        let app = Self::new().await;
        let fixtures = app.seed().await;
        (app, fixtures)
    }

    pub async fn quick(&self, kind: ReferenceKind, name: &str) -> i32 {
        self.state
            .services
            .reference
            .quick_create(
                kind,
                QuickCreateInput {
                    name: Some(name.to_string()),
                    state: None,
                },
            )
            .await
            .expect("quick create")
            .id
    }

    pub async fn seed(&self) -> Fixtures {
        let mut stations = Vec::new();
        for name in ["Surat", "Mumbai", "Indore"] {
            stations.push(self.quick(ReferenceKind::Station, name).await);
        }
        let mut goods = Vec::new();
        for name in ["Cotton", "Yarn", "Dyes", "Fabric", "Machinery"] {
            goods.push(self.quick(ReferenceKind::Goods, name).await);
        }
        let mut consignors = Vec::new();
        for name in ["Shree Mills", "Narmada Spinners"] {
            consignors.push(self.quick(ReferenceKind::Consignor, name).await);
        }
        let mut consignees = Vec::new();
        for name in [
            "Alpha Traders",
            "Bombay Garments",
            "Crown Textiles",
            "Delta Exports",
            "Eagle Fabrics",
            "Fine Weaves",
            "Malwa Fabrics",
        ] {
            consignees.push(self.quick(ReferenceKind::Consignee, name).await);
        }
        let agent = self.quick(ReferenceKind::BookingAgent, "Patel Roadlines").await;
        let owner = self.quick(ReferenceKind::Owner, "Mahesh Transport").await;
        let driver = self.quick(ReferenceKind::Driver, "Suresh Yadav").await;
        let vehicle = self.quick(ReferenceKind::Vehicle, "GJ 05 AT 4521").await;

        let mut patch = serde_json::Map::new();
        patch.insert("owner_id".into(), json!(owner));
        patch.insert("driver_id".into(), json!(driver));
        self.state
            .services
            .reference
            .update(ReferenceKind::Vehicle, vehicle, patch)
            .await
            .expect("assign vehicle");

        Fixtures {
            stations,
            goods,
            consignors,
            consignees,
            agent,
            owner,
            driver,
            vehicle,
        }
    }

    pub async fn add_person(&self, kind: &str, entity_id: i32, name: &str, primary: bool) -> PersonView {
        self.state
            .services
            .phonebook
            .add_person(PersonInput {
                entity_type: Some(kind.to_string()),
                entity_id: Some(entity_id),
                name: Some(name.to_string()),
                designation: None,
                is_primary: Some(primary),
            })
            .await
            .expect("add person")
    }

    pub async fn add_phone(&self, person_id: i32, number: &str, primary: bool) -> PhoneView {
        self.state
            .services
            .phonebook
            .add_phone(PhoneInput {
                concerned_person_id: Some(person_id),
                phone_number: Some(number.to_string()),
                label: None,
                is_primary: Some(primary),
            })
            .await
            .expect("add phone")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// JSON request in programmatic mode.
    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-requested-with", "XMLHttpRequest");
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).expect("serialize body"))
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("build request")).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.json(Method::GET, uri, None).await
    }

    /// Browser-style form post; `ajax` adds the XMLHttpRequest header.
    pub async fn form(&self, uri: &str, body: &str, ajax: bool) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::ACCEPT, "text/html");
        if ajax {
            builder = builder.header("x-requested-with", "XMLHttpRequest");
        }
        self.send(builder.body(Body::from(body.to_string())).expect("build request"))
            .await
    }
}

/// The smallest valid party order for the fixtures.
pub fn order_body(fx: &Fixtures) -> Value {
    json!({
        "date": "2024-06-01",
        "firm": "New Jalaram Transport Service",
        "from_station_id": fx.stations[0],
        "to_station_id": fx.stations[1],
        "consignor_id": fx.consignors[0],
        "consignee_id": fx.consignees[2],
        "goods_id": fx.goods[4],
        "weight": 2.5,
        "rate": 80
    })
}

/// A complete builty for `order_id`.
pub fn builty_body(fx: &Fixtures, order_id: i32) -> Value {
    json!({
        "order_id": order_id,
        "vehicle_id": fx.vehicle,
        "driver_id": fx.driver,
        "owner_id": fx.owner,
        "from_station_id": fx.stations[0],
        "to_station_id": fx.stations[1],
        "date": "2024-06-02",
        "lr_no": "LR-001"
    })
}
