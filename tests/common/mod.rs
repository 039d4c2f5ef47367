#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{DateTime, Duration, Utc};
use jewelry_store_api::{
    analytics::Calendar,
    build_router,
    commands::RecordingCommandSink,
    config::AppConfig,
    db,
    entities::{inventory_log, product, sale},
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

/// Router over a migrated SQLite file, a fixed clock and a recording sink.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub sink: Arc<RecordingCommandSink>,
    pub now: DateTime<Utc>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::at(Utc::now()).await
    }

    /// Application whose clock reads `now`
    pub async fn at(now: DateTime<Utc>) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("jewelry_store_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let sink = Arc::new(RecordingCommandSink::new());
        let state = AppState::new(
            Arc::new(pool),
            cfg,
            Calendar::fixed_utc(now),
            sink.clone(),
        );

        Self {
            router: build_router(state.clone()),
            state,
            sink,
            now,
            _dir: dir,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router response")
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.request(Method::GET, uri, None).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn post(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        let response = self.request(Method::POST, uri, Some(payload)).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    /// Inserts `row`, filling in timestamps relative to the clock
    pub async fn insert_product(&self, mut row: product::ActiveModel) -> product::Model {
        if row.created_at.is_not_set() {
            row.created_at = Set(self.now);
        }
        if row.updated_at.is_not_set() {
            row.updated_at = Set(self.now);
        }
        row.insert(self.state.db.as_ref()).await.expect("insert product")
    }

    pub async fn insert_sale(
        &self,
        product_id: Uuid,
        quantity: i32,
        total: Decimal,
        sale_date: DateTime<Utc>,
    ) -> sale::Model {
        sale::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            customer_name: Set("Walk-in".to_string()),
            customer_email: Set(None),
            customer_phone: Set(None),
            quantity: Set(quantity),
            discount_amount: Set(Decimal::ZERO),
            total_amount: Set(total),
            notes: Set(None),
            sale_date: Set(sale_date),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("insert sale")
    }

    pub async fn insert_log(
        &self,
        product_id: Uuid,
        change: i32,
        reason: &str,
        at: DateTime<Utc>,
    ) -> inventory_log::Model {
        inventory_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            quantity_change: Set(change),
            change_reason: Set(reason.to_string()),
            created_at: Set(at),
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("insert inventory log")
    }

    pub fn days_ago(&self, days: i64) -> DateTime<Utc> {
        self.now - Duration::days(days)
    }
}

/// Active product row with no model, weight or image
pub fn product_row(
    name: &str,
    category: &str,
    material: &str,
    price: Decimal,
    stock: i32,
) -> product::ActiveModel {
    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        category: Set(category.to_string()),
        material: Set(material.to_string()),
        model: Set(None),
        price: Set(price),
        weight_grams: Set(Decimal::ZERO),
        stock_quantity: Set(stock),
        is_active: Set(true),
        is_featured: Set(false),
        image_url: Set(None),
        ..Default::default()
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Decimal fields serialize as strings
pub fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {}", value))
        .parse()
        .expect("decimal")
}

pub fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|p| p["name"].as_str().expect("name").to_string())
        .collect()
}
