mod common;

use axum::http::StatusCode;
use rust_decimal_macros::dec;
use sea_orm::Set;

use common::{decimal, names, product_row, TestApp};

async fn seeded_catalog() -> TestApp {
    let app = TestApp::new().await;

    let mut solitaire = product_row("Classic Solitaire Ring", "Rings", "Gold", dec!(1200), 4);
    solitaire.model = Set(Some("Solitaire".into()));
    solitaire.weight_grams = Set(dec!(3.5));
    solitaire.created_at = Set(app.days_ago(3));
    app.insert_product(solitaire).await;

    let mut band = product_row("Silver Band Ring", "Rings", "Silver", dec!(80), 20);
    band.weight_grams = Set(dec!(2));
    band.created_at = Set(app.days_ago(2));
    app.insert_product(band).await;

    let mut pendant = product_row("Diamond Pendant", "Necklaces", "White Gold", dec!(1850), 2);
    pendant.model = Set(Some("Pendant".into()));
    pendant.weight_grams = Set(dec!(2.5));
    pendant.created_at = Set(app.days_ago(1));
    app.insert_product(pendant).await;

    let mut retired = product_row("Retired Ring", "Rings", "Gold", dec!(500), 1);
    retired.is_active = Set(false);
    app.insert_product(retired).await;

    app
}

#[tokio::test]
async fn lists_active_products_newest_first() {
    let app = seeded_catalog().await;

    let (status, body) = app.get("/api/v1/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        names(&body["data"]),
        ["Diamond Pendant", "Silver Band Ring", "Classic Solitaire Ring"]
    );
}

#[tokio::test]
async fn search_is_case_insensitive_on_name() {
    let app = seeded_catalog().await;

    let (_, body) = app.get("/api/v1/products?search=RING").await;
    assert_eq!(
        names(&body["data"]),
        ["Silver Band Ring", "Classic Solitaire Ring"]
    );
}

#[tokio::test]
async fn filters_combine() {
    let app = seeded_catalog().await;

    let (_, body) = app
        .get("/api/v1/products?category=Rings&material=Gold&minPrice=1000&maxPrice=1200")
        .await;
    assert_eq!(names(&body["data"]), ["Classic Solitaire Ring"]);

    let (_, body) = app.get("/api/v1/products?model=Pendant").await;
    assert_eq!(names(&body["data"]), ["Diamond Pendant"]);

    let (_, body) = app.get("/api/v1/products?minWeight=2&maxWeight=2.5").await;
    assert_eq!(names(&body["data"]), ["Diamond Pendant", "Silver Band Ring"]);
}

#[tokio::test]
async fn blank_filters_are_ignored() {
    let app = seeded_catalog().await;

    let (status, body) = app.get("/api/v1/products?category=&minPrice=&search=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn malformed_price_is_rejected() {
    let app = seeded_catalog().await;

    let (status, body) = app.get("/api/v1/products?minPrice=cheap").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("minPrice"));
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn facets_come_from_active_products() {
    let app = seeded_catalog().await;

    let (status, body) = app.get("/api/v1/products/facets").await;
    assert_eq!(status, StatusCode::OK);
    let facets = &body["data"];
    assert_eq!(facets["categories"], serde_json::json!(["Necklaces", "Rings"]));
    assert_eq!(
        facets["materials"],
        serde_json::json!(["Gold", "Silver", "White Gold"])
    );
    assert_eq!(facets["models"], serde_json::json!(["Pendant", "Solitaire"]));
}

#[tokio::test]
async fn category_counts_skip_inactive_products() {
    let app = seeded_catalog().await;

    let (_, body) = app.get("/api/v1/products/categories").await;
    let counts: Vec<(String, u64)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["category"].as_str().unwrap().to_string(),
                c["count"].as_u64().unwrap(),
            )
        })
        .collect();
    assert!(counts.contains(&("Rings".to_string(), 2)));
    assert!(counts.contains(&("Necklaces".to_string(), 1)));
    assert_eq!(counts.len(), 2);
}

#[tokio::test]
async fn featured_returns_newest_active_products() {
    let app = seeded_catalog().await;

    let (_, body) = app.get("/api/v1/products/featured").await;
    assert_eq!(names(&body["data"])[0], "Diamond Pendant");
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn product_detail_and_missing_product() {
    let app = seeded_catalog().await;
    let (_, list) = app.get("/api/v1/products?search=pendant").await;
    let id = list["data"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/v1/products/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Diamond Pendant");
    assert_eq!(decimal(&body["data"]["price"]), dec!(1850));

    let (status, body) = app
        .get("/api/v1/products/2f1e8a8e-3c43-4c1b-9a43-6f1f3b1f0c11")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn admin_listing_includes_inactive_by_default() {
    let app = seeded_catalog().await;

    let (_, body) = app.get("/api/v1/admin/products").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (_, body) = app
        .get("/api/v1/admin/products?include_inactive=false&search=gold")
        .await;
    assert_eq!(
        names(&body["data"]),
        ["Diamond Pendant", "Classic Solitaire Ring"]
    );
}
