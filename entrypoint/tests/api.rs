use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use crawler::unprotected::{CrawlerSettings, UnprotectedCrawler};
use scrapers::ScrapeClient;
use serde_json::{Value, json};
use server::{ServerState, build_router, sync::SyncService};
use storage::{FileStore, Store, TemplateLibrary};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const PRICING_PAGE: &str = r#"
    <table>
      <tr><th>Product</th><th>Billing Unit</th><th>Billed Annually</th><th>Billed Month-to-month</th><th>On-demand</th></tr>
      <tr><td>Infrastructure Pro</td><td>per host</td><td>$15</td><td>$18</td><td>$0.03</td></tr>
      <tr><td>Infrastructure Enterprise</td><td>per host</td><td>$23</td><td>$27</td><td>$0.04</td></tr>
      <tr><td>Custom Metrics</td><td>per custom metric</td><td>$0.05</td><td>$0.05</td><td>$0.05</td></tr>
    </table>
"#;

const TEMPLATE: &str = r#"{
    "id": "starter",
    "name": "Starter",
    "description": "Ten hosts",
    "billing_type": "annually",
    "items": [{"product": "Infrastructure Pro", "quantity": 10}]
}"#;

struct TestApp {
    router: Router,
    // kept alive for the store's lifetime
    _data_dir: TempDir,
    _vendor: MockServer,
}

async fn test_app() -> TestApp {
    let vendor = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pricing/list/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRICING_PAGE))
        .mount(&vendor)
        .await;

    Mock::given(method("GET"))
        .and(path("/pricing/allotments/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&vendor)
        .await;

    let data_dir = tempfile::tempdir().unwrap();
    let templates_dir = data_dir.path().join("templates");
    std::fs::create_dir_all(&templates_dir).unwrap();
    std::fs::write(templates_dir.join("template-starter.json"), TEMPLATE).unwrap();

    let store: Arc<dyn Store> = Arc::new(FileStore::new(data_dir.path()));
    let crawler = UnprotectedCrawler::with_settings(CrawlerSettings {
        https_only: false,
        max_retries: 0,
        ..Default::default()
    })
    .unwrap();

    let pricing_url = format!("{}/pricing/list/", vendor.uri());
    let allotments_url = format!("{}/pricing/allotments/", vendor.uri());

    let state = ServerState::with_sync(store, TemplateLibrary::new(templates_dir), |store, cache| {
        SyncService::new(store, cache, ScrapeClient::new(crawler))
            .with_pricing_url(Some(pricing_url))
            .with_allotments_url(Some(allotments_url))
    });

    TestApp {
        router: build_router(Arc::new(state), None),
        _data_dir: data_dir,
        _vendor: vendor,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let body = match bytes.is_empty() {
        true => Value::Null,
        false => serde_json::from_slice(&bytes).unwrap(),
    };

    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn with_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn synced_app() -> TestApp {
    let app = test_app().await;
    let (status, body) = send(&app, post_empty("/api/pricing/sync?region=us1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    app
}

#[tokio::test]
async fn health_and_root() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));

    let (_, body) = send(&app, get("/")).await;
    assert_eq!(body["message"], "PriceHound API");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn lists_regions() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/regions")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_object().unwrap().len(), 6);
    assert_eq!(body["eu1"]["site"], "datadoghq.eu");
}

#[tokio::test]
async fn unknown_region_is_a_bad_request() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/pricing?region=mars")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown region: mars");
}

#[tokio::test]
async fn sync_then_read_pricing() {
    let app = test_app().await;

    let (_, body) = send(&app, get("/api/pricing/metadata?region=us1")).await;
    assert_eq!(body, json!({}));

    let (status, body) = send(&app, post_empty("/api/pricing/sync?region=us1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products_count"], 3);
    assert_eq!(body["message"], "Successfully synced 3 products for US1 (Virginia)");

    let (_, body) = send(&app, get("/api/pricing")).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["product"], "Infrastructure Pro");

    let (_, body) = send(&app, get("/api/pricing/metadata?region=us1")).await;
    assert_eq!(body["products_count"], 3);

    let (_, body) = send(&app, get("/api/regions/status")).await;
    let statuses = body.as_array().unwrap();
    assert_eq!(statuses.len(), 6);
    assert_eq!(statuses[0]["id"], "us1");
    assert_eq!(statuses[0]["synced"], true);
    assert_eq!(statuses[1]["synced"], false);
}

#[tokio::test]
async fn products_filter_by_plan() {
    let app = synced_app().await;

    let (_, all) = send(&app, get("/api/products?region=us1")).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, pro) = send(&app, get("/api/products?region=us1&plan=pro")).await;
    assert_eq!(status, StatusCode::OK);

    let names = pro
        .as_array()
        .unwrap()
        .iter()
        .map(|product| product["product"].as_str().unwrap())
        .collect::<Vec<&str>>();
    assert_eq!(names, vec!["Infrastructure Pro", "Custom Metrics"]);
}

#[tokio::test]
async fn preview_applies_allotments_without_storing() {
    let app = synced_app().await;

    let input = json!({
        "billing_type": "annually",
        "items": [
            {"product": "Infrastructure Pro", "quantity": 10},
            {"product": "Custom Metrics", "quantity": 1500}
        ]
    });

    let (status, quote) = send(&app, with_json("POST", "/api/quotes/preview", &input)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["items"][1]["included_quantity"], 1000);
    assert_eq!(quote["items"][1]["chargeable_quantity"], 500);
    assert_eq!(quote["total_annually"], 175.0);
    assert_eq!(quote["total_monthly"], 205.0);
    assert_eq!(quote["savings_vs_monthly"], 30.0);

    let (_, quotes) = send(&app, get("/api/quotes")).await;
    assert_eq!(quotes, json!([]));
}

#[tokio::test]
async fn synced_allotments_only_take_ids_from_exact_product_names() {
    let app = synced_app().await;

    // the vendor page fails, so the manual rules are stored with ids from the price table
    let (_, outcome) = send(&app, post_empty("/api/allotments/sync")).await;
    assert_eq!(outcome["success"], true);

    let (_, rules) = send(&app, get("/api/allotments/product/Infrastructure%20Pro")).await;
    let rules = rules.as_array().unwrap();
    let rule_for = |allotted: &str| {
        rules
            .iter()
            .find(|rule| rule["allotted_product"] == allotted)
            .unwrap()
            .clone()
    };

    assert_eq!(
        rule_for("Custom Metrics")["allotted_product_id"],
        "custom-metrics-per-custom-metric"
    );
    assert!(rule_for("Ingested Custom Metrics").get("allotted_product_id").is_none());

    let input = json!({
        "billing_type": "annually",
        "items": [
            {"product": "Infrastructure Pro", "quantity": 10},
            {"product": "Custom Metrics", "quantity": 3000}
        ]
    });
    let (_, quote) = send(&app, with_json("POST", "/api/quotes/preview", &input)).await;

    assert_eq!(quote["items"][1]["included_quantity"], 1000);
    assert_eq!(quote["items"][1]["chargeable_quantity"], 2000);
    assert_eq!(quote["total_annually"], 250.0);
}

#[tokio::test]
async fn quantities_beyond_storable_range_are_rejected() {
    let app = synced_app().await;

    let input = json!({
        "billing_type": "annually",
        "items": [{"product": "Infrastructure Pro", "quantity": u64::MAX}]
    });

    let (status, body) = send(&app, with_json("POST", "/api/quotes", &input)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], format!("Quantity {} is too large", u64::MAX));

    let (_, quotes) = send(&app, get("/api/quotes")).await;
    assert_eq!(quotes, json!([]));
}

#[tokio::test]
async fn protected_quote_lifecycle() {
    let app = synced_app().await;

    let input = json!({
        "billing_type": "monthly",
        "edit_password": "hunter2",
        "items": [{"product": "Infrastructure Pro", "quantity": 2}]
    });

    let (status, created) = send(&app, with_json("POST", "/api/quotes", &input)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["total"], 36.0);
    assert_eq!(created["is_protected"], true);
    assert!(created.get("edit_password_hash").is_none());

    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], format!("Quote {}", &id[..8]));

    let uri = format!("/api/quotes/{id}");

    let (_, fetched) = send(&app, get(&uri)).await;
    assert_eq!(fetched["id"], id.as_str());
    assert!(fetched.get("edit_password_hash").is_none());

    // editing without the password is refused
    let update = json!({
        "name": "Renamed",
        "billing_type": "monthly",
        "items": [{"product": "Infrastructure Pro", "quantity": 3}]
    });
    let (status, _) = send(&app, with_json("PUT", &uri, &update)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut authorized = update.clone();
    authorized["edit_password"] = json!("hunter2");
    let (status, updated) = send(&app, with_json("PUT", &uri, &authorized)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Renamed");
    assert_eq!(updated["total"], 54.0);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_eq!(updated["is_protected"], true);

    let verify_uri = format!("/api/quotes/{id}/verify-password");
    let (_, verified) = send(&app, with_json("POST", &verify_uri, &json!({"password": "hunter2"}))).await;
    assert_eq!(verified["valid"], true);
    let (_, rejected) = send(&app, with_json("POST", &verify_uri, &json!({"password": "nope"}))).await;
    assert_eq!(rejected["valid"], false);

    let delete = |password: Option<&str>| {
        let mut builder = Request::builder().method("DELETE").uri(&uri);
        if let Some(password) = password {
            builder = builder.header("X-Edit-Password", password);
        }
        builder.body(Body::empty()).unwrap()
    };

    let (status, _) = send(&app, delete(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, delete(Some("hunter2"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Quote deleted successfully");

    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unprotected_quotes_list_newest_first() {
    let app = synced_app().await;

    for name in ["First", "Second"] {
        let input = json!({
            "name": name,
            "billing_type": "annual",
            "items": [{"product": "Infrastructure Pro", "quantity": 1}]
        });
        let (status, _) = send(&app, with_json("POST", "/api/quotes", &input)).await;
        assert_eq!(status, StatusCode::OK);

        // timestamps have millisecond resolution
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (_, quotes) = send(&app, get("/api/quotes")).await;
    let names = quotes
        .as_array()
        .unwrap()
        .iter()
        .map(|quote| quote["name"].as_str().unwrap())
        .collect::<Vec<&str>>();

    assert_eq!(names, vec!["Second", "First"]);
    assert_eq!(quotes[0]["is_protected"], false);
}

#[tokio::test]
async fn malformed_or_missing_quote_ids_are_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/quotes/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Quote not found");

    let (status, _) = send(&app, get("/api/quotes/7d4f5b0e-5a8e-4b8c-9a43-2f0c2a1f9e11")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_bodies_are_bad_requests() {
    let app = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/quotes")
        .header("content-type", "application/json")
        .body(Body::from("{\"items\": ["))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");

    let missing_billing = json!({"items": []});
    let (status, _) = send(&app, with_json("POST", "/api/quotes", &missing_billing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_region = json!({"region": "mars", "billing_type": "annually", "items": []});
    let (status, _) = send(&app, with_json("POST", "/api/quotes", &bad_region)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn allotments_fall_back_to_manual_rules() {
    let app = test_app().await;

    let (_, allotments) = send(&app, get("/api/allotments")).await;
    assert_eq!(allotments.as_array().unwrap().len(), 20);

    let (_, metadata) = send(&app, get("/api/allotments/metadata")).await;
    assert_eq!(metadata, json!({}));

    // the vendor page answers 500, so the sync stores the manual table
    let (status, outcome) = send(&app, post_empty("/api/allotments/sync")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["message"], "Using manual allotments data (20 items)");

    let (_, metadata) = send(&app, get("/api/allotments/metadata")).await;
    assert_eq!(metadata["source"], "manual");
    assert_eq!(metadata["allotments_count"], 20);

    let (_, apm) = send(&app, get("/api/allotments/product/apm")).await;
    assert_eq!(apm.as_array().unwrap().len(), 4);

    let (_, init) = send(&app, post_empty("/api/allotments/init")).await;
    assert_eq!(init["message"], "Initialized 20 manual allotments");
}

#[tokio::test]
async fn templates_are_served_from_disk() {
    let app = test_app().await;

    let (_, templates) = send(&app, get("/api/templates")).await;
    assert_eq!(templates.as_array().unwrap().len(), 1);

    let (status, template) = send(&app, get("/api/templates/starter")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(template["items"][0]["quantity"], 10);

    let (status, _) = send(&app, get("/api/templates/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
