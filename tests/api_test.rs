use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bookstore_app::app;
use bookstore_kernel::settings::{DatabaseSettings, Settings};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    let settings = Settings {
        database: DatabaseSettings::in_memory(),
        ..Default::default()
    };
    let (_db, registry) = app::prepare(&settings).await.unwrap();
    app::build_app(&registry, &settings)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn gatsby() -> Value {
    json!({
        "title": "The Great Gatsby",
        "author": "F. Scott Fitzgerald",
        "price": 10,
        "category": "Fiction",
        "description": "A novel of the Jazz Age",
        "quantity": 25,
        "inStock": true
    })
}

async fn create_book(app: &Router, book: Value) -> Value {
    let (status, body) = send(app, "POST", "/api/products", Some(book)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn welcome_route_greets() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Welcome to book store"}));
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (status, doc) = send(&app, "GET", "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/products"]["post"].is_object());
    assert!(doc["paths"]["/api/products/{productId}"]["get"].is_object());
    assert!(doc["paths"]["/api/orders"]["post"].is_object());
    assert!(doc["paths"]["/api/orders/revenue"]["get"].is_object());
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn book_crud_round_trip() {
    let app = test_app().await;

    let created = create_book(&app, gatsby()).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["title"], "The Great Gatsby");
    assert_eq!(created["inStock"], true);
    assert!(created["createdAt"].is_string());

    let (status, body) = send(&app, "GET", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book retrieved successfully");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], created);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/products/{id}"),
        Some(json!({"price": 12.5, "quantity": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");
    assert_eq!(body["data"]["price"], 12.5);
    assert_eq!(body["data"]["quantity"], 0);
    assert_eq!(body["data"]["inStock"], false);
    assert_eq!(body["data"]["author"], "F. Scott Fitzgerald");

    let (status, body) = send(&app, "DELETE", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book deleted successfully");
    assert_eq!(body["data"], json!({}));

    let (status, body) = send(&app, "GET", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn list_supports_search_term() {
    let app = test_app().await;
    create_book(&app, gatsby()).await;
    create_book(
        &app,
        json!({
            "title": "A Brief History of Time",
            "author": "Stephen Hawking",
            "price": 18,
            "category": "Science",
            "description": "From the Big Bang to black holes",
            "quantity": 3
        }),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Books retrieved successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/products?searchTerm=HAWKING", None).await;
    let books = body["data"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "A Brief History of Time");

    let (_, body) = send(&app, "GET", "/api/products?searchTerm=fiction", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/api/products?searchTerm=zzz", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn invalid_book_is_rejected_with_details() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({"title": "Untitled", "price": -1, "category": "Cooking"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["error"]["code"], "validation_error");

    let paths: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["path"].as_str().unwrap())
        .collect();
    for field in ["author", "price", "category", "description", "quantity"] {
        assert!(paths.contains(&field), "missing violation for {field}: {paths:?}");
    }

    let (_, body) = send(&app, "GET", "/api/products", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/products")
                .header("content-type", "application/json")
                .body(Body::from("{\"title\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn missing_book_updates_and_deletes_are_not_found() {
    let app = test_app().await;

    let (status, _) = send(&app, "PUT", "/api/products/missing", Some(json!({"price": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/products/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_flow_updates_stock_and_revenue() {
    let app = test_app().await;
    let book = create_book(&app, gatsby()).await;
    let id = book["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({"email": "reader@example.com", "product": id, "quantity": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(body["data"]["product"], id);
    assert_eq!(body["data"]["quantity"], 2);
    assert_eq!(body["data"]["totalPrice"], 20.0);

    let (_, body) = send(&app, "GET", &format!("/api/products/{id}"), None).await;
    assert_eq!(body["data"]["quantity"], 23);
    assert_eq!(body["data"]["inStock"], true);

    let (status, body) = send(&app, "GET", "/api/orders/revenue", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Revenue calculated successfully");
    assert_eq!(body["data"], json!({"totalRevenue": 20.0}));
}

#[tokio::test]
async fn order_business_rules_are_reported() {
    let app = test_app().await;
    let mut small = gatsby();
    small["quantity"] = json!(1);
    let book = create_book(&app, small).await;
    let id = book["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({"email": "reader@example.com", "product": id, "quantity": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient stock");
    assert_eq!(body["error"]["code"], "insufficient_stock");

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({"email": "reader@example.com", "product": "nope", "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Book not found");
    assert_eq!(body["error"]["code"], "book_not_found");

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({"email": "not-an-email", "product": id, "quantity": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/orders/revenue", None).await;
    assert_eq!(body["data"]["totalRevenue"], 0.0);
}

#[tokio::test]
async fn wrong_method_and_bad_query_use_error_envelope() {
    let app = test_app().await;

    let (status, body) = send(&app, "DELETE", "/api/orders/revenue", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "method_not_allowed");

    let (status, body) = send(&app, "GET", "/api/products?searchTerm=a&searchTerm=b", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn search_matches_literal_text_across_cases() {
    let app = test_app().await;
    create_book(&app, gatsby()).await;
    create_book(
        &app,
        json!({
            "title": "Émile",
            "author": "Jean-Jacques Rousseau",
            "price": 9,
            "category": "SelfDevelopment",
            "description": "On education",
            "quantity": 2
        }),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/products?searchTerm=%25", None).await;
    assert_eq!(body["data"], json!([]));

    let (_, body) = send(&app, "GET", "/api/products?searchTerm=%C3%A9mile", None).await;
    let books = body["data"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Émile");
}
