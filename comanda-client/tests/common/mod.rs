//! In-process mock of the ordering backend

#![allow(dead_code)]

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use comanda_client::{ClientConfig, HttpClient};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct MockState {
    pub products: Vec<Value>,
    pub orders: Vec<Value>,
    pub submissions: Vec<Value>,
    pub status_updates: Vec<(i64, String)>,
    pub uploads: Vec<(String, String, usize)>,
    /// Decoded `tipo` path segments, in request order
    pub type_queries: Vec<String>,
    pub next_id: i64,
    /// When set, every order list request fails with 500
    pub fail_orders: bool,
    /// When set, accepted orders are answered with a record that does not decode
    pub malformed_created: bool,
}

pub type Shared = Arc<Mutex<MockState>>;

pub fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "id": 5,
            "nombre": "Pizza Hawaiana",
            "categoria_nombre": "Pizzas",
            "permite_dos_sabores": true,
            "precios": [
                {"id": 12, "tamano_nombre": "Mediana", "precio": "32000.00"},
                {"id": 13, "tamano_nombre": "Grande", "precio": "45000.00"}
            ]
        }),
        json!({
            "id": 9,
            "nombre": "Gaseosa",
            "categoria_nombre": "Bebidas",
            "precio_base": "4000",
            "precios": null
        }),
    ]
}

pub fn order(id: i64, estado: &str) -> Value {
    json!({"id": id, "estado": estado, "mesa": 3, "total_precio": "20000.00", "items": []})
}

async fn productos_publicos(State(state): State<Shared>) -> Json<Value> {
    let products = state.lock().unwrap().products.clone();
    Json(json!({"success": true, "data": products}))
}

async fn categorias_activas() -> Json<Value> {
    // Bare array, no envelope
    Json(json!([
        {"id": 1, "nombre": "Pizzas", "activa": true},
        {"id": 2, "nombre": "Postres", "activa": false}
    ]))
}

async fn productos_tipo(State(state): State<Shared>, Path(tipo): Path<String>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.type_queries.push(tipo.clone());
    let products: Vec<Value> = state
        .products
        .iter()
        .filter(|p| p["categoria_nombre"].as_str().map(str::to_lowercase) == Some(tipo.clone()))
        .cloned()
        .collect();
    Json(json!({"success": true, "data": products}))
}

async fn create_order(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if body["mesa"] == "99" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "").into_response();
    }
    if body["items"].as_array().map(Vec::is_empty).unwrap_or(true) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "El pedido no tiene productos"})),
        )
            .into_response();
    }
    state.next_id += 1;
    let id = state.next_id;
    let record = json!({
        "id": id,
        "estado": "pendiente",
        "mesa": body["mesa"],
        "cliente_nombre": body["cliente_nombre"],
        "total_precio": body["total_precio"],
        "items": body["items"],
    });
    state.submissions.push(body);
    state.orders.push(record.clone());
    if state.malformed_created {
        return (StatusCode::CREATED, Json(json!({"success": true, "data": {"id": "sin-id"}})))
            .into_response();
    }
    (StatusCode::CREATED, Json(json!({"success": true, "data": record}))).into_response()
}

async fn list_orders(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.fail_orders {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "db down"}))).into_response();
    }
    Json(json!({"success": true, "data": state.orders})).into_response()
}

async fn get_order(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = state.lock().unwrap();
    match state.orders.iter().find(|o| o["id"] == id) {
        Some(order) => Json(json!({"success": true, "data": order})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": "Pedido no encontrado"})),
        )
            .into_response(),
    }
}

async fn update_status(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let status = body["status"].as_str().unwrap_or_default().to_string();
    let Some(order) = state.orders.iter_mut().find(|o| o["id"] == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Pedido no encontrado"}))).into_response();
    };
    order["estado"] = json!(status);
    state.status_updates.push((id, status));
    Json(json!({"success": true})).into_response()
}

async fn upload(
    State(state): State<Shared>,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        state
            .lock()
            .unwrap()
            .uploads
            .push((kind.clone(), filename.clone(), bytes.len()));
        return Json(json!({
            "success": true,
            "data": {"url": format!("/uploads/{}/{}", kind, filename), "filename": filename}
        }))
        .into_response();
    }
    (StatusCode::BAD_REQUEST, Json(json!({"error": "No se envió ningún archivo"}))).into_response()
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/productos-publicos", get(productos_publicos))
        .route("/api/categorias-activas", get(categorias_activas))
        .route("/api/productos/tipo/{tipo}", get(productos_tipo))
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/status", put(update_status))
        .route("/api/uploads/{kind}", post(upload))
        .with_state(state)
}

/// Start the mock backend on a random port
pub async fn spawn_backend(state: MockState) -> (Shared, ClientConfig, HttpClient) {
    let shared = Arc::new(Mutex::new(state));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let app = router(shared.clone());
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    let config = ClientConfig::new(format!("http://{}", addr)).with_timeout(5);
    let http = HttpClient::new(&config).expect("http client");
    (shared, config, http)
}

pub fn with_products() -> MockState {
    MockState {
        products: sample_products(),
        ..MockState::default()
    }
}
