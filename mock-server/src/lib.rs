//! In-memory emulation of the product catalog API.
//!
//! Products are stored as raw JSON objects so the server accepts whatever
//! the client sends; only `title` is validated. Ids are assigned
//! sequentially from 1 and echoed back as `id` and `resource_uri`.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

pub type Object = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Catalog {
    last_id: u64,
    products: BTreeMap<u64, Object>,
}

pub type Db = Arc<RwLock<Catalog>>;

#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub limit: usize,
    pub next: Option<String>,
    pub offset: usize,
    pub previous: Option<String>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub meta: Meta,
    pub objects: Vec<Object>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Catalog::default()));
    Router::new()
        .route("/product/", get(list_products).post(create_product))
        .route(
            "/product/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn page_url(limit: usize, offset: usize) -> String {
    format!("/product/?limit={limit}&offset={offset}")
}

fn with_identity(id: u64, product: &Object) -> Object {
    let mut out = product.clone();
    out.insert("id".to_string(), Value::from(id));
    out.insert("resource_uri".to_string(), Value::from(format!("/product/{id}")));
    out
}

async fn list_products(State(db): State<Db>, Query(paging): Query<Paging>) -> Json<ProductPage> {
    let catalog = db.read().await;
    let limit = paging.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = paging.offset.unwrap_or(0);
    let total_count = catalog.products.len();

    let objects = catalog
        .products
        .iter()
        .skip(offset)
        .take(limit)
        .map(|(id, product)| with_identity(*id, product))
        .collect();
    let next_offset = offset.saturating_add(limit);
    let next = (next_offset < total_count).then(|| page_url(limit, next_offset));
    let previous = (offset > 0).then(|| page_url(limit, offset.saturating_sub(limit)));

    Json(ProductPage {
        meta: Meta {
            limit,
            next,
            offset,
            previous,
            total_count,
        },
        objects,
    })
}

fn has_title(product: &Object) -> bool {
    product
        .get("title")
        .and_then(Value::as_str)
        .is_some_and(|title| !title.trim().is_empty())
}

async fn create_product(
    State(db): State<Db>,
    Json(mut input): Json<Object>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1]), (StatusCode, &'static str)> {
    if !has_title(&input) {
        return Err((StatusCode::BAD_REQUEST, "title is required"));
    }
    input.remove("id");
    input.remove("resource_uri");

    let mut catalog = db.write().await;
    catalog.last_id += 1;
    let id = catalog.last_id;
    catalog.products.insert(id, input);
    tracing::info!(id, "created product");
    Ok((StatusCode::CREATED, [(header::LOCATION, format!("/product/{id}"))]))
}

async fn get_product(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Object>, StatusCode> {
    let catalog = db.read().await;
    catalog
        .products
        .get(&id)
        .map(|product| Json(with_identity(id, product)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<Object>,
) -> Result<StatusCode, StatusCode> {
    let mut catalog = db.write().await;
    let product = catalog.products.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    for (key, value) in input {
        if key != "id" && key != "resource_uri" {
            product.insert(key, value);
        }
    }
    tracing::info!(id, "updated product");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_product(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut catalog = db.write().await;
    let removed = catalog.products.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::info!(id, title = ?removed.get("title"), "deleted product");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn identity_is_added_to_copy() {
        let product: Object = json!({"title": "Hat"}).as_object().unwrap().clone();
        let out = with_identity(3, &product);
        assert_eq!(out["id"], 3);
        assert_eq!(out["resource_uri"], "/product/3");
        assert!(!product.contains_key("id"));
    }

    #[test]
    fn title_must_be_non_blank() {
        let blank: Object = json!({"title": "  "}).as_object().unwrap().clone();
        let numeric: Object = json!({"title": 5}).as_object().unwrap().clone();
        let ok: Object = json!({"title": "Hat"}).as_object().unwrap().clone();
        assert!(!has_title(&blank));
        assert!(!has_title(&numeric));
        assert!(!has_title(&Object::new()));
        assert!(has_title(&ok));
    }

    #[test]
    fn meta_serializes_null_cursors() {
        let meta = Meta {
            limit: 20,
            next: None,
            offset: 0,
            previous: None,
            total_count: 0,
        };
        let value = serde_json::to_value(&meta).unwrap();
        assert!(value["next"].is_null());
        assert!(value["previous"].is_null());
    }

    #[test]
    fn page_url_carries_limit_and_offset() {
        assert_eq!(page_url(10, 30), "/product/?limit=10&offset=30");
    }

    #[test]
    fn paging_fields_are_optional() {
        let paging: Paging = serde_json::from_str("{}").unwrap();
        assert!(paging.limit.is_none());
        assert!(paging.offset.is_none());
    }
}
