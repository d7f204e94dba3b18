use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use tracing::{debug, info, instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::{dto::ProductPayload, repo_types::Product};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        warn!(id = %raw, "unparsable product id");
        ApiError::BadRequest("Invalid product id".into())
    })
}

// Decoded from raw bytes so a bad body is always a 400, whatever the Content-Type.
fn decode_payload(body: &[u8]) -> Result<ProductPayload, ApiError> {
    let payload: ProductPayload = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "undecodable product body");
        ApiError::BadRequest(e.to_string())
    })?;
    payload.validate().map_err(|msg| {
        warn!(%msg, "invalid product body");
        ApiError::BadRequest(msg)
    })?;
    Ok(payload)
}

#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.products.list_all().await?;
    debug!(count = products.len(), "products listed");
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    match state.products.get_by_id(id).await? {
        Some(product) => Ok(Json(product)),
        None => {
            debug!(id, "product not found");
            Err(ApiError::NotFound)
        }
    }
}

#[instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Product>), ApiError> {
    let payload = decode_payload(&body)?;
    let product = state.products.insert(&payload).await?;
    info!(id = product.id, name = %product.name, "product created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/products/{}", product.id))],
        Json(product),
    ))
}

/// Full replace: fields missing from the body are reset to their defaults.
/// Existence is checked before the body is decoded.
#[instrument(skip(state, body))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    if state.products.get_by_id(id).await?.is_none() {
        debug!(id, "product not found");
        return Err(ApiError::NotFound);
    }

    let payload = decode_payload(&body)?;
    // the row can vanish between lookup and write
    let product = state
        .products
        .replace(id, &payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(id, "product replaced");
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !state.products.delete(id).await? {
        debug!(id, "product not found");
        return Err(ApiError::NotFound);
    }
    info!(id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
