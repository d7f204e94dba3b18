mod dto;
pub mod handlers;
#[cfg(test)]
mod memory;
mod repo;
mod repo_types;

use crate::state::AppState;
use axum::Router;

#[cfg(test)]
pub use memory::MemoryProductStore;
pub use repo::{PgProductStore, ProductStore};

pub fn router() -> Router<AppState> {
    handlers::product_routes()
}
