use std::sync::Arc;

use crate::config::AppConfig;
use crate::db;
use crate::products::{PgProductStore, ProductStore};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductStore>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config.db).await?;
        let products = Arc::new(PgProductStore::new(pool)) as Arc<dyn ProductStore>;
        Ok(Self::from_store(products))
    }

    pub fn from_store(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        use crate::products::MemoryProductStore;

        Self::from_store(Arc::new(MemoryProductStore::default()))
    }
}
