use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{dto::ProductPayload, repo::ProductStore, repo_types::Product};

/// Isolated in-process store, one per test.
#[derive(Default)]
pub struct MemoryProductStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Product>,
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list_all(&self) -> anyhow::Result<Vec<Product>> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Product>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, payload: &ProductPayload) -> anyhow::Result<Product> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let product = Product {
            id: inner.last_id,
            name: payload.name.clone(),
            description: payload.description.clone(),
            price: payload.price,
            stock: payload.stock,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn replace(&self, id: i64, payload: &ProductPayload) -> anyhow::Result<Option<Product>> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.name = payload.name.clone();
        row.description = payload.description.clone();
        row.price = payload.price;
        row.stock = payload.stock;
        row.updated_at = OffsetDateTime::now_utc().max(row.created_at);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, price: f64) -> ProductPayload {
        ProductPayload {
            name: name.into(),
            description: String::new(),
            price,
            stock: 0,
        }
    }

    #[tokio::test]
    async fn inserted_product_reads_back_with_generated_fields() {
        let store = MemoryProductStore::default();
        let p = ProductPayload {
            name: "Widget".into(),
            description: "blue".into(),
            price: 9.99,
            stock: 5,
        };
        let created = store.insert(&p).await.unwrap();
        let fetched = store.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, p.name);
        assert_eq!(fetched.description, p.description);
        assert_eq!(fetched.price, p.price);
        assert_eq!(fetched.stock, p.stock);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = MemoryProductStore::default();
        let first = store.insert(&payload("a", 1.0)).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());
        let second = store.insert(&payload("b", 1.0)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = MemoryProductStore::default();
        let created = store.insert(&payload("a", 1.0)).await.unwrap();
        assert!(store.delete(created.id).await.unwrap());
        assert!(store.get_by_id(created.id).await.unwrap().is_none());
        assert!(!store.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn replace_on_missing_id_leaves_store_unchanged() {
        let store = MemoryProductStore::default();
        store.insert(&payload("a", 1.0)).await.unwrap();
        assert!(store.replace(99, &payload("ghost", 2.0)).await.unwrap().is_none());
        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "a");
    }

    #[tokio::test]
    async fn replace_overwrites_every_field() {
        let store = MemoryProductStore::default();
        let created = store
            .insert(&ProductPayload {
                name: "Widget".into(),
                description: "blue".into(),
                price: 9.99,
                stock: 5,
            })
            .await
            .unwrap();
        let replaced = store
            .replace(created.id, &payload("Updated", 0.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.description, "");
        assert_eq!(replaced.stock, 0);
        assert_eq!(replaced.created_at, created.created_at);
        assert!(replaced.updated_at >= replaced.created_at);
    }

    #[tokio::test]
    async fn list_len_tracks_inserts_minus_deletes() {
        let store = MemoryProductStore::default();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.insert(&payload(&format!("p{i}"), 1.0)).await.unwrap().id);
        }
        store.delete(ids[1]).await.unwrap();
        store.delete(ids[3]).await.unwrap();
        store.delete(ids[3]).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        let listed: Vec<i64> = all.iter().map(|p| p.id).collect();
        assert_eq!(listed, vec![ids[0], ids[2], ids[4]]);
    }
}
