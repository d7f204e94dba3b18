use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::{dto::ProductPayload, repo_types::Product};

/// Storage gateway for products. Handlers only ever talk to this trait.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every product, ordered by id.
    async fn list_all(&self) -> anyhow::Result<Vec<Product>>;
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Product>>;
    /// Persists a new product; the store assigns `id` and both timestamps.
    async fn insert(&self, payload: &ProductPayload) -> anyhow::Result<Product>;
    /// Overwrites every mutable field. Returns `None` without writing when `id` is absent.
    async fn replace(&self, id: i64, payload: &ProductPayload) -> anyhow::Result<Option<Product>>;
    /// Hard delete. `false` when nothing matched.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgProductStore {
    db: PgPool,
}

impl PgProductStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list_all(&self) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock, created_at, updated_at
              FROM products
             ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list products")?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock, created_at, updated_at
              FROM products
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("get product {id}"))?;
        Ok(row)
    }

    async fn insert(&self, payload: &ProductPayload) -> anyhow::Result<Product> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, stock, created_at, updated_at
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.stock)
        .fetch_one(&self.db)
        .await
        .context("insert product")?;
        Ok(row)
    }

    async fn replace(&self, id: i64, payload: &ProductPayload) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
               SET name = $2,
                   description = $3,
                   price = $4,
                   stock = $5,
                   updated_at = GREATEST(now(), created_at)
             WHERE id = $1
            RETURNING id, name, description, price, stock, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.stock)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("replace product {id}"))?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete product {id}"))?;
        Ok(result.rows_affected() > 0)
    }
}
