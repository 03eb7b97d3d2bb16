use async_trait::async_trait;
use sqlx::PgPool;
use umoja_catalog::provider::{CatalogAdmin, CatalogProvider, ProviderResult};
use umoja_catalog::{CatalogItem, ItemKind};

/// Postgres-backed catalog, the `catalog.backend = "postgres"` option.
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_kind(&self, kind: ItemKind) -> ProviderResult<Vec<CatalogItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, kind, title, location, price, duration, date, description, image_url, is_active \
             FROM catalog_items WHERE kind = $1 AND is_active ORDER BY title",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ItemRow::into_item).collect()
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    kind: String,
    title: String,
    location: String,
    price: f64,
    duration: String,
    date: Option<chrono::NaiveDate>,
    description: Option<String>,
    image_url: Option<String>,
    is_active: bool,
}

impl ItemRow {
    fn into_item(self) -> ProviderResult<CatalogItem> {
        let kind = ItemKind::parse(&self.kind)
            .ok_or_else(|| format!("unknown catalog item kind: {}", self.kind))?;
        Ok(CatalogItem {
            id: self.id,
            kind,
            title: self.title,
            location: self.location,
            price: self.price,
            duration: self.duration,
            date: self.date,
            description: self.description,
            image_url: self.image_url,
            is_active: self.is_active,
        })
    }
}

#[async_trait]
impl CatalogProvider for PgCatalog {
    async fn list_tours(&self) -> ProviderResult<Vec<CatalogItem>> {
        self.list_kind(ItemKind::Tour).await
    }

    async fn list_events(&self) -> ProviderResult<Vec<CatalogItem>> {
        self.list_kind(ItemKind::Event).await
    }

    async fn get(&self, id: &str) -> ProviderResult<Option<CatalogItem>> {
        let row: Option<ItemRow> = sqlx::query_as(
            "SELECT id, kind, title, location, price, duration, date, description, image_url, is_active \
             FROM catalog_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ItemRow::into_item).transpose()
    }
}

#[async_trait]
impl CatalogAdmin for PgCatalog {
    async fn upsert(&self, item: CatalogItem) -> ProviderResult<()> {
        sqlx::query(
            r#"
            INSERT INTO catalog_items (id, kind, title, location, price, duration, date, description, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET kind = $2, title = $3, location = $4, price = $5, duration = $6,
                date = $7, description = $8, image_url = $9, is_active = $10
            "#,
        )
        .bind(&item.id)
        .bind(item.kind.as_str())
        .bind(&item.title)
        .bind(&item.location)
        .bind(item.price)
        .bind(&item.duration)
        .bind(item.date)
        .bind(&item.description)
        .bind(&item.image_url)
        .bind(item.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> ProviderResult<bool> {
        let result = sqlx::query("DELETE FROM catalog_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
