use crate::item::{CatalogItem, ItemKind};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::RwLock;

pub type ProviderResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Read interface the booking wizard consumes. Implementations: in-memory
/// seed catalog and the Postgres-backed store, selected by configuration.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn list_tours(&self) -> ProviderResult<Vec<CatalogItem>>;

    async fn list_events(&self) -> ProviderResult<Vec<CatalogItem>>;

    async fn get(&self, id: &str) -> ProviderResult<Option<CatalogItem>>;
}

/// Mutation interface for the admin screens. Kept separate so the wizard
/// only ever sees the read side.
#[async_trait]
pub trait CatalogAdmin: Send + Sync {
    async fn upsert(&self, item: CatalogItem) -> ProviderResult<()>;

    async fn delete(&self, id: &str) -> ProviderResult<bool>;
}

/// Unique, sorted destination list derived from item locations.
pub fn derive_destinations(items: &[CatalogItem]) -> Vec<String> {
    let mut destinations: Vec<String> = items
        .iter()
        .filter(|i| i.is_active)
        .map(|i| i.location.clone())
        .collect();
    destinations.sort();
    destinations.dedup();
    destinations
}

/// In-memory catalog seeded with the operator's line-up.
pub struct MemoryCatalog {
    items: RwLock<Vec<CatalogItem>>,
}

impl MemoryCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The operator's current line-up, used when no database is configured.
    pub fn seeded() -> Self {
        Self::new(seed_items())
    }

    fn snapshot(&self) -> Vec<CatalogItem> {
        self.items.read().expect("catalog lock poisoned").clone()
    }
}

#[async_trait]
impl CatalogProvider for MemoryCatalog {
    async fn list_tours(&self) -> ProviderResult<Vec<CatalogItem>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|i| i.kind == ItemKind::Tour && i.is_active)
            .collect())
    }

    async fn list_events(&self) -> ProviderResult<Vec<CatalogItem>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|i| i.kind == ItemKind::Event && i.is_active)
            .collect())
    }

    async fn get(&self, id: &str) -> ProviderResult<Option<CatalogItem>> {
        Ok(self.snapshot().into_iter().find(|i| i.id == id))
    }
}

#[async_trait]
impl CatalogAdmin for MemoryCatalog {
    async fn upsert(&self, item: CatalogItem) -> ProviderResult<()> {
        let mut items = self.items.write().expect("catalog lock poisoned");
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> ProviderResult<bool> {
        let mut items = self.items.write().expect("catalog lock poisoned");
        let before = items.len();
        items.retain(|i| i.id != id);
        Ok(items.len() < before)
    }
}

fn tour(id: &str, title: &str, location: &str, price: f64, duration: &str, description: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        kind: ItemKind::Tour,
        title: title.to_string(),
        location: location.to_string(),
        price,
        duration: duration.to_string(),
        date: None,
        description: Some(description.to_string()),
        image_url: None,
        is_active: true,
    }
}

fn event(
    id: &str,
    title: &str,
    location: &str,
    price: f64,
    duration: &str,
    date: NaiveDate,
    description: &str,
) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        kind: ItemKind::Event,
        title: title.to_string(),
        location: location.to_string(),
        price,
        duration: duration.to_string(),
        date: Some(date),
        description: Some(description.to_string()),
        image_url: None,
        is_active: true,
    }
}

fn seed_items() -> Vec<CatalogItem> {
    vec![
        tour(
            "hiking-001",
            "Kilimanjaro Day Hike - Mandara Route",
            "Moshi",
            249.0,
            "1 day",
            "Guided day hike through the rainforest belt of Kilimanjaro up to Mandara Hut.",
        ),
        tour(
            "mtb-001",
            "Usambara Mountain Bike Expedition",
            "Lushoto",
            179.0,
            "2 days",
            "Village-to-village riding across the Usambara highlands with local guides.",
        ),
        tour(
            "safari-001",
            "Serengeti Classic Safari",
            "Serengeti",
            450.0,
            "3 days",
            "Game drives across the central Serengeti with tented camp accommodation.",
        ),
        tour(
            "safari-002",
            "Ngorongoro Crater Day Trip",
            "Karatu",
            320.0,
            "1 day",
            "Full-day crater descent with picnic lunch at the hippo pool.",
        ),
        tour(
            "zanzibar-001",
            "Stone Town & Spice Farm Tour",
            "Zanzibar",
            95.0,
            "1 day",
            "Historic Stone Town walk followed by a working spice farm visit.",
        ),
        event(
            "evt-001",
            "Sauti za Busara Festival Package",
            "Zanzibar",
            60.0,
            "1 evening",
            NaiveDate::from_ymd_opt(2027, 2, 12).expect("valid seed date"),
            "Festival entry with reserved transport from Stone Town hotels.",
        ),
        event(
            "evt-002",
            "Kilimanjaro Marathon Support Package",
            "Moshi",
            45.0,
            "1 day",
            NaiveDate::from_ymd_opt(2027, 2, 28).expect("valid seed date"),
            "Race-day logistics, hydration points and finish-line recovery tent.",
        ),
        event(
            "evt-003",
            "Full Moon Dhow Cruise",
            "Zanzibar",
            75.0,
            "1 evening",
            NaiveDate::from_ymd_opt(2026, 10, 25).expect("valid seed date"),
            "Sunset dhow sail along the west coast with Swahili dinner on board.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_catalog_splits_by_kind() {
        let catalog = MemoryCatalog::seeded();

        let tours = catalog.list_tours().await.unwrap();
        let events = catalog.list_events().await.unwrap();

        assert!(tours.iter().all(|i| i.kind == ItemKind::Tour));
        assert!(events.iter().all(|i| i.kind == ItemKind::Event));
        assert!(tours.iter().any(|i| i.id == "hiking-001"));
        assert!(events.iter().any(|i| i.id == "evt-001"));
    }

    #[tokio::test]
    async fn get_returns_snapshot_by_id() {
        let catalog = MemoryCatalog::seeded();

        let item = catalog.get("hiking-001").await.unwrap().unwrap();
        assert_eq!(item.price, 249.0);
        assert_eq!(item.kind, ItemKind::Tour);

        assert!(catalog.get("nope-999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inactive_items_are_hidden_from_listings() {
        let catalog = MemoryCatalog::seeded();
        let mut item = catalog.get("mtb-001").await.unwrap().unwrap();
        item.is_active = false;
        catalog.upsert(item).await.unwrap();

        let tours = catalog.list_tours().await.unwrap();
        assert!(tours.iter().all(|i| i.id != "mtb-001"));
    }

    #[test]
    fn destinations_are_unique_and_sorted() {
        let items = seed_items();
        let destinations = derive_destinations(&items);

        let mut sorted = destinations.clone();
        sorted.sort();
        assert_eq!(destinations, sorted);
        assert_eq!(
            destinations.iter().filter(|d| d.as_str() == "Zanzibar").count(),
            1
        );
    }

    #[tokio::test]
    async fn upsert_replaces_existing_entry() {
        let catalog = MemoryCatalog::seeded();
        let mut item = catalog.get("safari-001").await.unwrap().unwrap();
        item.price = 499.0;
        catalog.upsert(item).await.unwrap();

        let updated = catalog.get("safari-001").await.unwrap().unwrap();
        assert_eq!(updated.price, 499.0);

        assert!(catalog.delete("safari-001").await.unwrap());
        assert!(catalog.get("safari-001").await.unwrap().is_none());
    }
}
