use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sellable entry kinds in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Tour,
    Event,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Tour => "TOUR",
            ItemKind::Event => "EVENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TOUR" => Some(ItemKind::Tour),
            "EVENT" => Some(ItemKind::Event),
            _ => None,
        }
    }
}

/// Read-only catalog snapshot consumed by the booking wizard.
/// Ids are human-readable slugs (e.g. "hiking-001") so they survive in
/// URLs and support conversations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub location: String,
    /// Adult price, per person, USD
    pub price: f64,
    pub duration: String,
    /// Events only; tours run on the traveller's chosen date
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl CatalogItem {
    pub fn is_bookable(&self) -> bool {
        self.is_active && self.price > 0.0
    }
}
