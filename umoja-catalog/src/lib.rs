pub mod item;
pub mod provider;

pub use item::{CatalogItem, ItemKind};
pub use provider::{derive_destinations, CatalogAdmin, CatalogProvider, MemoryCatalog};
