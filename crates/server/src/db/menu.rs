//! Menu catalog storage.
//!
//! The catalog is fixed at startup: either loaded from a JSON file or the
//! built-in menu. Pricing reads it on every call, so a future mutable store
//! only has to swap the handle.

use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use forno_core::ProductId;

use crate::models::MenuItem;

/// Errors that can occur when loading the menu.
#[derive(Debug, Error)]
pub enum MenuLoadError {
    /// Could not read the menu file.
    #[error("failed to read menu file: {0}")]
    Io(#[from] std::io::Error),

    /// Menu file is not valid JSON or has the wrong shape.
    #[error("failed to parse menu file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only menu catalog shared across handlers.
#[derive(Clone)]
pub struct MenuStore {
    items: Arc<Vec<MenuItem>>,
}

impl MenuStore {
    /// Create a store over the given items.
    #[must_use]
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    /// Create a store with the built-in menu.
    #[must_use]
    pub fn with_default_menu() -> Self {
        Self::new(default_menu())
    }

    /// Load the catalog from a JSON file: an array of menu items.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, MenuLoadError> {
        let raw = std::fs::read_to_string(path)?;
        let items: Vec<MenuItem> = serde_json::from_str(&raw)?;
        Ok(Self::new(items))
    }

    /// All catalog items, in menu order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }
}

/// The built-in menu used when no menu file is configured.
fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new(
            ProductId::new(1),
            "Margherita".to_string(),
            Decimal::new(4200, 2),
        ),
        MenuItem::new(
            ProductId::new(2),
            "Napoletana".to_string(),
            Decimal::new(4600, 2),
        ),
        MenuItem::new(
            ProductId::new(3),
            "Four Cheese".to_string(),
            Decimal::new(5400, 2),
        ),
        MenuItem::new(
            ProductId::new(4),
            "Pizza Bianca".to_string(),
            Decimal::new(4900, 2),
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_menu_ids_are_unique() {
        let menu = default_menu();
        let mut ids: Vec<_> = menu.iter().map(|item| item.product_id).collect();
        ids.sort_by_key(ProductId::as_u32);
        ids.dedup();
        assert_eq!(ids.len(), menu.len());
    }

    #[test]
    fn test_from_file_parses_items() {
        let dir = std::env::temp_dir();
        let path = dir.join("forno-menu-test.json");
        std::fs::write(
            &path,
            r#"[{"product_id": 7, "name": "Calzone", "price": 39.5}]"#,
        )
        .unwrap();

        let store = MenuStore::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(store.items().len(), 1);
        let item = store.items().first().unwrap();
        assert_eq!(item.product_id, ProductId::new(7));
        assert_eq!(item.name, "Calzone");
        assert_eq!(item.price, Decimal::new(395, 1));
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let result = MenuStore::from_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(MenuLoadError::Io(_))));
    }
}
