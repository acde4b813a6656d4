//! Static menu catalogue: item definitions, loading, and browsing queries.
//!
//! The catalogue is loaded once (typically from a JSON file shipped with the
//! site) and never mutated. The cart copies the display fields it needs at
//! insertion time, so nothing here is referenced after an item is added.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogueError;
use crate::money::Money;
use crate::size::Size;

/// Highest base price a catalogue item may carry.
///
/// Keeps every size-adjusted line total well inside `u64` öre, even at the
/// largest quantity a line can hold.
pub const MAX_ITEM_PRICE: Money = Money::from_kronor(100_000);

/// Identifier of a catalogue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Menu section an item is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Pizza,
    Salad,
    Side,
    Drink,
    Dessert,
}

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price of the small size.
    pub price: Money,
    /// Image path or URL, relative to the site's asset root.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub spicy: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub popular: bool,
}

impl CatalogueItem {
    /// Size-adjusted unit price, as the cart will charge it.
    pub fn price_for(&self, size: Size) -> Money {
        size.price(self.price, 1)
    }

    /// Check the fields the cart relies on.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::EmptyName`] or [`CatalogueError::InvalidPrice`].
    pub fn validate(&self) -> Result<(), CatalogueError> {
        if self.name.trim().is_empty() {
            return Err(CatalogueError::EmptyName(self.id));
        }
        if self.price.is_zero() || self.price > MAX_ITEM_PRICE {
            return Err(CatalogueError::InvalidPrice(self.id));
        }
        Ok(())
    }

    fn matches(&self, filter: &TagFilter) -> bool {
        (!filter.spicy || self.spicy)
            && (!filter.vegan || self.vegan)
            && (!filter.popular || self.popular)
    }
}

/// Feature-tag filter for menu browsing. Every flag that is set must also
/// be set on the item; unset flags do not constrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagFilter {
    pub spicy: bool,
    pub vegan: bool,
    pub popular: bool,
}

/// The full, validated menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalogue {
    items: Vec<CatalogueItem>,
}

impl Catalogue {
    /// Build a catalogue from items, validating each and rejecting
    /// duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogueError`] found, in item order.
    pub fn new(items: Vec<CatalogueItem>) -> Result<Self, CatalogueError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                tracing::warn!(item_id = %item.id, "duplicate catalogue item");
                return Err(CatalogueError::DuplicateId(item.id));
            }
            item.validate().inspect_err(|e| {
                tracing::warn!(item_id = %item.id, error = %e, "invalid catalogue item");
            })?;
        }
        Ok(Self { items })
    }

    /// Parse a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Parse`] for malformed JSON, or a validation
    /// error from [`Catalogue::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let items: Vec<CatalogueItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// Read and parse a JSON catalogue file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Io`] if the file cannot be read, otherwise
    /// as [`Catalogue::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalogue = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            items = catalogue.len(),
            "catalogue loaded"
        );
        Ok(catalogue)
    }

    pub fn get(&self, id: ItemId) -> Option<&CatalogueItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items in menu order.
    pub fn items(&self) -> &[CatalogueItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CatalogueItem> {
        self.items.iter().filter(move |item| item.category == category)
    }

    pub fn filter(&self, filter: TagFilter) -> impl Iterator<Item = &CatalogueItem> {
        self.items.iter().filter(move |item| item.matches(&filter))
    }

    /// Items tagged popular, for the front-page highlights.
    pub fn popular(&self) -> impl Iterator<Item = &CatalogueItem> {
        self.filter(TagFilter {
            popular: true,
            ..TagFilter::default()
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::pizza;
    use super::*;

    const MENU: &str = r#"[
        {"id": 1, "name": "Margherita", "price": 7900, "popular": true, "vegan": true},
        {"id": 2, "name": "Diavola", "description": "Salami, chili", "price": 9900,
         "spicy": true, "popular": true},
        {"id": 3, "name": "Caesar", "price": 8900, "category": "salad"},
        {"id": 4, "name": "Lemonade", "price": 2900, "category": "drink", "vegan": true}
    ]"#;

    #[test]
    fn parses_menu_with_defaults() {
        let catalogue = Catalogue::from_json(MENU).unwrap();
        assert_eq!(catalogue.len(), 4);

        let margherita = catalogue.get(ItemId(1)).unwrap();
        assert_eq!(margherita.category, Category::Pizza);
        assert_eq!(margherita.description, "");
        assert!(!margherita.spicy);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let catalogue = Catalogue::from_json(MENU).unwrap();
        assert!(catalogue.get(ItemId(99)).is_none());
    }

    #[test]
    fn by_category_keeps_menu_order() {
        let catalogue = Catalogue::from_json(MENU).unwrap();
        let pizzas: Vec<_> = catalogue
            .by_category(Category::Pizza)
            .map(|i| i.id)
            .collect();
        assert_eq!(pizzas, vec![ItemId(1), ItemId(2)]);
    }

    #[test]
    fn tag_filter_requires_every_set_flag() {
        let catalogue = Catalogue::from_json(MENU).unwrap();
        let vegan_popular: Vec<_> = catalogue
            .filter(TagFilter {
                vegan: true,
                popular: true,
                ..TagFilter::default()
            })
            .map(|i| i.id)
            .collect();
        assert_eq!(vegan_popular, vec![ItemId(1)]);

        let all = catalogue.filter(TagFilter::default()).count();
        assert_eq!(all, 4);
    }

    #[test]
    fn popular_lists_tagged_items() {
        let catalogue = Catalogue::from_json(MENU).unwrap();
        assert_eq!(catalogue.popular().count(), 2);
    }

    #[test]
    fn price_for_applies_size_multiplier() {
        let item = pizza(1, 79);
        assert_eq!(item.price_for(Size::Small), Money::from_kronor(79));
        assert_eq!(item.price_for(Size::Medium), Money::from_ore(9_085));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalogue::new(vec![pizza(1, 79), pizza(1, 89)]).unwrap_err();
        assert!(matches!(err, CatalogueError::DuplicateId(ItemId(1))));
    }

    #[test]
    fn rejects_empty_name() {
        let mut item = pizza(5, 79);
        item.name = "  ".into();
        let err = Catalogue::new(vec![item]).unwrap_err();
        assert!(matches!(err, CatalogueError::EmptyName(ItemId(5))));
    }

    #[test]
    fn rejects_zero_price() {
        let mut item = pizza(6, 79);
        item.price = Money::ZERO;
        let err = Catalogue::new(vec![item]).unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidPrice(ItemId(6))));
    }

    #[test]
    fn rejects_price_above_ceiling() {
        let json = format!(r#"[{{"id": 7, "name": "Gold Leaf", "price": {}}}]"#, u64::MAX);
        let err = Catalogue::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidPrice(ItemId(7))));

        let mut item = pizza(8, 79);
        item.price = MAX_ITEM_PRICE;
        assert!(item.validate().is_ok());
        item.price = MAX_ITEM_PRICE + Money::from_ore(1);
        assert!(matches!(
            item.validate(),
            Err(CatalogueError::InvalidPrice(ItemId(8)))
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Catalogue::from_json("{\"id\": 1}").unwrap_err();
        assert!(matches!(err, CatalogueError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("menu.json");
        std::fs::write(&path, MENU).unwrap();

        let catalogue = Catalogue::load(&path).unwrap();
        assert_eq!(catalogue.len(), 4);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Catalogue::load(tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CatalogueError::Io(_)));
    }
}
