//! Catalog loader and filtering.
//!
//! The catalog holds the canonical product list fetched from the Product
//! Store and a filtered view derived from it. The view is recomputed from
//! the full list on every filter change; nothing is cached beyond the one
//! in-memory copy.

use secrecy::SecretString;
use shopfront_core::{CartEntry, Product, ProductId};
use tracing::instrument;

use crate::api::ProductStoreClient;
use crate::error::{Result, StorefrontError};
use crate::storage::{LocalStorage, keys};

/// Filter value that resets the view to the full list.
pub const ALL: &str = "all";

/// Feature tags offered as quick filters.
pub const FEATURE_TAGS: &[&str] = &["新品", "熱銷", "期間限定", "折扣", "限量"];

/// Category tags offered as quick filters.
pub const CATEGORY_TAGS: &[&str] = &[
    "服飾",
    "飾品配件",
    "化妝品保養品",
    "電子產品",
    "玩具",
    "食品",
    "健身用品",
];

/// Current filter over the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterState {
    #[default]
    All,
    /// Case-insensitive substring of the product name.
    Search(String),
    /// Case-insensitive exact tag.
    Tag(String),
}

impl FilterState {
    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Search(needle) => product.name_contains(needle),
            Self::Tag(tag) => product.has_tag(tag),
        }
    }
}

/// Progress of the last list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Canonical product list plus the filtered view.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    /// Indices into `products`, in catalog order.
    visible: Vec<usize>,
    filter: FilterState,
    state: LoadState,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the product list and replace both the list and the view.
    ///
    /// On failure the previous list stays in place and the load state
    /// records the error.
    ///
    /// # Errors
    ///
    /// Returns the Product Store error.
    #[instrument(skip_all)]
    pub async fn load(
        &mut self,
        client: &ProductStoreClient,
        token: Option<&SecretString>,
    ) -> Result<usize> {
        self.state = LoadState::Loading;
        match client.list_products(token).await {
            Ok(products) => {
                self.replace(products);
                tracing::info!(count = self.products.len(), "Catalog loaded");
                Ok(self.products.len())
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
                Err(StorefrontError::Api(e))
            }
        }
    }

    /// Install `products` as the canonical list and show all of them.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
        self.filter = FilterState::All;
        self.state = LoadState::Ready;
        self.recompute();
    }

    /// Show products whose name contains `text` (case-insensitive).
    pub fn search(&mut self, text: &str) {
        self.filter = FilterState::Search(text.to_owned());
        self.recompute();
    }

    /// Show products carrying `tag`; exactly [`ALL`] shows everything.
    pub fn filter_tag(&mut self, tag: &str) {
        self.filter = if tag == ALL {
            FilterState::All
        } else {
            FilterState::Tag(tag.to_owned())
        };
        self.recompute();
    }

    /// The filtered view, in catalog order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Product> {
        self.visible
            .iter()
            .filter_map(|&i| self.products.get(i))
            .collect()
    }

    /// The full canonical list.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Hand a product to the detail view through local storage.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or a storage error.
    pub fn open_detail(&self, id: &ProductId, storage: &mut LocalStorage) -> Result<CartEntry> {
        let product = self
            .find(id)
            .ok_or_else(|| StorefrontError::NotFound(format!("product {id}")))?;
        let snapshot = CartEntry::from_product(product);
        storage.set_json(keys::PRODUCT_DETAIL, &snapshot)?;
        Ok(snapshot)
    }

    /// The product last handed to the detail view, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the stored value is unreadable.
    pub fn detail(storage: &LocalStorage) -> Result<Option<CartEntry>> {
        Ok(storage.get_json(keys::PRODUCT_DETAIL)?)
    }

    fn recompute(&mut self) {
        let filter = &self.filter;
        self.visible = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| filter.matches(p))
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::Price;

    use super::*;

    fn product(id: &str, name: &str, tags: &[&str]) -> Product {
        Product {
            id: ProductId::from_store(id),
            name: name.to_owned(),
            price: Price::parse("10").unwrap(),
            stock: 1,
            image: String::new(),
            description: String::new(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            launched_at: String::new(),
        }
    }

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.visible().iter().map(|p| p.name.as_str()).collect()
    }

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.replace(vec![
            product("1", "Red Shirt", &["服飾", "新品"]),
            product("2", "Blue Hat", &["飾品配件"]),
            product("3", "Green Shirt", &["服飾", "折扣"]),
        ]);
        catalog
    }

    #[test]
    fn test_replace_shows_everything() {
        let catalog = sample();
        assert_eq!(catalog.load_state(), &LoadState::Ready);
        assert_eq!(names(&catalog), vec!["Red Shirt", "Blue Hat", "Green Shirt"]);
    }

    #[test]
    fn test_search_is_case_insensitive_containment() {
        let mut catalog = Catalog::new();
        catalog.replace(vec![product("1", "Red Shirt", &[]), product("2", "Blue Hat", &[])]);
        catalog.search("shirt");
        assert_eq!(names(&catalog), vec!["Red Shirt"]);
    }

    #[test]
    fn test_filter_tag_exact_match() {
        let mut catalog = sample();
        catalog.filter_tag("新品");
        assert_eq!(names(&catalog), vec!["Red Shirt"]);

        // Substrings of a tag do not match
        catalog.filter_tag("服");
        assert!(catalog.visible().is_empty());
    }

    #[test]
    fn test_filter_tag_ignores_case() {
        let mut catalog = Catalog::new();
        catalog.replace(vec![product("1", "Jacket", &["Clothing"])]);
        catalog.filter_tag("clothing");
        assert_eq!(names(&catalog), vec!["Jacket"]);
    }

    #[test]
    fn test_all_resets_any_filter() {
        let mut catalog = sample();
        catalog.search("hat");
        catalog.filter_tag(ALL);
        assert_eq!(catalog.visible().len(), 3);
        assert_eq!(catalog.filter(), &FilterState::All);

        catalog.filter_tag("折扣");
        catalog.filter_tag("all");
        assert_eq!(catalog.visible().len(), 3);
    }

    #[test]
    fn test_uppercase_all_is_an_ordinary_tag() {
        let mut catalog = Catalog::new();
        catalog.replace(vec![
            product("1", "Poster", &["ALL"]),
            product("2", "Mug", &["kitchen"]),
        ]);
        catalog.filter_tag("ALL");
        assert_eq!(names(&catalog), vec!["Poster"]);
        assert_eq!(catalog.filter(), &FilterState::Tag("ALL".to_owned()));
    }

    #[test]
    fn test_search_keeps_surrounding_spaces() {
        let mut catalog = Catalog::new();
        catalog.replace(vec![product("1", "Red Shirt", &[]), product("2", "Hat", &[])]);
        catalog.search(" shirt");
        assert_eq!(names(&catalog), vec!["Red Shirt"]);
        catalog.search("shirt ");
        assert!(catalog.visible().is_empty());
    }

    #[test]
    fn test_filters_apply_to_full_list() {
        let mut catalog = sample();
        catalog.search("blue");
        // A tag filter is computed from the canonical list, not the search result
        catalog.filter_tag("服飾");
        assert_eq!(names(&catalog), vec!["Red Shirt", "Green Shirt"]);
    }

    #[test]
    fn test_find() {
        let catalog = sample();
        assert_eq!(catalog.find(&ProductId::from_store("2")).unwrap().name, "Blue Hat");
        assert!(catalog.find(&ProductId::from_store("9")).is_none());
    }

    #[test]
    fn test_detail_hand_off() {
        let catalog = sample();
        let mut storage = LocalStorage::in_memory();
        assert!(Catalog::detail(&storage).unwrap().is_none());

        let snapshot = catalog
            .open_detail(&ProductId::from_store("3"), &mut storage)
            .unwrap();
        assert_eq!(snapshot.title, "Green Shirt");
        assert_eq!(Catalog::detail(&storage).unwrap(), Some(snapshot));
    }

    #[test]
    fn test_detail_unknown_product() {
        let catalog = sample();
        let mut storage = LocalStorage::in_memory();
        let result = catalog.open_detail(&ProductId::from_store("nope"), &mut storage);
        assert!(matches!(result, Err(StorefrontError::NotFound(_))));
    }

    #[test]
    fn test_quick_filter_tags() {
        assert!(FEATURE_TAGS.contains(&"新品"));
        assert_eq!(CATEGORY_TAGS.len(), 7);
    }
}
