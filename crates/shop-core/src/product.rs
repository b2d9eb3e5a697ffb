//! # Product Types
//!
//! Product catalog types for storefront-rs.
//! Products are loaded from `config/products.toml`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product categories shown on the storefront.
///
/// Anything the catalog file does not recognize deserializes to `Others`;
/// the set is closed on purpose so category filters cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Accessories,
    Kids,
    Grocery,
    Electronics,
    Others,
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Category::parse(&value).unwrap_or_default())
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Men => "men",
            Category::Women => "women",
            Category::Accessories => "accessories",
            Category::Kids => "kids",
            Category::Grocery => "grocery",
            Category::Electronics => "electronics",
            Category::Others => "others",
        }
    }

    /// Parse a query-string category filter. Unknown values yield `None`;
    /// an unrecognized filter behaves like a category with no products.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "men" => Some(Category::Men),
            "women" => Some(Category::Women),
            "accessories" => Some(Category::Accessories),
            "kids" => Some(Category::Kids),
            "grocery" => Some(Category::Grocery),
            "electronics" => Some(Category::Electronics),
            "others" => Some(Category::Others),
            _ => None,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Others
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (numeric id in string form, e.g. "7")
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Unit price in rupees, decimal-exact
    pub price: Decimal,

    /// Storefront category
    #[serde(default)]
    pub category: Category,

    /// Whether this product is available for purchase
    #[serde(default = "default_true")]
    pub active: bool,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a new product with the fields the storefront requires
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            category: Category::Others,
            active: true,
            image_url: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Get all active products
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    /// Get active products in one category
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> + '_ {
        self.active_products().filter(move |p| p.category == category)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
