//! # Catalog Types
//!
//! Products and categories as stored in `tienda.json`. The wire names are the
//! Spanish keys the storefront reads; the Rust names are their translations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "descripcion", default)]
    pub description: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
        }
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable product identifier
    pub id: i64,

    /// Display name
    #[serde(rename = "nombre")]
    pub name: String,

    /// Long description
    #[serde(rename = "descripcion", default)]
    pub description: String,

    /// Unit price, two decimals
    #[serde(rename = "precio")]
    pub price: f64,

    /// Units available
    #[serde(default)]
    pub stock: i64,

    /// Owning category; may point at a category that no longer exists
    #[serde(rename = "id_categoria")]
    pub category_id: i64,

    /// Shown on the storefront landing page
    #[serde(rename = "destacado", default)]
    pub featured: bool,

    /// Free-form technical specifications
    #[serde(
        rename = "especificaciones",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub specs: Option<BTreeMap<String, String>>,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, price: f64, stock: i64, category_id: i64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            stock,
            category_id,
            featured: false,
            specs: None,
        }
    }

    /// Builder: mark as featured
    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }
}

/// Read-only snapshot of the product/category dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "categorias", default)]
    pub categories: Vec<Category>,

    #[serde(rename = "productos")]
    pub products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a category
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Builder: add a product
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    /// Find a product by ID
    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Find a category by ID
    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Category of a product; `None` means uncategorized (dangling `id_categoria`)
    pub fn category_of(&self, product: &Product) -> Option<&Category> {
        self.category(product.category_id)
    }

    pub fn products_in_category(&self, category_id: i64) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(move |p| p.category_id == category_id)
    }

    pub fn featured_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    /// Parse from the JSON layout of `tienda.json`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse from an equivalent TOML document
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new()
            .with_category(Category::new(1, "Portátiles"))
            .with_product(Product::new(1, "Portátil Pro", 2299.99, 5, 1).featured())
            .with_product(Product::new(2, "Ratón", 19.99, 0, 1))
            .with_product(Product::new(3, "Huérfano", 5.0, 3, 42))
    }

    #[test]
    fn test_lookup() {
        let catalog = sample();
        assert_eq!(catalog.get(2).map(|p| p.name.as_str()), Some("Ratón"));
        assert!(catalog.get(99).is_none());
        assert_eq!(catalog.category(1).map(|c| c.name.as_str()), Some("Portátiles"));
    }

    #[test]
    fn test_dangling_category_is_uncategorized() {
        let catalog = sample();
        let orphan = catalog.get(3).unwrap();
        assert!(catalog.category_of(orphan).is_none());
    }

    #[test]
    fn test_filters() {
        let catalog = sample();
        assert_eq!(catalog.products_in_category(1).count(), 2);
        assert_eq!(catalog.products_in_category(42).count(), 1);
        assert_eq!(catalog.featured_products().count(), 1);
    }

    #[test]
    fn test_parse_spanish_json() {
        let json = r#"{
            "categorias": [{"id": 1, "nombre": "Audio", "descripcion": "Sonido"}],
            "productos": [{
                "id": 7, "nombre": "Cascos", "descripcion": "Inalámbricos",
                "precio": 59.9, "stock": 4, "id_categoria": 1, "destacado": true,
                "especificaciones": {"bateria": "30h"}
            }]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let product = catalog.get(7).unwrap();
        assert_eq!(product.price, 59.9);
        assert!(product.featured);
        assert_eq!(
            product.specs.as_ref().and_then(|s| s.get("bateria")).map(String::as_str),
            Some("30h")
        );

        let out = serde_json::to_value(&catalog).unwrap();
        assert_eq!(out["productos"][0]["id_categoria"], 1);
        assert_eq!(out["categorias"][0]["nombre"], "Audio");
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [[categorias]]
            id = 1
            nombre = "Audio"

            [[productos]]
            id = 1
            nombre = "Altavoz"
            precio = 25.5
            stock = 2
            id_categoria = 1
        "#;
        let catalog = Catalog::from_toml(toml_str).unwrap();
        assert_eq!(catalog.products.len(), 1);
        assert!(catalog.get(1).unwrap().specs.is_none());
    }
}
