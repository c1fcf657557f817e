//! # Data Stores
//!
//! Read-only access to the catalog and credential datasets.
//!
//! Both datasets are read wholesale on every call, so an external process that
//! atomically replaces the file is picked up by the next request without any
//! coordination here.
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │  CatalogStore (trait)    │      │  CredentialStore (trait) │
//! │  └── load_catalog()      │      │  └── load_users()        │
//! └──────────────────────────┘      └──────────────────────────┘
//!        ▲            ▲                   ▲            ▲
//!  JsonFileStore  InMemoryStore     JsonFileStore  InMemoryStore
//! ```

use crate::product::Catalog;
use crate::user::UserDirectory;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Failure reading a dataset
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load the latest committed catalog snapshot
    async fn load_catalog(&self) -> Result<Catalog, StoreError>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the full user directory
    async fn load_users(&self) -> Result<UserDirectory, StoreError>;
}

/// Type alias for a shared catalog store (dynamic dispatch)
pub type BoxedCatalogStore = Arc<dyn CatalogStore>;

/// Type alias for a shared credential store (dynamic dispatch)
pub type BoxedCredentialStore = Arc<dyn CredentialStore>;

/// Dataset backed by a file on disk, re-read on every load
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_toml(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false)
    }

    async fn read(&self) -> Result<String, StoreError> {
        debug!("Reading dataset {}", self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }

    fn parse_error(&self, message: impl ToString) -> StoreError {
        StoreError::Parse {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn load_catalog(&self) -> Result<Catalog, StoreError> {
        let content = self.read().await?;
        if self.is_toml() {
            Catalog::from_toml(&content).map_err(|e| self.parse_error(e))
        } else {
            Catalog::from_json(&content).map_err(|e| self.parse_error(e))
        }
    }
}

#[async_trait]
impl CredentialStore for JsonFileStore {
    async fn load_users(&self) -> Result<UserDirectory, StoreError> {
        let content = self.read().await?;
        UserDirectory::from_json(&content).map_err(|e| self.parse_error(e))
    }
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    catalog: Catalog,
}

impl InMemoryCatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn load_catalog(&self) -> Result<Catalog, StoreError> {
        Ok(self.catalog.clone())
    }
}

/// Fixed in-memory user directory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    users: UserDirectory,
}

impl InMemoryCredentialStore {
    pub fn new(users: UserDirectory) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load_users(&self) -> Result<UserDirectory, StoreError> {
        Ok(self.users.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "shop-core-{}-{}",
            uuid::Uuid::new_v4().simple(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_json_catalog_is_reread_on_each_load() {
        let path = temp_file(
            "tienda.json",
            r#"{"productos": [{"id": 1, "nombre": "A", "precio": 1.5, "stock": 1, "id_categoria": 1}]}"#,
        );
        let store = JsonFileStore::new(&path);
        assert_eq!(store.load_catalog().await.unwrap().products.len(), 1);

        std::fs::write(
            &path,
            r#"{"productos": [
                {"id": 1, "nombre": "A", "precio": 1.5, "stock": 1, "id_categoria": 1},
                {"id": 2, "nombre": "B", "precio": 2.5, "stock": 1, "id_categoria": 1}
            ]}"#,
        )
        .unwrap();
        assert_eq!(store.load_catalog().await.unwrap().products.len(), 2);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_toml_catalog_by_extension() {
        let path = temp_file(
            "tienda.toml",
            "[[productos]]\nid = 4\nnombre = \"D\"\nprecio = 3.0\nstock = 1\nid_categoria = 1\n",
        );
        let catalog = JsonFileStore::new(&path).load_catalog().await.unwrap();
        assert!(catalog.get(4).is_some());
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let store = JsonFileStore::new("/nonexistent/tienda.json");
        assert!(matches!(
            store.load_catalog().await,
            Err(StoreError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_catalog_without_products_is_parse_error() {
        let path = temp_file("broken.json", r#"{"categorias": []}"#);
        let result = JsonFileStore::new(&path).load_catalog().await;
        assert!(matches!(result, Err(StoreError::Parse { .. })));
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_in_memory_stores() {
        let store = InMemoryCatalogStore::new(
            Catalog::new().with_product(Product::new(1, "A", 1.0, 1, 1)),
        );
        assert!(store.load_catalog().await.unwrap().get(1).is_some());

        let users = InMemoryCredentialStore::default();
        assert!(users.load_users().await.unwrap().users.is_empty());
    }
}
