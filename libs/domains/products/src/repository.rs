use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductInput};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product
    async fn create(&self, input: ProductInput) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// All products, ascending id
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Products whose id is in `ids`; missing ids are skipped
    async fn get_by_ids(&self, ids: Vec<i64>) -> ProductResult<Vec<Product>>;

    /// Replace every mutable field
    async fn update(&self, id: i64, input: ProductInput) -> ProductResult<Product>;

    /// Delete a product; `false` if it did not exist
    async fn delete(&self, id: i64) -> ProductResult<bool>;
}

/// Products keyed by id; iteration is in ascending id order.
pub type ProductTable = BTreeMap<i64, Product>;

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    products: ProductTable,
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to the product table.
    ///
    /// The write lock is held for the whole call, so a caller can make a
    /// multi-product change (such as reserving stock for an order) that no
    /// other request observes half-done.
    pub async fn with_products_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut ProductTable) -> T,
    {
        let mut store = self.store.write().await;
        f(&mut store.products)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        store.next_id += 1;

        let now = chrono::Utc::now();
        let product = Product {
            id: store.next_id,
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };
        store.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(store.products.values().cloned().collect())
    }

    async fn get_by_ids(&self, ids: Vec<i64>) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| store.products.get(id).cloned())
            .collect())
    }

    async fn update(&self, id: i64, input: ProductInput) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        let product = store
            .products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;

        product.name = input.name;
        product.description = input.description;
        product.price = input.price;
        product.stock = input.stock;
        product.updated_at = chrono::Utc::now();

        tracing::info!(product_id = id, "Updated product");
        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> ProductResult<bool> {
        let mut store = self.store.write().await;
        let removed = store.products.remove(&id).is_some();
        if removed {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(removed)
    }
}
