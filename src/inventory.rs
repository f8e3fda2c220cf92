//! Inventory catalog management

use tracing::info;

use crate::traits::{DefaultProductValidator, ProductStore, ProductValidator};
use crate::types::*;

/// Inventory manager for product catalog operations
///
/// Products are created and updated here; their cumulative `sales_data` is
/// deliberately out of reach — it is mutated only through the sale recording
/// path in [`crate::sales::manager`].
pub struct InventoryManager<P: ProductStore> {
    storage: P,
    validator: Box<dyn ProductValidator>,
}

impl<P: ProductStore> InventoryManager<P> {
    /// Create a new inventory manager
    pub fn new(storage: P) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultProductValidator),
        }
    }

    /// Create a new inventory manager with a custom validator
    pub fn with_validator(storage: P, validator: Box<dyn ProductValidator>) -> Self {
        Self { storage, validator }
    }

    /// Add a new product to the catalog
    pub async fn add_product(&mut self, product: InventoryProduct) -> RetailResult<InventoryProduct> {
        self.validator.validate_product(&product)?;

        if self
            .storage
            .get_product(&product.product_id)
            .await?
            .is_some()
        {
            return Err(RetailError::Validation(format!(
                "Product with ID '{}' already exists",
                product.product_id
            )));
        }

        self.storage.save_product(&product).await?;
        info!(product_id = %product.product_id, sku = %product.sku, "added product");
        Ok(product)
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: &str) -> RetailResult<Option<InventoryProduct>> {
        self.storage.get_product(product_id).await
    }

    /// Get a product by ID, returning an error if not found
    pub async fn get_product_required(&self, product_id: &str) -> RetailResult<InventoryProduct> {
        self.storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| RetailError::ProductNotFound(product_id.to_string()))
    }

    /// List all products
    pub async fn list_products(&self) -> RetailResult<Vec<InventoryProduct>> {
        self.storage.list_products().await
    }

    /// Products at or below their reorder level
    pub async fn low_stock_products(&self) -> RetailResult<Vec<InventoryProduct>> {
        let products = self.storage.list_products().await?;
        Ok(products
            .into_iter()
            .filter(|product| product.needs_reorder())
            .collect())
    }

    /// Update an existing product's catalog fields
    pub async fn update_product(&mut self, product: &InventoryProduct) -> RetailResult<()> {
        self.validator.validate_product(product)?;

        if self
            .storage
            .get_product(&product.product_id)
            .await?
            .is_none()
        {
            return Err(RetailError::ProductNotFound(product.product_id.clone()));
        }

        self.storage.update_product(product).await
    }
}
