//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::reports::gstr1::Gstr1Report;
use crate::reports::gstr3b::Gstr3bReport;
use crate::tax::gst::GstRates;
use crate::types::*;

/// Storage abstraction for sales transactions and GSTR-3B snapshots
///
/// This trait allows the retail core to work with any storage backend
/// (PostgreSQL, MongoDB, SQLite, in-memory, etc.) by implementing these
/// methods. Date-range queries are inclusive on both ends and match on the
/// transaction's creation date.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a new sales transaction
    async fn save_transaction(&mut self, transaction: &SalesTransaction) -> RetailResult<()>;

    /// Get a transaction by invoice number
    async fn get_transaction(&self, invoice_no: &str) -> RetailResult<Option<SalesTransaction>>;

    /// List transactions created within an inclusive date range
    async fn get_transactions_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RetailResult<Vec<SalesTransaction>>;

    /// Persist a GSTR-3B report snapshot
    async fn save_gstr3b_report(&mut self, report: &Gstr3bReport) -> RetailResult<()>;
}

/// Storage abstraction for the product catalog and GSTR-1 snapshots
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new product
    async fn save_product(&mut self, product: &InventoryProduct) -> RetailResult<()>;

    /// Get a product by ID
    async fn get_product(&self, product_id: &str) -> RetailResult<Option<InventoryProduct>>;

    /// List all products
    async fn list_products(&self) -> RetailResult<Vec<InventoryProduct>>;

    /// List products created within an inclusive date range
    async fn get_products_created_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RetailResult<Vec<InventoryProduct>>;

    /// Update an existing product
    async fn update_product(&mut self, product: &InventoryProduct) -> RetailResult<()>;

    /// Apply the inventory mutations of a completed sale
    ///
    /// Each delta's stock decrement, counter updates, and history append are
    /// one atomic step for that product; the whole batch is applied
    /// all-or-nothing where the backend supports it. A stock shortfall
    /// returns `InsufficientStock` and leaves every product unchanged.
    async fn apply_sale_effects(&mut self, deltas: &[InventoryDelta]) -> RetailResult<()>;

    /// Persist a GSTR-1 report snapshot
    async fn save_gstr1_report(&mut self, report: &Gstr1Report) -> RetailResult<()>;
}

/// Capability for resolving a product's GST rates
///
/// Rates may come from a transaction line item directly or be looked up from
/// the product catalog; this single capability covers the lookup side so the
/// resolution logic is not duplicated across consumers.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Resolve the GST rates for a product
    async fn resolve_rates(&self, product_id: &str) -> RetailResult<GstRates>;
}

/// Rate source backed by the product catalog
pub struct CatalogRateSource<'a, P: ProductStore> {
    store: &'a P,
}

impl<'a, P: ProductStore> CatalogRateSource<'a, P> {
    pub fn new(store: &'a P) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<'a, P: ProductStore> RateSource for CatalogRateSource<'a, P> {
    async fn resolve_rates(&self, product_id: &str) -> RetailResult<GstRates> {
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| RetailError::ProductNotFound(product_id.to_string()))?;
        Ok(product.rates)
    }
}

/// Trait for implementing custom product validation rules
pub trait ProductValidator: Send + Sync {
    /// Validate a product before saving
    fn validate_product(&self, product: &InventoryProduct) -> RetailResult<()>;
}

/// Default product validator with basic rules
pub struct DefaultProductValidator;

impl ProductValidator for DefaultProductValidator {
    fn validate_product(&self, product: &InventoryProduct) -> RetailResult<()> {
        if product.product_id.trim().is_empty() {
            return Err(RetailError::Validation(
                "Product ID cannot be empty".to_string(),
            ));
        }

        if product.sku.trim().is_empty() {
            return Err(RetailError::Validation(
                "Product SKU cannot be empty".to_string(),
            ));
        }

        if product.name.trim().is_empty() {
            return Err(RetailError::Validation(
                "Product name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
