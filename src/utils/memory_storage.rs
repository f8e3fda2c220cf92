//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::reports::gstr1::Gstr1Report;
use crate::reports::gstr3b::Gstr3bReport;
use crate::traits::*;
use crate::types::*;

/// In-memory store implementing both [`TransactionStore`] and [`ProductStore`]
///
/// Clones share the same underlying maps, so one store can be handed to a
/// sales manager and a report generator at the same time.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    products: Arc<RwLock<HashMap<String, InventoryProduct>>>,
    transactions: Arc<RwLock<HashMap<String, SalesTransaction>>>,
    gstr1_reports: Arc<RwLock<Vec<Gstr1Report>>>,
    gstr3b_reports: Arc<RwLock<Vec<Gstr3bReport>>>,
}

impl MemoryStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(HashMap::new())),
            gstr1_reports: Arc::new(RwLock::new(Vec::new())),
            gstr3b_reports: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.products.write().unwrap().clear();
        self.transactions.write().unwrap().clear();
        self.gstr1_reports.write().unwrap().clear();
        self.gstr3b_reports.write().unwrap().clear();
    }

    /// Products at or below their reorder level
    pub fn low_stock_products(&self) -> Vec<InventoryProduct> {
        self.products
            .read()
            .unwrap()
            .values()
            .filter(|product| product.needs_reorder())
            .cloned()
            .collect()
    }

    /// Persisted GSTR-1 snapshots, oldest first
    pub fn gstr1_reports(&self) -> Vec<Gstr1Report> {
        self.gstr1_reports.read().unwrap().clone()
    }

    /// Persisted GSTR-3B snapshots, oldest first
    pub fn gstr3b_reports(&self) -> Vec<Gstr3bReport> {
        self.gstr3b_reports.read().unwrap().clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn save_transaction(&mut self, transaction: &SalesTransaction) -> RetailResult<()> {
        let mut transactions = self.transactions.write().unwrap();
        if transactions.contains_key(&transaction.invoice_no) {
            return Err(RetailError::Validation(format!(
                "Transaction with invoice number '{}' already exists",
                transaction.invoice_no
            )));
        }
        transactions.insert(transaction.invoice_no.clone(), transaction.clone());
        Ok(())
    }

    async fn get_transaction(&self, invoice_no: &str) -> RetailResult<Option<SalesTransaction>> {
        Ok(self.transactions.read().unwrap().get(invoice_no).cloned())
    }

    async fn get_transactions_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RetailResult<Vec<SalesTransaction>> {
        let transactions = self.transactions.read().unwrap();
        let mut filtered: Vec<SalesTransaction> = transactions
            .values()
            .filter(|txn| {
                let date = txn.created_at.date();
                date >= start_date && date <= end_date
            })
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(filtered)
    }

    async fn save_gstr3b_report(&mut self, report: &Gstr3bReport) -> RetailResult<()> {
        self.gstr3b_reports.write().unwrap().push(report.clone());
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn save_product(&mut self, product: &InventoryProduct) -> RetailResult<()> {
        let mut products = self.products.write().unwrap();
        if products.contains_key(&product.product_id) {
            return Err(RetailError::Validation(format!(
                "Product with ID '{}' already exists",
                product.product_id
            )));
        }
        if products.values().any(|p| p.sku == product.sku) {
            return Err(RetailError::Validation(format!(
                "Product with SKU '{}' already exists",
                product.sku
            )));
        }
        products.insert(product.product_id.clone(), product.clone());
        Ok(())
    }

    async fn get_product(&self, product_id: &str) -> RetailResult<Option<InventoryProduct>> {
        Ok(self.products.read().unwrap().get(product_id).cloned())
    }

    async fn list_products(&self) -> RetailResult<Vec<InventoryProduct>> {
        Ok(self.products.read().unwrap().values().cloned().collect())
    }

    async fn get_products_created_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RetailResult<Vec<InventoryProduct>> {
        let products = self.products.read().unwrap();
        let mut filtered: Vec<InventoryProduct> = products
            .values()
            .filter(|product| {
                let date = product.created_at.date();
                date >= start_date && date <= end_date
            })
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(filtered)
    }

    async fn update_product(&mut self, product: &InventoryProduct) -> RetailResult<()> {
        let mut products = self.products.write().unwrap();
        if !products.contains_key(&product.product_id) {
            return Err(RetailError::ProductNotFound(product.product_id.clone()));
        }
        products.insert(product.product_id.clone(), product.clone());
        Ok(())
    }

    async fn apply_sale_effects(&mut self, deltas: &[InventoryDelta]) -> RetailResult<()> {
        // One write lock for the whole batch: verify everything first, then
        // apply, so a shortfall on any line leaves every product unchanged.
        let mut products = self.products.write().unwrap();

        for delta in deltas {
            let product = products
                .get(&delta.product_id)
                .ok_or_else(|| RetailError::ProductNotFound(delta.product_id.clone()))?;
            if product.quantity < delta.quantity {
                return Err(RetailError::InsufficientStock {
                    product_id: product.product_id.clone(),
                    sku: product.sku.clone(),
                    available: product.quantity,
                    requested: delta.quantity,
                });
            }
        }

        for delta in deltas {
            let product = products
                .get_mut(&delta.product_id)
                .expect("verified above while holding the lock");
            product.apply_sale(delta)?;
        }

        Ok(())
    }

    async fn save_gstr1_report(&mut self, report: &Gstr1Report) -> RetailResult<()> {
        self.gstr1_reports.write().unwrap().push(report.clone());
        Ok(())
    }
}
