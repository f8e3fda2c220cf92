//! Sale recording and the inventory stock ledger

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::sales::annotator::compute_sale_effects;
use crate::tax::gst::GstRates;
use crate::traits::{ProductStore, TransactionStore};
use crate::types::*;

/// Sales manager coordinating tax annotation, persistence, and stock updates
///
/// Both stores are owned; pass clones of a shared handle (the way
/// [`crate::utils::memory_storage::MemoryStore`] is used) when one backend
/// serves both roles.
pub struct SalesManager<P: ProductStore, T: TransactionStore> {
    products: P,
    transactions: T,
}

impl<P: ProductStore, T: TransactionStore> SalesManager<P, T> {
    pub fn new(products: P, transactions: T) -> Self {
        Self {
            products,
            transactions,
        }
    }

    /// Record a completed sale
    ///
    /// Looks up every referenced product, rejects the whole sale on a stock
    /// shortfall before anything is written, annotates the draft with tax,
    /// persists the transaction, and finally applies the inventory deltas
    /// through the product store's atomic path. No partial application: a
    /// failure at any step leaves stock and history untouched.
    pub async fn record_sale(&mut self, draft: &SaleDraft) -> RetailResult<SalesTransaction> {
        let mut catalog_rates: HashMap<String, GstRates> = HashMap::new();

        for line in &draft.items {
            let product = self
                .products
                .get_product(&line.product_id)
                .await?
                .ok_or_else(|| RetailError::ProductNotFound(line.product_id.clone()))?;

            if product.quantity < line.quantity {
                warn!(
                    product_id = %product.product_id,
                    available = product.quantity,
                    requested = line.quantity,
                    "sale rejected: insufficient stock"
                );
                return Err(RetailError::InsufficientStock {
                    product_id: product.product_id,
                    sku: product.sku,
                    available: product.quantity,
                    requested: line.quantity,
                });
            }

            catalog_rates.insert(product.product_id.clone(), product.rates);
        }

        let effects = compute_sale_effects(draft, |product_id| {
            catalog_rates.get(product_id).cloned()
        })?;
        debug!(
            invoice_no = %effects.transaction.invoice_no,
            lines = effects.transaction.items.len(),
            "computed sale effects"
        );

        self.transactions
            .save_transaction(&effects.transaction)
            .await?;
        self.products.apply_sale_effects(&effects.deltas).await?;

        info!(
            invoice_no = %effects.transaction.invoice_no,
            grand_total = %effects.transaction.grand_total,
            "recorded sale"
        );
        Ok(effects.transaction)
    }

    /// Get a transaction by invoice number
    pub async fn transaction(&self, invoice_no: &str) -> RetailResult<Option<SalesTransaction>> {
        self.transactions.get_transaction(invoice_no).await
    }

    /// Get a transaction by invoice number, returning an error if not found
    pub async fn transaction_required(&self, invoice_no: &str) -> RetailResult<SalesTransaction> {
        self.transactions
            .get_transaction(invoice_no)
            .await?
            .ok_or_else(|| RetailError::TransactionNotFound(invoice_no.to_string()))
    }

    /// List transactions created within an inclusive date range
    pub async fn transactions_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RetailResult<Vec<SalesTransaction>> {
        self.transactions
            .get_transactions_between(start_date, end_date)
            .await
    }

    /// Get a product by ID, returning an error if not found
    pub async fn product_required(&self, product_id: &str) -> RetailResult<InventoryProduct> {
        self.products
            .get_product(product_id)
            .await?
            .ok_or_else(|| RetailError::ProductNotFound(product_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::gst::GstRates;
    use crate::utils::memory_storage::MemoryStore;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    async fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        let mut product = InventoryProduct::new(
            "p1".to_string(),
            "SPK-01".to_string(),
            "Speaker".to_string(),
            "8519".to_string(),
            dec("2499"),
            dec("1800"),
            GstRates::intra_state(dec("0.18")),
            false,
        );
        product.quantity = 10;
        store.save_product(&product).await.unwrap();
        store
    }

    fn speaker_draft(quantity: u32) -> SaleDraft {
        SaleDraft::new(
            vec![DraftLineItem::new(
                "p1".to_string(),
                "Speaker".to_string(),
                "8519".to_string(),
                quantity,
                dec("2499"),
            )],
            false,
        )
    }

    #[tokio::test]
    async fn test_record_sale_persists_and_decrements() {
        let store = seeded_store().await;
        let mut manager = SalesManager::new(store.clone(), store.clone());

        let txn = manager.record_sale(&speaker_draft(2)).await.unwrap();
        assert_eq!(txn.subtotal, dec("4998"));
        assert_eq!(txn.total_cgst, dec("449.82"));

        let saved = manager.transaction(&txn.invoice_no).await.unwrap();
        assert!(saved.is_some());

        let product = store.get_product("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 8);
        assert_eq!(product.sales_data.total_sold, 2);
        assert_eq!(product.sales_data.sales_history.len(), 1);
    }

    #[tokio::test]
    async fn test_record_sale_rejects_unknown_product() {
        let store = seeded_store().await;
        let mut manager = SalesManager::new(store.clone(), store);

        let draft = SaleDraft::new(
            vec![DraftLineItem::new(
                "missing".to_string(),
                "Ghost".to_string(),
                "0000".to_string(),
                1,
                dec("10"),
            )],
            false,
        );
        let err = manager.record_sale(&draft).await.unwrap_err();
        assert!(matches!(err, RetailError::ProductNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_record_sale_rejects_shortfall_with_no_partial_update() {
        let store = seeded_store().await;
        let mut manager = SalesManager::new(store.clone(), store.clone());

        let err = manager.record_sale(&speaker_draft(11)).await.unwrap_err();
        assert!(matches!(
            err,
            RetailError::InsufficientStock {
                available: 10,
                requested: 11,
                ..
            }
        ));

        let product = store.get_product("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 10);
        assert_eq!(product.sales_data.total_sold, 0);
    }

    #[tokio::test]
    async fn test_stock_conservation_across_sales() {
        let store = seeded_store().await;
        let mut manager = SalesManager::new(store.clone(), store.clone());

        for quantity in [2u32, 3, 1] {
            manager.record_sale(&speaker_draft(quantity)).await.unwrap();
        }

        let product = store.get_product("p1").await.unwrap().unwrap();
        assert_eq!(product.quantity, 4); // 10 - 2 - 3 - 1
        assert_eq!(product.sales_data.total_sold, 6);
        assert_eq!(product.sales_data.sales_history.len(), 3);
    }
}
