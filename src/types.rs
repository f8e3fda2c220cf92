//! Core types and data structures for the retail GST system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tax::gst::{round_money, GstRates, TaxBreakdown, TaxError};

/// Line item as submitted to a sale, before tax annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLineItem {
    /// Product being sold
    pub product_id: String,
    /// Product name at the time of sale
    pub name: String,
    /// HSN classification code for the product
    pub hsn_code: String,
    /// Units sold, must be at least 1
    pub quantity: u32,
    /// Pre-tax price per unit
    pub unit_price: BigDecimal,
    /// Per-unit GST rates, if already known; otherwise resolved from the catalog
    pub rates: Option<GstRates>,
}

impl DraftLineItem {
    pub fn new(
        product_id: String,
        name: String,
        hsn_code: String,
        quantity: u32,
        unit_price: BigDecimal,
    ) -> Self {
        Self {
            product_id,
            name,
            hsn_code,
            quantity,
            unit_price,
            rates: None,
        }
    }

    /// Set pre-known GST rates on the line
    pub fn with_rates(mut self, rates: GstRates) -> Self {
        self.rates = Some(rates);
        self
    }
}

/// Line item with its tax computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub hsn_code: String,
    pub quantity: u32,
    pub unit_price: BigDecimal,
    /// Pre-tax line value (quantity x unit price)
    pub taxable_value: BigDecimal,
    /// GST amounts for this line
    pub tax: TaxBreakdown,
    /// Taxable value plus all applicable tax
    pub line_total: BigDecimal,
}

/// Sale as submitted for recording, before tax annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDraft {
    /// Invoice number; generated when absent
    pub invoice_no: Option<String>,
    /// Line items in submission order
    pub items: Vec<DraftLineItem>,
    /// Whether the supply crosses state boundaries; applies to every line
    pub is_inter_state: bool,
    /// Invoice-level discount, clamped to be non-negative
    pub discount: BigDecimal,
    pub customer_name: Option<String>,
    pub payment_mode: Option<String>,
}

impl SaleDraft {
    pub fn new(items: Vec<DraftLineItem>, is_inter_state: bool) -> Self {
        Self {
            invoice_no: None,
            items,
            is_inter_state,
            discount: BigDecimal::from(0),
            customer_name: None,
            payment_mode: None,
        }
    }

    pub fn with_discount(mut self, discount: BigDecimal) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_invoice_no(mut self, invoice_no: String) -> Self {
        self.invoice_no = Some(invoice_no);
        self
    }
}

/// A recorded point-of-sale transaction with computed tax aggregates
///
/// Aggregates are derived from the line items and are never independently
/// authoritative; [`SalesTransaction::recompute_totals`] re-derives them and is
/// called before the transaction is persisted. Immutable once computed, apart
/// from the inventory side effect of saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTransaction {
    /// Unique invoice number
    pub invoice_no: String,
    /// Line items in submission order
    pub items: Vec<LineItem>,
    /// Inter-state flag applying uniformly to all items
    pub is_inter_state: bool,
    /// Sum of line taxable values
    pub subtotal: BigDecimal,
    pub total_cgst: BigDecimal,
    pub total_sgst: BigDecimal,
    pub total_igst: BigDecimal,
    /// total_cgst + total_sgst + total_igst
    pub total_tax: BigDecimal,
    /// Invoice-level discount applied to the grand total
    pub discount: BigDecimal,
    /// subtotal + total_tax - discount
    pub grand_total: BigDecimal,
    pub customer_name: Option<String>,
    pub payment_mode: Option<String>,
    /// When the transaction was created
    pub created_at: NaiveDateTime,
}

impl SalesTransaction {
    /// Re-derive every aggregate from the current line items
    ///
    /// Summation runs at full precision in line order; rounding to currency
    /// precision happens once, on the aggregates.
    pub fn recompute_totals(&mut self) {
        let zero = BigDecimal::from(0);
        if self.discount < zero {
            self.discount = zero;
        }

        let subtotal: BigDecimal = self.items.iter().map(|item| &item.taxable_value).sum();
        let total_cgst: BigDecimal = self.items.iter().map(|item| &item.tax.cgst_amount).sum();
        let total_sgst: BigDecimal = self.items.iter().map(|item| &item.tax.sgst_amount).sum();
        let total_igst: BigDecimal = self.items.iter().map(|item| &item.tax.igst_amount).sum();
        let total_tax = &total_cgst + &total_sgst + &total_igst;
        let grand_total = &subtotal + &total_tax - &self.discount;

        self.subtotal = round_money(&subtotal);
        self.total_cgst = round_money(&total_cgst);
        self.total_sgst = round_money(&total_sgst);
        self.total_igst = round_money(&total_igst);
        self.total_tax = round_money(&total_tax);
        self.grand_total = round_money(&grand_total);
    }

    /// Total units across all line items
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| item.quantity as u64).sum()
    }
}

/// Generate an invoice number for drafts that did not supply one
pub fn generate_invoice_no() -> String {
    format!("INV-{}", Uuid::new_v4().simple())
}

/// Cumulative tax collected for a product, by component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCollected {
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
}

impl Default for TaxCollected {
    fn default() -> Self {
        Self {
            cgst: BigDecimal::from(0),
            sgst: BigDecimal::from(0),
            igst: BigDecimal::from(0),
        }
    }
}

/// One entry in a product's sales history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date: NaiveDateTime,
    pub invoice_no: String,
    pub quantity: u32,
    pub unit_price: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
}

/// Cumulative sales counters for a product
///
/// Mutated only as a side effect of a completed sales transaction; the
/// history is append-only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesData {
    pub total_sold: u64,
    pub total_revenue: BigDecimal,
    pub total_tax_collected: TaxCollected,
    pub sales_history: Vec<SaleRecord>,
}

/// Inventory mutation produced by one sale line item
///
/// Computed purely by the sales annotator and applied by the product store,
/// so the tax computation stays side-effect free and the stock mutation is
/// separately testable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDelta {
    pub product_id: String,
    /// Units to decrement from stock
    pub quantity: u32,
    /// Revenue to add to the product's cumulative counters
    pub taxable_value: BigDecimal,
    /// History entry to append, carrying the per-line tax amounts
    pub record: SaleRecord,
}

/// A fully annotated sale plus the inventory mutations it implies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEffects {
    pub transaction: SalesTransaction,
    pub deltas: Vec<InventoryDelta>,
}

/// Product record in the inventory catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryProduct {
    /// Unique product identifier
    pub product_id: String,
    /// Unique stock-keeping unit
    pub sku: String,
    pub name: String,
    /// HSN classification code
    pub hsn_code: String,
    /// Maximum retail price per unit
    pub mrp: BigDecimal,
    /// Purchase cost per unit
    pub cost_price: BigDecimal,
    /// GST rates applying to this product
    pub rates: GstRates,
    /// Whether supplies of this product are inter-state
    pub is_inter_state: bool,
    /// Units currently in stock, never negative
    pub quantity: u32,
    /// Stock level at which the product should be reordered
    pub reorder_level: u32,
    /// Unit quantity code for HSN reporting (e.g. "NOS", "KGS")
    pub uqc: String,
    pub supplier_name: Option<String>,
    /// Supplier's GST registration; absent for unregistered suppliers
    pub supplier_gstin: Option<String>,
    /// Inbound invoice number from the supplier
    pub invoice_no: Option<String>,
    /// Inbound invoice date from the supplier
    pub invoice_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    /// Cumulative sales counters, mutated only by completed sales
    pub sales_data: SalesData,
}

impl InventoryProduct {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        product_id: String,
        sku: String,
        name: String,
        hsn_code: String,
        mrp: BigDecimal,
        cost_price: BigDecimal,
        rates: GstRates,
        is_inter_state: bool,
    ) -> Self {
        Self {
            product_id,
            sku,
            name,
            hsn_code,
            mrp,
            cost_price,
            rates,
            is_inter_state,
            quantity: 0,
            reorder_level: 0,
            uqc: "NOS".to_string(),
            supplier_name: None,
            supplier_gstin: None,
            invoice_no: None,
            invoice_date: None,
            created_at: chrono::Utc::now().naive_utc(),
            sales_data: SalesData::default(),
        }
    }

    /// Margin between retail price and purchase cost
    pub fn profit_margin(&self) -> BigDecimal {
        &self.mrp - &self.cost_price
    }

    /// Combined GST rate across all components
    pub fn total_gst_rate(&self) -> BigDecimal {
        self.rates.total_rate()
    }

    /// Label for which tax components apply to this product
    pub fn tax_type(&self) -> &'static str {
        if self.is_inter_state {
            "IGST"
        } else {
            "CGST+SGST"
        }
    }

    /// Whether stock has fallen to or below the reorder level
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Whether the supplier is GST-registered
    pub fn has_registered_supplier(&self) -> bool {
        self.supplier_gstin
            .as_deref()
            .is_some_and(|gstin| !gstin.trim().is_empty())
    }

    /// Apply one sale delta: decrement stock and update cumulative counters
    ///
    /// The stock check and the mutation happen in one step, so a shortfall
    /// leaves the product untouched. Callers applying several deltas must
    /// verify all of them first to keep the whole sale all-or-nothing.
    pub fn apply_sale(&mut self, delta: &InventoryDelta) -> RetailResult<()> {
        if self.quantity < delta.quantity {
            return Err(RetailError::InsufficientStock {
                product_id: self.product_id.clone(),
                sku: self.sku.clone(),
                available: self.quantity,
                requested: delta.quantity,
            });
        }

        self.quantity -= delta.quantity;
        self.sales_data.total_sold += delta.quantity as u64;
        self.sales_data.total_revenue += &delta.taxable_value;
        self.sales_data.total_tax_collected.cgst += &delta.record.cgst_amount;
        self.sales_data.total_tax_collected.sgst += &delta.record.sgst_amount;
        self.sales_data.total_tax_collected.igst += &delta.record.igst_amount;
        self.sales_data.sales_history.push(delta.record.clone());

        Ok(())
    }
}

/// Errors that can occur in the retail core
#[derive(Debug, thiserror::Error)]
pub enum RetailError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        sku: String,
        available: u32,
        requested: u32,
    },
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("No data found: {0}")]
    NoDataFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Tax(#[from] TaxError),
}

/// Result type for retail core operations
pub type RetailResult<T> = Result<T, RetailError>;
