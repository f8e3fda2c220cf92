//! Pure tax annotation of sales transactions
//!
//! Everything here is side-effect free: a draft goes in, an annotated
//! transaction and its implied inventory mutations come out as data. Applying
//! those mutations is the caller's job (see [`crate::sales::manager`]), which
//! keeps the tax computation testable on its own and the stock mutation
//! separately transactional.

use bigdecimal::BigDecimal;

use crate::tax::gst::{split_tax, GstRates};
use crate::types::*;

/// Annotate a sale draft with per-line tax and invoice-level aggregates
///
/// Line items are processed in submission order. Each line's taxable value is
/// `quantity * unit_price`; the tax split is decided by the draft's single
/// inter-state flag. Rates carried on a line win; otherwise `resolve` is
/// consulted with the line's product ID. An invoice number is generated when
/// the draft omits one.
pub fn annotate_sale<F>(draft: &SaleDraft, resolve: F) -> RetailResult<SalesTransaction>
where
    F: Fn(&str) -> Option<GstRates>,
{
    if draft.items.is_empty() {
        return Err(RetailError::InvalidInput(
            "sale must have at least one line item".to_string(),
        ));
    }

    let mut items = Vec::with_capacity(draft.items.len());
    for line in &draft.items {
        if line.quantity == 0 {
            return Err(RetailError::InvalidInput(format!(
                "quantity for product '{}' must be at least 1",
                line.product_id
            )));
        }
        if line.unit_price < BigDecimal::from(0) {
            return Err(RetailError::InvalidInput(format!(
                "unit price for product '{}' cannot be negative",
                line.product_id
            )));
        }

        let rates = match &line.rates {
            Some(rates) => rates.clone(),
            None => resolve(&line.product_id).ok_or_else(|| {
                RetailError::ProductNotFound(line.product_id.clone())
            })?,
        };

        let taxable_value = BigDecimal::from(line.quantity) * &line.unit_price;
        let tax = split_tax(taxable_value.clone(), draft.is_inter_state, &rates)?;
        let line_total = tax.total_with_tax();

        items.push(LineItem {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            hsn_code: line.hsn_code.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.clone(),
            taxable_value,
            tax,
            line_total,
        });
    }

    let mut transaction = SalesTransaction {
        invoice_no: draft
            .invoice_no
            .clone()
            .unwrap_or_else(generate_invoice_no),
        items,
        is_inter_state: draft.is_inter_state,
        subtotal: BigDecimal::from(0),
        total_cgst: BigDecimal::from(0),
        total_sgst: BigDecimal::from(0),
        total_igst: BigDecimal::from(0),
        total_tax: BigDecimal::from(0),
        discount: draft.discount.clone(),
        grand_total: BigDecimal::from(0),
        customer_name: draft.customer_name.clone(),
        payment_mode: draft.payment_mode.clone(),
        created_at: chrono::Utc::now().naive_utc(),
    };
    transaction.recompute_totals();

    Ok(transaction)
}

/// Annotate a sale and compute the inventory mutations it implies
///
/// Produces one [`InventoryDelta`] per line item, carrying exactly the stock
/// decrement, counter updates, and history entry the product store must
/// apply once the transaction is persisted.
pub fn compute_sale_effects<F>(draft: &SaleDraft, resolve: F) -> RetailResult<SaleEffects>
where
    F: Fn(&str) -> Option<GstRates>,
{
    let transaction = annotate_sale(draft, resolve)?;

    let deltas = transaction
        .items
        .iter()
        .map(|item| InventoryDelta {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            taxable_value: item.taxable_value.clone(),
            record: SaleRecord {
                date: transaction.created_at,
                invoice_no: transaction.invoice_no.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price.clone(),
                cgst_amount: item.tax.cgst_amount.clone(),
                sgst_amount: item.tax.sgst_amount.clone(),
                igst_amount: item.tax.igst_amount.clone(),
            },
        })
        .collect();

    Ok(SaleEffects {
        transaction,
        deltas,
    })
}
