//! GSTR-3B summary return aggregation
//!
//! Aggregates recorded sales transactions for a date range into the monthly
//! summary figures: grand totals, the flattened list of products sold, and an
//! HSN-wise summary.

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::tax::gst::round_money;
use crate::traits::TransactionStore;
use crate::types::{RetailError, RetailResult, SalesTransaction};

/// One flattened line item from a sold transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSold {
    pub product_id: String,
    pub name: String,
    pub hsn_code: String,
    pub quantity: u32,
    pub taxable_value: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
}

/// HSN-wise accumulation of sold line items
///
/// `total_value` accumulates taxable (pre-tax) value, not invoice value;
/// the field name follows the filed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsnSummaryRow {
    pub hsn_code: String,
    pub total_quantity: u64,
    pub total_value: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
}

/// Point-in-time GSTR-3B aggregation snapshot
///
/// Immutable once generated; regenerating the same period produces a new
/// snapshot with its own `report_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr3bReport {
    pub report_id: String,
    /// Form identity, always "GSTR-3B"
    pub form: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_taxable_value: BigDecimal,
    pub total_cgst: BigDecimal,
    pub total_sgst: BigDecimal,
    pub total_igst: BigDecimal,
    pub products_sold: Vec<ProductSold>,
    pub hsn_summary: Vec<HsnSummaryRow>,
    pub transaction_count: usize,
    pub generated_at: NaiveDateTime,
}

#[derive(Default)]
struct HsnAccumulator {
    total_quantity: u64,
    total_value: BigDecimal,
    cgst_amount: BigDecimal,
    sgst_amount: BigDecimal,
    igst_amount: BigDecimal,
}

/// GSTR-3B report generator over a transaction store
pub struct Gstr3bGenerator<T: TransactionStore> {
    store: T,
}

impl<T: TransactionStore> Gstr3bGenerator<T> {
    pub fn new(store: T) -> Self {
        Self { store }
    }

    /// Generate and persist a GSTR-3B snapshot for an inclusive date range
    ///
    /// A period with zero transactions is refused with `NoDataFound` rather
    /// than producing an empty report: the caller must not mistake "no data"
    /// for "zero liability".
    pub async fn generate(
        &mut self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RetailResult<Gstr3bReport> {
        let transactions = self
            .store
            .get_transactions_between(start_date, end_date)
            .await?;

        if transactions.is_empty() {
            warn!(%start_date, %end_date, "GSTR-3B refused: no transactions in period");
            return Err(RetailError::NoDataFound(format!(
                "no sales transactions between {} and {}",
                start_date, end_date
            )));
        }

        let report = build_report(start_date, end_date, &transactions);
        self.store.save_gstr3b_report(&report).await?;

        info!(
            report_id = %report.report_id,
            transactions = report.transaction_count,
            hsn_buckets = report.hsn_summary.len(),
            "generated GSTR-3B report"
        );
        Ok(report)
    }
}

fn build_report(
    start_date: NaiveDate,
    end_date: NaiveDate,
    transactions: &[SalesTransaction],
) -> Gstr3bReport {
    let mut total_taxable_value = BigDecimal::from(0);
    let mut total_cgst = BigDecimal::from(0);
    let mut total_sgst = BigDecimal::from(0);
    let mut total_igst = BigDecimal::from(0);

    // Grand totals come from the transaction-level aggregates; the per-line
    // flattening below is the source for the HSN fold.
    for transaction in transactions {
        total_taxable_value += &transaction.subtotal;
        total_cgst += &transaction.total_cgst;
        total_sgst += &transaction.total_sgst;
        total_igst += &transaction.total_igst;
    }

    let products_sold: Vec<ProductSold> = transactions
        .iter()
        .flat_map(|transaction| transaction.items.iter())
        .map(|item| ProductSold {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            hsn_code: item.hsn_code.clone(),
            quantity: item.quantity,
            taxable_value: round_money(&item.taxable_value),
            cgst_amount: round_money(&item.tax.cgst_amount),
            sgst_amount: round_money(&item.tax.sgst_amount),
            igst_amount: round_money(&item.tax.igst_amount),
        })
        .collect();

    let buckets: BTreeMap<String, HsnAccumulator> = transactions
        .iter()
        .flat_map(|transaction| transaction.items.iter())
        .fold(BTreeMap::new(), |mut buckets, item| {
            let bucket = buckets.entry(item.hsn_code.clone()).or_default();
            bucket.total_quantity += item.quantity as u64;
            bucket.total_value += &item.taxable_value;
            bucket.cgst_amount += &item.tax.cgst_amount;
            bucket.sgst_amount += &item.tax.sgst_amount;
            bucket.igst_amount += &item.tax.igst_amount;
            buckets
        });

    let hsn_summary = buckets
        .into_iter()
        .map(|(hsn_code, bucket)| HsnSummaryRow {
            hsn_code,
            total_quantity: bucket.total_quantity,
            total_value: round_money(&bucket.total_value),
            cgst_amount: round_money(&bucket.cgst_amount),
            sgst_amount: round_money(&bucket.sgst_amount),
            igst_amount: round_money(&bucket.igst_amount),
        })
        .collect();

    Gstr3bReport {
        report_id: Uuid::new_v4().to_string(),
        form: "GSTR-3B".to_string(),
        start_date,
        end_date,
        total_taxable_value: round_money(&total_taxable_value),
        total_cgst: round_money(&total_cgst),
        total_sgst: round_money(&total_sgst),
        total_igst: round_money(&total_igst),
        products_sold,
        hsn_summary,
        transaction_count: transactions.len(),
        generated_at: chrono::Utc::now().naive_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::annotator::annotate_sale;
    use crate::tax::gst::GstRates;
    use crate::types::{DraftLineItem, SaleDraft};
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn speaker_sale(quantity: u32) -> SalesTransaction {
        let rates = GstRates::intra_state(dec("0.18"));
        let draft = SaleDraft::new(
            vec![DraftLineItem::new(
                "p1".to_string(),
                "Speaker".to_string(),
                "8519".to_string(),
                quantity,
                dec("2499"),
            )
            .with_rates(rates)],
            false,
        );
        annotate_sale(&draft, |_| None).unwrap()
    }

    #[test]
    fn test_build_report_totals_and_hsn_summary() {
        let transactions = vec![speaker_sale(2), speaker_sale(1)];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let report = build_report(start, end, &transactions);

        assert_eq!(report.form, "GSTR-3B");
        assert_eq!(report.transaction_count, 2);
        assert_eq!(report.total_taxable_value, dec("7497"));
        assert_eq!(report.total_cgst, dec("674.73"));
        assert_eq!(report.total_sgst, dec("674.73"));
        assert_eq!(report.total_igst, BigDecimal::from(0));

        assert_eq!(report.products_sold.len(), 2);
        assert_eq!(report.hsn_summary.len(), 1);
        let bucket = &report.hsn_summary[0];
        assert_eq!(bucket.hsn_code, "8519");
        assert_eq!(bucket.total_quantity, 3);
        assert_eq!(bucket.total_value, dec("7497"));
        assert_eq!(bucket.cgst_amount, dec("674.73"));
    }

    #[test]
    fn test_hsn_grouping_completeness() {
        // Bucket quantities must add up to the flattened line quantities.
        let mut transactions = vec![speaker_sale(2), speaker_sale(4)];
        let rates = GstRates::intra_state(dec("0.12"));
        let draft = SaleDraft::new(
            vec![DraftLineItem::new(
                "p2".to_string(),
                "Cable".to_string(),
                "8544".to_string(),
                5,
                dec("100"),
            )
            .with_rates(rates)],
            false,
        );
        transactions.push(annotate_sale(&draft, |_| None).unwrap());

        let report = build_report(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            &transactions,
        );

        let bucket_total: u64 = report.hsn_summary.iter().map(|b| b.total_quantity).sum();
        let line_total: u64 = report.products_sold.iter().map(|p| p.quantity as u64).sum();
        assert_eq!(bucket_total, line_total);
        assert_eq!(bucket_total, 11);
        assert_eq!(report.hsn_summary.len(), 2);
    }
}
