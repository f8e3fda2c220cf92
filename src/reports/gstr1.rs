//! GSTR-1 outward supply return aggregation
//!
//! Builds the three statutory tables (B2B, unregistered, HSN summary) plus an
//! aggregate turnover figure for a reporting period. The aggregation source is
//! inventory records *created* in the period (inbound/purchase stock), not
//! sales transactions; see [`Gstr1Generator::generate`].

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::CompanyProfile;
use crate::reports::ReportingPeriod;
use crate::tax::gst::{round_money, split_tax};
use crate::traits::ProductStore;
use crate::types::{InventoryProduct, RetailError, RetailResult};

/// One invoice row in Table 4 or Table 7
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub invoice_no: String,
    /// Invoice date formatted `DD-MM-YYYY`
    pub invoice_date: String,
    /// Gross invoice value (the product's MRP)
    pub invoice_value: BigDecimal,
    /// Pre-tax value (the product's cost price)
    pub taxable_value: BigDecimal,
    pub integrated_tax: BigDecimal,
    pub central_tax: BigDecimal,
    pub state_ut_tax: BigDecimal,
    /// Always zero; cess is not modeled
    pub cess: BigDecimal,
    /// Two-digit state code, "00" when unknown, "NA" for unregistered rows
    pub place_of_supply: String,
}

/// Table 4 group: invoices from one GST-registered supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B2bSupplier {
    pub gstin: String,
    pub invoices: Vec<InvoiceDetail>,
}

/// One Table 12 row: HSN-wise summary across all fetched products
///
/// `total_value` here is `mrp x quantity` (gross), unlike the GSTR-3B HSN
/// summary where the same field name carries taxable value; each report keeps
/// its own definition. `description` and `uqc` are taken from whichever
/// product with that HSN code was seen last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsnRow {
    pub hsn_code: String,
    pub description: String,
    /// Unit quantity code (e.g. "NOS", "KGS")
    pub uqc: String,
    pub total_quantity: u64,
    pub total_value: BigDecimal,
    pub total_taxable_value: BigDecimal,
    pub integrated_tax: BigDecimal,
    pub central_tax: BigDecimal,
    pub state_ut_tax: BigDecimal,
}

/// Point-in-time GSTR-1 aggregation snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr1Report {
    pub report_id: String,
    /// Form identity, always "GSTR-1"
    pub form: String,
    pub period: ReportingPeriod,
    /// Four-digit year of the period start
    pub year: String,
    /// Two-digit month of the period start
    pub month: String,
    /// Statutory filing period string, `MMYYYY`
    pub filing_period: String,
    /// Static company metadata, configured rather than derived from data
    pub company: CompanyProfile,
    /// Sum of MRP over all fetched products, not tax-adjusted
    pub aggregate_turnover: BigDecimal,
    /// Table 4: invoices grouped by supplier GSTIN
    pub b2b: Vec<B2bSupplier>,
    /// Table 7: invoices from unregistered suppliers
    pub unregistered: Vec<InvoiceDetail>,
    /// Table 12: HSN-wise summary
    pub hsn_summary: Vec<HsnRow>,
    pub generated_at: NaiveDateTime,
}

#[derive(Default)]
struct HsnAccumulator {
    description: String,
    uqc: String,
    total_quantity: u64,
    total_value: BigDecimal,
    total_taxable_value: BigDecimal,
    integrated_tax: BigDecimal,
    central_tax: BigDecimal,
    state_ut_tax: BigDecimal,
}

/// GSTR-1 report generator over a product store
pub struct Gstr1Generator<P: ProductStore> {
    store: P,
    company: CompanyProfile,
}

impl<P: ProductStore> Gstr1Generator<P> {
    pub fn new(store: P, company: CompanyProfile) -> Self {
        Self { store, company }
    }

    /// Generate and persist a GSTR-1 snapshot for a reporting period
    ///
    /// Aggregates inventory products created within the period. Note that
    /// GSTR-1 is an outward-supply return while these are inbound records;
    /// the figures therefore reflect purchased stock, not recorded sales.
    /// This mirrors the system being reported against and is intentional.
    ///
    /// A period with zero matching products is refused with `NoDataFound`.
    pub async fn generate(&mut self, period: ReportingPeriod) -> RetailResult<Gstr1Report> {
        let products = self
            .store
            .get_products_created_between(period.start, period.end)
            .await?;

        if products.is_empty() {
            warn!(
                start = %period.start,
                end = %period.end,
                "GSTR-1 refused: no products in period"
            );
            return Err(RetailError::NoDataFound(format!(
                "no inventory records between {} and {}",
                period.start, period.end
            )));
        }

        let report = build_report(period, self.company.clone(), &products)?;
        self.store.save_gstr1_report(&report).await?;

        info!(
            report_id = %report.report_id,
            suppliers = report.b2b.len(),
            unregistered = report.unregistered.len(),
            hsn_buckets = report.hsn_summary.len(),
            "generated GSTR-1 report"
        );
        Ok(report)
    }
}

fn build_report(
    period: ReportingPeriod,
    company: CompanyProfile,
    products: &[InventoryProduct],
) -> RetailResult<Gstr1Report> {
    let aggregate_turnover: BigDecimal = products.iter().map(|p| &p.mrp).sum();

    let mut b2b_groups: BTreeMap<String, Vec<InvoiceDetail>> = BTreeMap::new();
    let mut unregistered = Vec::new();

    for product in products {
        match product.supplier_gstin.as_deref().map(str::trim) {
            Some(gstin) if !gstin.is_empty() => {
                let prefix: String = gstin.chars().take(2).collect();
                let place_of_supply = if prefix.len() == 2 {
                    prefix
                } else {
                    "00".to_string()
                };
                let row = invoice_detail(product, place_of_supply)?;
                b2b_groups.entry(gstin.to_string()).or_default().push(row);
            }
            _ => {
                unregistered.push(invoice_detail(product, "NA".to_string())?);
            }
        }
    }

    let b2b = b2b_groups
        .into_iter()
        .map(|(gstin, invoices)| B2bSupplier { gstin, invoices })
        .collect();

    let mut buckets: BTreeMap<String, HsnAccumulator> = BTreeMap::new();
    for product in products {
        let quantity = BigDecimal::from(product.quantity);
        let unit_tax = split_tax(
            product.cost_price.clone(),
            product.is_inter_state,
            &product.rates,
        )?;

        let bucket = buckets.entry(product.hsn_code.clone()).or_default();
        bucket.description = product.name.clone();
        bucket.uqc = product.uqc.clone();
        bucket.total_quantity += product.quantity as u64;
        bucket.total_value += &product.mrp * &quantity;
        bucket.total_taxable_value += &product.cost_price * &quantity;
        bucket.integrated_tax += &unit_tax.igst_amount * &quantity;
        bucket.central_tax += &unit_tax.cgst_amount * &quantity;
        bucket.state_ut_tax += &unit_tax.sgst_amount * &quantity;
    }

    let hsn_summary = buckets
        .into_iter()
        .map(|(hsn_code, bucket)| HsnRow {
            hsn_code,
            description: bucket.description,
            uqc: bucket.uqc,
            total_quantity: bucket.total_quantity,
            total_value: round_money(&bucket.total_value),
            total_taxable_value: round_money(&bucket.total_taxable_value),
            integrated_tax: round_money(&bucket.integrated_tax),
            central_tax: round_money(&bucket.central_tax),
            state_ut_tax: round_money(&bucket.state_ut_tax),
        })
        .collect();

    Ok(Gstr1Report {
        report_id: Uuid::new_v4().to_string(),
        form: "GSTR-1".to_string(),
        period,
        year: period.year(),
        month: period.month_str(),
        filing_period: period.filing_period(),
        company,
        aggregate_turnover: round_money(&aggregate_turnover),
        b2b,
        unregistered,
        hsn_summary,
        generated_at: chrono::Utc::now().naive_utc(),
    })
}

fn invoice_detail(
    product: &InventoryProduct,
    place_of_supply: String,
) -> RetailResult<InvoiceDetail> {
    let invoice_no = product
        .invoice_no
        .clone()
        .filter(|no| !no.trim().is_empty())
        .unwrap_or_else(|| format!("INV_{}", product.product_id));

    let invoice_date = product
        .invoice_date
        .unwrap_or_else(|| product.created_at.date())
        .format("%d-%m-%Y")
        .to_string();

    let tax = split_tax(
        product.cost_price.clone(),
        product.is_inter_state,
        &product.rates,
    )?;

    Ok(InvoiceDetail {
        invoice_no,
        invoice_date,
        invoice_value: round_money(&product.mrp),
        taxable_value: round_money(&product.cost_price),
        integrated_tax: round_money(&tax.igst_amount),
        central_tax: round_money(&tax.cgst_amount),
        state_ut_tax: round_money(&tax.sgst_amount),
        cess: BigDecimal::from(0),
        place_of_supply,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::gst::GstRates;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn company() -> CompanyProfile {
        CompanyProfile::new(
            "Acme Electronics".to_string(),
            "27ABCDE1234F1Z5".to_string(),
        )
    }

    fn product(id: &str, supplier_gstin: Option<&str>) -> InventoryProduct {
        let mut product = InventoryProduct::new(
            id.to_string(),
            format!("SKU-{}", id),
            "Speaker".to_string(),
            "8519".to_string(),
            dec("1000"),
            dec("800"),
            GstRates::intra_state(dec("0.18")),
            false,
        );
        product.quantity = 4;
        product.supplier_gstin = supplier_gstin.map(str::to_string);
        product
    }

    #[test]
    fn test_b2b_table_with_registered_supplier() {
        let period = ReportingPeriod::month(2024, 7).unwrap();
        let products = vec![product("p1", Some("27XYZAB5678C1D2"))];

        let report = build_report(period, company(), &products).unwrap();

        assert_eq!(report.form, "GSTR-1");
        assert_eq!(report.filing_period, "072024");
        assert_eq!(report.aggregate_turnover, dec("1000.00"));

        assert_eq!(report.b2b.len(), 1);
        let supplier = &report.b2b[0];
        assert_eq!(supplier.gstin, "27XYZAB5678C1D2");
        assert_eq!(supplier.invoices.len(), 1);

        let row = &supplier.invoices[0];
        assert_eq!(row.invoice_no, "INV_p1");
        assert_eq!(row.invoice_value, dec("1000.00"));
        assert_eq!(row.taxable_value, dec("800.00"));
        assert_eq!(row.central_tax, dec("72.00"));
        assert_eq!(row.state_ut_tax, dec("72.00"));
        assert_eq!(row.integrated_tax, dec("0.00"));
        assert_eq!(row.cess, BigDecimal::from(0));
        assert_eq!(row.place_of_supply, "27");

        assert!(report.unregistered.is_empty());
    }

    #[test]
    fn test_unregistered_table() {
        let period = ReportingPeriod::month(2024, 7).unwrap();
        let products = vec![product("p1", None), product("p2", Some("  "))];

        let report = build_report(period, company(), &products).unwrap();

        assert!(report.b2b.is_empty());
        assert_eq!(report.unregistered.len(), 2);
        for row in &report.unregistered {
            assert_eq!(row.place_of_supply, "NA");
        }
    }

    #[test]
    fn test_hsn_summary_scales_by_quantity() {
        let period = ReportingPeriod::month(2024, 7).unwrap();
        let products = vec![product("p1", Some("27XYZAB5678C1D2"))];

        let report = build_report(period, company(), &products).unwrap();

        assert_eq!(report.hsn_summary.len(), 1);
        let row = &report.hsn_summary[0];
        assert_eq!(row.hsn_code, "8519");
        assert_eq!(row.total_quantity, 4);
        assert_eq!(row.total_value, dec("4000.00")); // mrp x quantity
        assert_eq!(row.total_taxable_value, dec("3200.00")); // cost x quantity
        assert_eq!(row.central_tax, dec("288.00")); // 72 x 4
        assert_eq!(row.uqc, "NOS");
    }

    #[test]
    fn test_hsn_summary_last_write_wins_description() {
        let period = ReportingPeriod::month(2024, 7).unwrap();
        let mut second = product("p2", None);
        second.name = "Bluetooth Speaker".to_string();
        second.uqc = "BOX".to_string();
        let products = vec![product("p1", None), second];

        let report = build_report(period, company(), &products).unwrap();

        assert_eq!(report.hsn_summary.len(), 1);
        assert_eq!(report.hsn_summary[0].description, "Bluetooth Speaker");
        assert_eq!(report.hsn_summary[0].uqc, "BOX");
        assert_eq!(report.hsn_summary[0].total_quantity, 8);
    }

    #[test]
    fn test_invoice_detail_prefers_product_provenance() {
        let mut p = product("p1", Some("27XYZAB5678C1D2"));
        p.invoice_no = Some("BILL-42".to_string());
        p.invoice_date = NaiveDate::from_ymd_opt(2024, 7, 15);

        let row = invoice_detail(&p, "27".to_string()).unwrap();
        assert_eq!(row.invoice_no, "BILL-42");
        assert_eq!(row.invoice_date, "15-07-2024");
    }

    #[test]
    fn test_inter_state_product_reports_igst() {
        let period = ReportingPeriod::month(2024, 7).unwrap();
        let mut p = product("p1", Some("29XYZAB5678C1D2"));
        p.is_inter_state = true;
        p.rates = GstRates::inter_state(dec("0.18"));

        let report = build_report(period, company(), &[p]).unwrap();
        let row = &report.b2b[0].invoices[0];
        assert_eq!(row.integrated_tax, dec("144.00"));
        assert_eq!(row.central_tax, dec("0.00"));
        assert_eq!(row.state_ut_tax, dec("0.00"));
    }
}
