//! Generating GSTR-1 and GSTR-3B reports from recorded data

use bigdecimal::BigDecimal;
use chrono::Utc;
use std::str::FromStr;

use retail_gst_core::{
    utils::memory_storage::MemoryStore, CompanyProfile, DraftLineItem, GstRates,
    Gstr1Generator, Gstr3bGenerator, InventoryProduct, ProductStore, ReportingPeriod, SaleDraft,
    SalesManager,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Retail GST Core - Statutory Report Examples\n");

    let mut store = MemoryStore::new();

    // Seed two products, one from a GST-registered supplier
    let mut speaker = InventoryProduct::new(
        "prod-001".to_string(),
        "SPK-01".to_string(),
        "Bluetooth Speaker".to_string(),
        "8519".to_string(),
        BigDecimal::from_str("2999")?,
        BigDecimal::from_str("2499")?,
        GstRates::intra_state(BigDecimal::from_str("0.18")?),
        false,
    );
    speaker.quantity = 10;
    speaker.supplier_gstin = Some("27XYZAB5678C1D2".to_string());
    store.save_product(&speaker).await?;

    let mut cable = InventoryProduct::new(
        "prod-002".to_string(),
        "CBL-01".to_string(),
        "Audio Cable".to_string(),
        "8544".to_string(),
        BigDecimal::from_str("299")?,
        BigDecimal::from_str("180")?,
        GstRates::intra_state(BigDecimal::from_str("0.12")?),
        false,
    );
    cable.quantity = 40;
    store.save_product(&cable).await?;

    // Record a couple of sales so GSTR-3B has data
    let mut manager = SalesManager::new(store.clone(), store.clone());
    for (product_id, name, hsn, quantity, price) in [
        ("prod-001", "Bluetooth Speaker", "8519", 2u32, "2499"),
        ("prod-002", "Audio Cable", "8544", 5, "299"),
    ] {
        let draft = SaleDraft::new(
            vec![DraftLineItem::new(
                product_id.to_string(),
                name.to_string(),
                hsn.to_string(),
                quantity,
                BigDecimal::from_str(price)?,
            )],
            false,
        );
        manager.record_sale(&draft).await?;
    }

    let today = Utc::now().naive_utc().date();
    let start = today.pred_opt().unwrap();
    let end = today.succ_opt().unwrap();

    // GSTR-3B: summary of sales in the period
    let mut gstr3b = Gstr3bGenerator::new(store.clone());
    let summary = gstr3b.generate(start, end).await?;

    println!("📊 GSTR-3B ({} to {}):", summary.start_date, summary.end_date);
    println!("  Transactions:  {}", summary.transaction_count);
    println!("  Taxable value: ₹{}", summary.total_taxable_value);
    println!("  CGST:          ₹{}", summary.total_cgst);
    println!("  SGST:          ₹{}", summary.total_sgst);
    println!("  IGST:          ₹{}", summary.total_igst);
    println!("  HSN summary:");
    for row in &summary.hsn_summary {
        println!(
            "    {} x{} -> ₹{} (CGST ₹{}, SGST ₹{})",
            row.hsn_code, row.total_quantity, row.total_value, row.cgst_amount, row.sgst_amount
        );
    }

    // GSTR-1: supplier-wise invoices and HSN summary from inbound stock
    let company = CompanyProfile::new(
        "Acme Electronics".to_string(),
        "27ABCDE1234F1Z5".to_string(),
    );
    let mut gstr1 = Gstr1Generator::new(store.clone(), company);
    let period = ReportingPeriod::new(start, end)?;
    let outward = gstr1.generate(period).await?;

    println!("\n📄 GSTR-1 (filing period {}):", outward.filing_period);
    println!("  Aggregate turnover: ₹{}", outward.aggregate_turnover);
    println!("  Table 4 (B2B suppliers): {}", outward.b2b.len());
    for supplier in &outward.b2b {
        for invoice in &supplier.invoices {
            println!(
                "    {} {} -> taxable ₹{}, CGST ₹{}, SGST ₹{}",
                supplier.gstin,
                invoice.invoice_no,
                invoice.taxable_value,
                invoice.central_tax,
                invoice.state_ut_tax
            );
        }
    }
    println!("  Table 7 (unregistered): {} rows", outward.unregistered.len());
    println!("  Table 12 (HSN): {} buckets", outward.hsn_summary.len());

    Ok(())
}
