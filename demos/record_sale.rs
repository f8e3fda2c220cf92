//! Recording a point-of-sale transaction with GST and stock tracking

use bigdecimal::BigDecimal;
use std::str::FromStr;

use retail_gst_core::{
    utils::memory_storage::MemoryStore, DraftLineItem, GstRates, InventoryProduct, ProductStore,
    SaleDraft, SalesManager,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🛒 Retail GST Core - Sale Recording Example\n");

    let mut store = MemoryStore::new();

    // 1. Seed the product catalog
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
    speaker.reorder_level = 3;
    store.save_product(&speaker).await?;

    println!("📦 Seeded product:");
    println!("  {} ({})", speaker.name, speaker.sku);
    println!("  HSN {}, GST {} ({})", speaker.hsn_code, speaker.total_gst_rate(), speaker.tax_type());
    println!("  In stock: {}\n", speaker.quantity);

    // 2. Record a sale of two units
    let mut manager = SalesManager::new(store.clone(), store.clone());
    let draft = SaleDraft::new(
        vec![DraftLineItem::new(
            "prod-001".to_string(),
            "Bluetooth Speaker".to_string(),
            "8519".to_string(),
            2,
            BigDecimal::from_str("2499")?,
        )],
        false,
    )
    .with_discount(BigDecimal::from_str("50")?);

    let transaction = manager.record_sale(&draft).await?;

    println!("🧾 Recorded sale {}:", transaction.invoice_no);
    println!("  Subtotal:    ₹{}", transaction.subtotal);
    println!("  CGST:        ₹{}", transaction.total_cgst);
    println!("  SGST:        ₹{}", transaction.total_sgst);
    println!("  IGST:        ₹{}", transaction.total_igst);
    println!("  Discount:    ₹{}", transaction.discount);
    println!("  Grand Total: ₹{}\n", transaction.grand_total);

    // 3. Inventory reflects the sale
    let product = manager.product_required("prod-001").await?;
    println!("📊 Inventory after sale:");
    println!("  In stock:          {}", product.quantity);
    println!("  Total sold:        {}", product.sales_data.total_sold);
    println!("  Revenue collected: ₹{}", product.sales_data.total_revenue);
    println!("  CGST collected:    ₹{}", product.sales_data.total_tax_collected.cgst);
    println!("  History entries:   {}", product.sales_data.sales_history.len());

    // 4. Overselling is rejected outright
    let oversell = SaleDraft::new(
        vec![DraftLineItem::new(
            "prod-001".to_string(),
            "Bluetooth Speaker".to_string(),
            "8519".to_string(),
            50,
            BigDecimal::from_str("2499")?,
        )],
        false,
    );
    match manager.record_sale(&oversell).await {
        Err(err) => println!("\n🚫 Oversell rejected: {}", err),
        Ok(_) => println!("\nunexpected: oversell accepted"),
    }

    Ok(())
}
