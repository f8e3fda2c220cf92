//! # Retail GST Core
//!
//! A retail back-office library providing point-of-sale transaction
//! recording, inventory stock tracking, and Indian GST compliance reporting.
//!
//! ## Features
//!
//! - **GST tax resolution**: CGST/SGST vs IGST splitting driven by the
//!   inter-state classification, with full-precision decimal arithmetic
//! - **Sales annotation**: per-line tax breakdowns and invoice-level
//!   aggregates computed purely, with inventory effects expressed as data
//! - **Stock ledger**: atomic stock decrements and cumulative per-product
//!   sales counters as a side effect of recording a sale
//! - **GSTR-1 / GSTR-3B**: statutory report aggregation over a date range,
//!   persisted as immutable snapshots
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   stores
//!
//! ## Quick Start
//!
//! ```rust
//! use retail_gst_core::{DraftLineItem, GstRates, SaleDraft, annotate_sale};
//! use bigdecimal::BigDecimal;
//!
//! let draft = SaleDraft::new(
//!     vec![DraftLineItem::new(
//!         "p1".to_string(),
//!         "Speaker".to_string(),
//!         "8519".to_string(),
//!         2,
//!         BigDecimal::from(2499),
//!     )
//!     .with_rates(GstRates::intra_state("0.18".parse().unwrap()))],
//!     false,
//! );
//!
//! let transaction = annotate_sale(&draft, |_| None).unwrap();
//! assert_eq!(transaction.subtotal, BigDecimal::from(4998));
//! ```

pub mod config;
pub mod inventory;
pub mod reports;
pub mod sales;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use inventory::*;
pub use reports::*;
pub use sales::*;
pub use tax::gst::*;
pub use traits::*;
pub use types::*;
