//! Validation utilities

use bigdecimal::BigDecimal;

use crate::traits::ProductValidator;
use crate::types::*;

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal, field: &str) -> RetailResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(RetailError::Validation(format!(
            "{} cannot be negative",
            field
        )))
    } else {
        Ok(())
    }
}

/// Validate that a sale quantity is at least 1
pub fn validate_quantity(quantity: u32) -> RetailResult<()> {
    if quantity == 0 {
        Err(RetailError::Validation(
            "Quantity must be at least 1".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate an HSN code: 4 to 8 digits
pub fn validate_hsn_code(hsn_code: &str) -> RetailResult<()> {
    let trimmed = hsn_code.trim();
    if trimmed.len() < 4 || trimmed.len() > 8 {
        return Err(RetailError::Validation(format!(
            "HSN code '{}' must be 4 to 8 digits",
            hsn_code
        )));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(RetailError::Validation(format!(
            "HSN code '{}' can only contain digits",
            hsn_code
        )));
    }
    Ok(())
}

/// Validate the shape of a GSTIN: 15 characters, two-digit state code prefix
pub fn validate_gstin(gstin: &str) -> RetailResult<()> {
    let trimmed = gstin.trim();
    if trimmed.len() != 15 {
        return Err(RetailError::Validation(format!(
            "GSTIN '{}' must be exactly 15 characters",
            gstin
        )));
    }
    if !trimmed.chars().take(2).all(|c| c.is_ascii_digit()) {
        return Err(RetailError::Validation(format!(
            "GSTIN '{}' must start with a two-digit state code",
            gstin
        )));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(RetailError::Validation(format!(
            "GSTIN '{}' can only contain alphanumeric characters",
            gstin
        )));
    }
    Ok(())
}

/// Enhanced product validator with GST metadata checks
pub struct EnhancedProductValidator;

impl ProductValidator for EnhancedProductValidator {
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

        validate_hsn_code(&product.hsn_code)?;
        validate_non_negative_amount(&product.mrp, "MRP")?;
        validate_non_negative_amount(&product.cost_price, "Cost price")?;
        product.rates.validate()?;

        if let Some(gstin) = product.supplier_gstin.as_deref() {
            if !gstin.trim().is_empty() {
                validate_gstin(gstin)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::gst::GstRates;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_hsn_code() {
        assert!(validate_hsn_code("8519").is_ok());
        assert!(validate_hsn_code("85183000").is_ok());
        assert!(validate_hsn_code("851").is_err());
        assert!(validate_hsn_code("851930001").is_err());
        assert!(validate_hsn_code("85X9").is_err());
    }

    #[test]
    fn test_validate_gstin() {
        assert!(validate_gstin("27ABCDE1234F1Z5").is_ok());
        assert!(validate_gstin("27ABC").is_err());
        assert!(validate_gstin("XXABCDE1234F1Z5").is_err());
        assert!(validate_gstin("27ABCDE1234F1Z!").is_err());
    }

    #[test]
    fn test_enhanced_product_validator() {
        let validator = EnhancedProductValidator;
        let mut product = InventoryProduct::new(
            "p1".to_string(),
            "SKU-1".to_string(),
            "Speaker".to_string(),
            "8519".to_string(),
            dec("1000"),
            dec("800"),
            GstRates::intra_state(dec("0.18")),
            false,
        );
        assert!(validator.validate_product(&product).is_ok());

        product.supplier_gstin = Some("27ABCDE1234F1Z5".to_string());
        assert!(validator.validate_product(&product).is_ok());

        product.supplier_gstin = Some("bad".to_string());
        assert!(validator.validate_product(&product).is_err());

        product.supplier_gstin = None;
        product.hsn_code = "85".to_string();
        assert!(validator.validate_product(&product).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
    }

    #[test]
    fn test_validate_non_negative_amount() {
        assert!(validate_non_negative_amount(&dec("0"), "MRP").is_ok());
        assert!(validate_non_negative_amount(&dec("-1"), "MRP").is_err());
    }
}
