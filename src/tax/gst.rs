//! GST (Goods and Services Tax) rate resolution for Indian tax compliance

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// GST rate structure for Indian taxation
///
/// Rates are fractions, not percentages: a 9% CGST rate is stored as `0.09`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRates {
    /// CGST rate fraction (Central GST)
    pub cgst_rate: BigDecimal,
    /// SGST rate fraction (State GST)
    pub sgst_rate: BigDecimal,
    /// IGST rate fraction (Integrated GST)
    pub igst_rate: BigDecimal,
}

impl GstRates {
    /// Create a rate set from explicit component fractions
    pub fn new(cgst_rate: BigDecimal, sgst_rate: BigDecimal, igst_rate: BigDecimal) -> Self {
        Self {
            cgst_rate,
            sgst_rate,
            igst_rate,
        }
    }

    /// Create an intra-state rate set (CGST + SGST, split half and half)
    pub fn intra_state(total_rate: BigDecimal) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self {
            cgst_rate: half_rate.clone(),
            sgst_rate: half_rate,
            igst_rate: BigDecimal::from(0),
        }
    }

    /// Create an inter-state rate set (IGST only)
    pub fn inter_state(total_rate: BigDecimal) -> Self {
        Self {
            cgst_rate: BigDecimal::from(0),
            sgst_rate: BigDecimal::from(0),
            igst_rate: total_rate,
        }
    }

    /// Combined GST rate across all components
    pub fn total_rate(&self) -> BigDecimal {
        &self.cgst_rate + &self.sgst_rate + &self.igst_rate
    }

    /// Validate that no component rate is negative
    pub fn validate(&self) -> Result<(), TaxError> {
        let zero = BigDecimal::from(0);
        if self.cgst_rate < zero || self.sgst_rate < zero || self.igst_rate < zero {
            return Err(TaxError::InvalidRate(format!(
                "GST rates cannot be negative: cgst={}, sgst={}, igst={}",
                self.cgst_rate, self.sgst_rate, self.igst_rate
            )));
        }
        Ok(())
    }
}

/// Per-line GST amounts computed from a taxable value
///
/// Exactly one of {cgst + sgst} or {igst} is non-zero, decided by the owning
/// transaction's inter-state flag. The taxes that do not apply are exactly 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Pre-tax value the GST was computed on (quantity x unit price)
    pub taxable_value: BigDecimal,
    /// Calculated CGST amount
    pub cgst_amount: BigDecimal,
    /// Calculated SGST amount
    pub sgst_amount: BigDecimal,
    /// Calculated IGST amount
    pub igst_amount: BigDecimal,
}

impl TaxBreakdown {
    /// Total GST amount (CGST + SGST + IGST)
    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst_amount + &self.sgst_amount + &self.igst_amount
    }

    /// Taxable value plus all applicable tax
    pub fn total_with_tax(&self) -> BigDecimal {
        &self.taxable_value + self.total_tax()
    }

    /// Copy with every amount rounded to currency precision
    pub fn rounded(&self) -> Self {
        Self {
            taxable_value: round_money(&self.taxable_value),
            cgst_amount: round_money(&self.cgst_amount),
            sgst_amount: round_money(&self.sgst_amount),
            igst_amount: round_money(&self.igst_amount),
        }
    }
}

/// Resolve which GST components apply to a taxable value and compute them
///
/// Inter-state supplies attract IGST only; intra-state supplies attract
/// CGST + SGST. Amounts keep full decimal precision; rounding happens at the
/// persistence boundary via [`round_money`].
pub fn split_tax(
    taxable_value: BigDecimal,
    is_inter_state: bool,
    rates: &GstRates,
) -> Result<TaxBreakdown, TaxError> {
    if taxable_value < BigDecimal::from(0) {
        return Err(TaxError::InvalidInput(format!(
            "taxable value cannot be negative: {}",
            taxable_value
        )));
    }
    rates.validate()?;

    let zero = BigDecimal::from(0);
    let (cgst_amount, sgst_amount, igst_amount) = if is_inter_state {
        (zero.clone(), zero, &taxable_value * &rates.igst_rate)
    } else {
        (
            &taxable_value * &rates.cgst_rate,
            &taxable_value * &rates.sgst_rate,
            zero,
        )
    };

    Ok(TaxBreakdown {
        taxable_value,
        cgst_amount,
        sgst_amount,
        igst_amount,
    })
}

/// Round a monetary amount to two decimal places
///
/// The single rounding point for the crate. Aggregates are summed at full
/// precision first and rounded here when a transaction or report is assembled
/// for persistence (sum-then-round, never per-line-then-sum).
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.round(2)
}

/// Tax computation errors
#[derive(Debug, thiserror::Error)]
pub enum TaxError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid GST rate: {0}")]
    InvalidRate(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_intra_state_rates() {
        let rates = GstRates::intra_state(dec("0.18"));
        assert_eq!(rates.cgst_rate, dec("0.09"));
        assert_eq!(rates.sgst_rate, dec("0.09"));
        assert_eq!(rates.igst_rate, BigDecimal::from(0));
        assert_eq!(rates.total_rate(), dec("0.18"));
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_inter_state_rates() {
        let rates = GstRates::inter_state(dec("0.18"));
        assert_eq!(rates.cgst_rate, BigDecimal::from(0));
        assert_eq!(rates.sgst_rate, BigDecimal::from(0));
        assert_eq!(rates.igst_rate, dec("0.18"));
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_split_tax_intra_state() {
        let rates = GstRates::intra_state(dec("0.18"));
        let breakdown = split_tax(BigDecimal::from(1000), false, &rates).unwrap();

        assert_eq!(breakdown.taxable_value, BigDecimal::from(1000));
        assert_eq!(breakdown.cgst_amount, dec("90"));
        assert_eq!(breakdown.sgst_amount, dec("90"));
        assert_eq!(breakdown.igst_amount, BigDecimal::from(0));
        assert_eq!(breakdown.total_tax(), dec("180"));
        assert_eq!(breakdown.total_with_tax(), dec("1180"));
    }

    #[test]
    fn test_split_tax_inter_state() {
        let rates = GstRates::new(dec("0.09"), dec("0.09"), dec("0.18"));
        let breakdown = split_tax(BigDecimal::from(1000), true, &rates).unwrap();

        assert_eq!(breakdown.cgst_amount, BigDecimal::from(0));
        assert_eq!(breakdown.sgst_amount, BigDecimal::from(0));
        assert_eq!(breakdown.igst_amount, dec("180"));
    }

    #[test]
    fn test_split_tax_exclusivity() {
        // Whichever flag applies, the other side stays exactly zero.
        let rates = GstRates::new(dec("0.06"), dec("0.06"), dec("0.12"));
        let zero = BigDecimal::from(0);

        let intra = split_tax(BigDecimal::from(500), false, &rates).unwrap();
        assert!(intra.cgst_amount > zero && intra.sgst_amount > zero);
        assert_eq!(intra.igst_amount, zero);

        let inter = split_tax(BigDecimal::from(500), true, &rates).unwrap();
        assert!(inter.igst_amount > zero);
        assert_eq!(inter.cgst_amount, zero);
        assert_eq!(inter.sgst_amount, zero);
    }

    #[test]
    fn test_split_tax_zero_taxable_value() {
        let rates = GstRates::intra_state(dec("0.18"));
        let breakdown = split_tax(BigDecimal::from(0), false, &rates).unwrap();
        assert_eq!(breakdown.total_tax(), BigDecimal::from(0));
    }

    #[test]
    fn test_split_tax_rejects_negative_taxable_value() {
        let rates = GstRates::intra_state(dec("0.18"));
        let result = split_tax(BigDecimal::from(-100), false, &rates);
        assert!(matches!(result, Err(TaxError::InvalidInput(_))));
    }

    #[test]
    fn test_split_tax_rejects_negative_rate() {
        let rates = GstRates::new(dec("-0.09"), dec("0.09"), BigDecimal::from(0));
        let result = split_tax(BigDecimal::from(100), false, &rates);
        assert!(matches!(result, Err(TaxError::InvalidRate(_))));
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(&dec("674.7300")), dec("674.73"));
        assert_eq!(round_money(&dec("99.999")), dec("100.00"));
        assert_eq!(round_money(&dec("12.341")), dec("12.34"));
    }

    #[test]
    fn test_rounded_breakdown() {
        let rates = GstRates::intra_state(dec("0.175"));
        let breakdown = split_tax(dec("99.99"), false, &rates).unwrap();
        let rounded = breakdown.rounded();

        // 99.99 x 0.0875 = 8.749125, rounded at the boundary only.
        assert_eq!(rounded.taxable_value, dec("99.99"));
        assert_eq!(rounded.cgst_amount, dec("8.75"));
        assert_eq!(rounded.sgst_amount, dec("8.75"));
        assert_eq!(rounded.igst_amount, BigDecimal::from(0));
        assert_ne!(breakdown.cgst_amount, rounded.cgst_amount);
    }
}
