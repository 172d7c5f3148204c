//! Risk limits configuration

use rust_decimal::Decimal;
use serde::Deserialize;

/// Limits applied to every incoming order.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Buffer multiplied onto the reference price when costing a market
    /// buy, e.g. 0.05 costs it at 105% of the last price.
    pub slippage_buffer: Decimal,

    /// Ceiling on the absolute aggregate net position per symbol across
    /// all accounts, in base units.
    pub exposure_ceiling: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            slippage_buffer: Decimal::new(5, 2), // 0.05
            exposure_ceiling: Decimal::from(1_000_000),
        }
    }
}

impl RiskConfig {
    /// Multiplier applied to a reference price for market-buy costing.
    pub fn slippage_multiplier(&self) -> Decimal {
        Decimal::ONE + self.slippage_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RiskConfig::default();
        assert_eq!(config.slippage_buffer, Decimal::new(5, 2));
        assert_eq!(config.slippage_multiplier(), Decimal::new(105, 2));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RiskConfig =
            serde_json::from_str(r#"{"exposure_ceiling": "500"}"#).unwrap();
        assert_eq!(config.exposure_ceiling, Decimal::from(500));
        // Unset fields keep their defaults.
        assert_eq!(config.slippage_buffer, Decimal::new(5, 2));
    }
}
