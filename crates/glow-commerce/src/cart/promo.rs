//! Promo codes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CommerceError;
use crate::money::{Money, Rate};

/// What a promo code does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PromoEffect {
    /// Percentage off the subtotal.
    PercentOff {
        /// Discount rate, in `(0, 100%]`.
        rate: Rate,
    },
    /// Waive shipping.
    FreeShipping,
}

impl PromoEffect {
    /// Discount on the given subtotal; zero for shipping promos.
    pub fn discount_on(&self, subtotal: &Money) -> Result<Money, CommerceError> {
        match self {
            PromoEffect::PercentOff { rate } => subtotal.apply_rate(*rate),
            PromoEffect::FreeShipping => Ok(Money::zero(subtotal.currency)),
        }
    }

    /// Check if this promo waives shipping.
    pub fn waives_shipping(&self) -> bool {
        matches!(self, PromoEffect::FreeShipping)
    }

    /// Short label, e.g. "10% off".
    pub fn label(&self) -> String {
        match self {
            PromoEffect::PercentOff { rate } => format!("{} off", rate),
            PromoEffect::FreeShipping => "Free shipping".to_string(),
        }
    }
}

/// A code and its effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoRule {
    /// Code as entered by shoppers; matched case-insensitively.
    pub code: String,
    /// Effect when applied.
    pub effect: PromoEffect,
}

impl PromoRule {
    /// Percentage-off rule.
    pub fn percent_off(code: impl Into<String>, rate: Rate) -> Self {
        Self {
            code: normalize_code(&code.into()),
            effect: PromoEffect::PercentOff { rate },
        }
    }

    /// Free-shipping rule.
    pub fn free_shipping(code: impl Into<String>) -> Self {
        Self {
            code: normalize_code(&code.into()),
            effect: PromoEffect::FreeShipping,
        }
    }

    fn validate(&self) -> Result<(), CommerceError> {
        if normalize_code(&self.code).is_empty() {
            return Err(CommerceError::invalid("promo code must not be empty"));
        }
        if let PromoEffect::PercentOff { rate } = self.effect {
            if rate.is_zero() || rate > Rate::FULL {
                return Err(CommerceError::invalid(format!(
                    "promo {} percentage {} is outside (0, 100%]",
                    self.code, rate
                )));
            }
        }
        Ok(())
    }
}

/// Trim and upper-case a code for comparison.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// The known promo codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromoTable {
    rules: Vec<PromoRule>,
}

impl PromoTable {
    /// Build a table, rejecting invalid or duplicate codes.
    pub fn new(rules: Vec<PromoRule>) -> Result<Self, CommerceError> {
        let table = Self { rules };
        table.validate()?;
        Ok(table)
    }

    /// An empty table; every code is invalid.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Look up a code.
    pub fn lookup(&self, code: &str) -> Result<&PromoRule, CommerceError> {
        let wanted = normalize_code(code);
        self.rules
            .iter()
            .find(|rule| normalize_code(&rule.code) == wanted)
            .ok_or_else(|| CommerceError::InvalidPromoCode(code.trim().to_string()))
    }

    /// Check every rule and reject duplicate codes.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let mut seen = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            rule.validate()?;
            let code = normalize_code(&rule.code);
            if seen.contains(&code) {
                return Err(CommerceError::invalid(format!("duplicate promo code {}", code)));
            }
            seen.push(code);
        }
        Ok(())
    }

    /// Rules in table order.
    pub fn rules(&self) -> &[PromoRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for PromoTable {
    /// `SAVE10` takes 10% off; `FREESHIP` waives shipping.
    fn default() -> Self {
        Self {
            rules: vec![
                PromoRule::percent_off("SAVE10", Rate::percent(10)),
                PromoRule::free_shipping("FREESHIP"),
            ],
        }
    }
}

/// Holds the single active promo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoSlot {
    active: Option<PromoRule>,
}

impl PromoSlot {
    /// Start with no promo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a code, replacing the active promo.
    ///
    /// An unknown code is rejected and the previous promo stays active.
    pub fn apply(&mut self, table: &PromoTable, code: &str) -> Result<&PromoRule, CommerceError> {
        let rule = table.lookup(code)?.clone();
        debug!(code = %rule.code, "promo applied");
        Ok(self.active.insert(rule))
    }

    /// Remove the active promo.
    pub fn clear(&mut self) -> Option<PromoRule> {
        self.active.take()
    }

    /// The active promo.
    pub fn active(&self) -> Option<&PromoRule> {
        self.active.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_lookup_is_case_insensitive_and_trimmed() {
        let table = PromoTable::default();
        assert_eq!(table.lookup(" save10 ").unwrap().code, "SAVE10");
        assert!(table.lookup("FreeShip").unwrap().effect.waives_shipping());
        assert!(matches!(
            table.lookup("BOGUS"),
            Err(CommerceError::InvalidPromoCode(code)) if code == "BOGUS"
        ));
    }

    #[test]
    fn test_percent_discount() {
        let rule = PromoRule::percent_off("SAVE10", Rate::percent(10));
        let discount = rule.effect.discount_on(&Money::new(10000, Currency::USD)).unwrap();
        assert_eq!(discount.amount_cents, 1000);
        assert_eq!(rule.effect.label(), "10% off");
    }

    #[test]
    fn test_table_validation() {
        assert!(PromoTable::new(vec![PromoRule::percent_off("ZERO", Rate::from_bps(0))]).is_err());
        assert!(PromoTable::new(vec![PromoRule::percent_off("HUGE", Rate::from_bps(10_001))]).is_err());
        assert!(PromoTable::new(vec![PromoRule::percent_off("ALL", Rate::FULL)]).is_ok());
        assert!(PromoTable::new(vec![
            PromoRule::free_shipping("SHIP"),
            PromoRule::free_shipping("ship"),
        ])
        .is_err());
    }

    #[test]
    fn test_slot_replaces_and_keeps_on_invalid() {
        let table = PromoTable::default();
        let mut slot = PromoSlot::new();

        slot.apply(&table, "save10").unwrap();
        slot.apply(&table, "freeship").unwrap();
        assert_eq!(slot.active().map(|r| r.code.as_str()), Some("FREESHIP"));

        assert!(slot.apply(&table, "nope").is_err());
        assert_eq!(slot.active().map(|r| r.code.as_str()), Some("FREESHIP"));

        assert!(slot.clear().is_some());
        assert!(slot.active().is_none());
    }

    #[test]
    fn test_table_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            promos: PromoTable,
        }
        let parsed: Wrapper = toml::from_str(
            r#"
            [[promos]]
            code = "GLOW20"
            effect = { type = "percent-off", rate = 2000 }

            [[promos]]
            code = "SHIPFREE"
            effect = { type = "free-shipping" }
            "#,
        )
        .unwrap();
        assert_eq!(parsed.promos.len(), 2);
        assert_eq!(
            parsed.promos.lookup("glow20").unwrap().effect,
            PromoEffect::PercentOff { rate: Rate::percent(20) }
        );
    }
}
