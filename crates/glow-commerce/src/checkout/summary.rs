//! Order summary for hand-off.
//!
//! An [`OrderSummary`] is built from the cart lines, a priced breakdown and
//! some metadata, and rendered to text with [`OrderSummary::render_text`].
//! Identical inputs always render identical text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{CartLineItem, FreeShippingReason, PricedBreakdown};
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::money::Money;

const ITEM_RULE: usize = 30;
const TOTALS_RULE: usize = 20;

/// Store details printed in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreProfile {
    /// Store name.
    pub name: String,
    /// Website shown under contact info.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Order email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone or messaging number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Steps the customer follows after sending the order.
    pub next_steps: Vec<String>,
}

impl Default for StoreProfile {
    fn default() -> Self {
        Self {
            name: "Glowcart".to_string(),
            website: Some("www.glowcart.test".to_string()),
            email: Some("orders@glowcart.test".to_string()),
            phone: None,
            next_steps: vec![
                "Confirm your order by replying \"CONFIRMED\"".to_string(),
                "Share your delivery address".to_string(),
                "Choose a payment method (cash, card or transfer)".to_string(),
                "We'll process your order within 24 hours".to_string(),
            ],
        }
    }
}

/// Who and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetadata {
    /// Order id.
    pub order_id: OrderId,
    /// Placement time.
    pub placed_at: DateTime<Utc>,
    /// Store details.
    pub store: StoreProfile,
}

impl OrderMetadata {
    /// Metadata with explicit values.
    pub fn new(order_id: OrderId, placed_at: DateTime<Utc>, store: StoreProfile) -> Self {
        Self {
            order_id,
            placed_at,
            store,
        }
    }

    /// Stamp the current time and derive an `ORD-<millis>` id from it.
    pub fn now(store: StoreProfile) -> Self {
        let placed_at = Utc::now();
        Self::new(
            OrderId::from_timestamp_millis(placed_at.timestamp_millis()),
            placed_at,
            store,
        )
    }
}

/// One item in the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    /// 1-based position.
    pub position: usize,
    /// Product name.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Unit price.
    pub unit_price: Money,
    /// Compare-at price, only when on sale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_unit_price: Option<Money>,
    /// Savings over the line, only when on sale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<Money>,
    /// Quantity.
    pub quantity: u32,
    /// Unit price times quantity.
    pub line_total: Money,
}

/// A section of the summary, in render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "kebab-case")]
pub enum SummarySection {
    Header {
        store_name: String,
        date: String,
        time: String,
        order_id: OrderId,
    },
    Items {
        lines: Vec<SummaryLine>,
    },
    Totals {
        line_count: usize,
        subtotal: Money,
        discount: Option<Money>,
        /// `None` when shipping is free.
        shipping: Option<Money>,
        tax: Money,
        total: Money,
    },
    Offer {
        message: String,
    },
    NextSteps {
        steps: Vec<String>,
    },
    Contact {
        website: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    },
    Footer {
        message: String,
    },
}

/// A formatted order summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Sections in render order.
    pub sections: Vec<SummarySection>,
}

impl OrderSummary {
    /// Build the summary. An empty cart cannot be summarized.
    pub fn build(
        items: &[CartLineItem],
        breakdown: &PricedBreakdown,
        metadata: &OrderMetadata,
    ) -> Result<Self, CommerceError> {
        if items.is_empty() {
            return Err(CommerceError::invalid("cannot summarize an empty cart"));
        }

        let lines = items
            .iter()
            .enumerate()
            .map(|(i, item)| summary_line(i + 1, item))
            .collect::<Result<Vec<_>, _>>()?;

        let mut sections = vec![
            SummarySection::Header {
                store_name: metadata.store.name.clone(),
                date: metadata.placed_at.format("%A, %B %-d, %Y").to_string(),
                time: metadata.placed_at.format("%I:%M %p").to_string(),
                order_id: metadata.order_id.clone(),
            },
            SummarySection::Items { lines },
            SummarySection::Totals {
                line_count: items.len(),
                subtotal: breakdown.subtotal,
                discount: breakdown.has_discount().then_some(breakdown.discount_amount),
                shipping: (!breakdown.shipping_cost.is_zero()).then_some(breakdown.shipping_cost),
                tax: breakdown.tax_amount,
                total: breakdown.total,
            },
        ];

        if let Some(message) = offer_message(breakdown) {
            sections.push(SummarySection::Offer { message });
        }
        if !metadata.store.next_steps.is_empty() {
            sections.push(SummarySection::NextSteps {
                steps: metadata.store.next_steps.clone(),
            });
        }
        let store = &metadata.store;
        if store.website.is_some() || store.email.is_some() || store.phone.is_some() {
            sections.push(SummarySection::Contact {
                website: store.website.clone(),
                email: store.email.clone(),
                phone: store.phone.clone(),
            });
        }
        sections.push(SummarySection::Footer {
            message: format!("Thank you for choosing {}!", store.name),
        });

        Ok(Self { sections })
    }

    /// Render as plain text.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            render_section(&mut out, section);
        }
        while out.ends_with('\n') {
            out.pop();
        }
        out.push('\n');
        out
    }
}

fn summary_line(position: usize, item: &CartLineItem) -> Result<SummaryLine, CommerceError> {
    let on_sale = item.is_on_sale();
    Ok(SummaryLine {
        position,
        name: item.name.clone(),
        category: item.category.clone(),
        variant: item.variant.clone(),
        unit_price: item.unit_price,
        original_unit_price: if on_sale { item.original_unit_price } else { None },
        savings: if on_sale { Some(item.savings()?) } else { None },
        quantity: item.quantity,
        line_total: item.line_total()?,
    })
}

fn offer_message(breakdown: &PricedBreakdown) -> Option<String> {
    if breakdown.free_shipping == Some(FreeShippingReason::Threshold) {
        Some("Congratulations! You qualified for FREE shipping!".to_string())
    } else if breakdown.amount_to_free_shipping.is_positive() {
        Some(format!(
            "Tip: Add {} more to get FREE shipping!",
            breakdown.amount_to_free_shipping
        ))
    } else {
        None
    }
}

fn render_section(out: &mut String, section: &SummarySection) {
    match section {
        SummarySection::Header {
            store_name,
            date,
            time,
            order_id,
        } => {
            out.push_str(&format!("NEW ORDER FROM {}\n\n", store_name.to_uppercase()));
            out.push_str(&format!("Date: {}\n", date));
            out.push_str(&format!("Time: {}\n", time));
            out.push_str(&format!("Order ID: {}\n\n", order_id));
        }
        SummarySection::Items { lines } => {
            out.push_str("ORDERED ITEMS:\n");
            out.push_str(&format!("{}\n\n", "-".repeat(ITEM_RULE)));
            for line in lines {
                out.push_str(&format!("{}. {}\n", line.position, line.name));
                if let Some(category) = &line.category {
                    out.push_str(&format!("   Category: {}\n", category));
                }
                if let Some(variant) = &line.variant {
                    out.push_str(&format!("   Variant: {}\n", variant));
                }
                match (line.original_unit_price, line.savings) {
                    (Some(original), Some(savings)) => {
                        out.push_str(&format!(
                            "   Price: {} (was {})\n",
                            line.unit_price, original
                        ));
                        out.push_str(&format!("   You Save: {}\n", savings));
                    }
                    _ => out.push_str(&format!("   Price: {}\n", line.unit_price)),
                }
                out.push_str(&format!("   Quantity: {}\n", line.quantity));
                out.push_str(&format!("   Subtotal: {}\n\n", line.line_total));
            }
            out.push_str(&format!("{}\n\n", "=".repeat(ITEM_RULE)));
        }
        SummarySection::Totals {
            line_count,
            subtotal,
            discount,
            shipping,
            tax,
            total,
        } => {
            out.push_str("ORDER SUMMARY:\n");
            out.push_str(&format!("{}\n", "-".repeat(TOTALS_RULE)));
            out.push_str(&format!("Items ({}): {}\n", line_count, subtotal));
            if let Some(discount) = discount {
                out.push_str(&format!("Discount: -{}\n", discount));
            }
            match shipping {
                Some(cost) => out.push_str(&format!("Shipping: {}\n", cost)),
                None => out.push_str("Shipping: FREE\n"),
            }
            out.push_str(&format!("Tax: {}\n", tax));
            out.push_str(&format!("{}\n", "-".repeat(TOTALS_RULE)));
            out.push_str(&format!("TOTAL: {}\n\n", total));
        }
        SummarySection::Offer { message } => {
            out.push_str(&format!("{}\n\n", message));
        }
        SummarySection::NextSteps { steps } => {
            out.push_str("NEXT STEPS:\n");
            for (i, step) in steps.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, step));
            }
            out.push('\n');
        }
        SummarySection::Contact {
            website,
            email,
            phone,
        } => {
            out.push_str("CONTACT INFO:\n");
            if let Some(website) = website {
                out.push_str(&format!("Website: {}\n", website));
            }
            if let Some(email) = email {
                out.push_str(&format!("Email: {}\n", email));
            }
            if let Some(phone) = phone {
                out.push_str(&format!("Phone: {}\n", phone));
            }
            out.push('\n');
        }
        SummarySection::Footer { message } => {
            out.push_str(&format!("{}\n", message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::price_cart;
    use crate::catalog::Product;
    use crate::config::PricingPolicy;
    use crate::money::Currency;
    use chrono::TimeZone;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn metadata() -> OrderMetadata {
        let placed_at = Utc.with_ymd_and_hms(2024, 6, 10, 14, 5, 0).unwrap();
        OrderMetadata::new(
            OrderId::from_timestamp_millis(placed_at.timestamp_millis()),
            placed_at,
            StoreProfile::default(),
        )
    }

    fn cart() -> Vec<CartLineItem> {
        let mut serum = CartLineItem::from_product(
            &Product::new("p1", "Vitamin C Serum", usd(3999))
                .with_category("skincare", "Skincare")
                .with_original_price(usd(4999)),
        );
        serum.quantity = 2;
        let lipstick = CartLineItem::from_product(&Product::new("p2", "Matte Lipstick", usd(1800)))
            .with_variant("Ruby");
        vec![serum, lipstick]
    }

    fn summary(items: &[CartLineItem], promo: Option<&str>) -> OrderSummary {
        let policy = PricingPolicy::default();
        let shipping = policy.shipping_method("standard").unwrap();
        let breakdown = price_cart(items, shipping, promo, &policy).unwrap();
        OrderSummary::build(items, &breakdown, &metadata()).unwrap()
    }

    #[test]
    fn test_section_order() {
        let names: Vec<&str> = summary(&cart(), None)
            .sections
            .iter()
            .map(|s| match s {
                SummarySection::Header { .. } => "header",
                SummarySection::Items { .. } => "items",
                SummarySection::Totals { .. } => "totals",
                SummarySection::Offer { .. } => "offer",
                SummarySection::NextSteps { .. } => "next-steps",
                SummarySection::Contact { .. } => "contact",
                SummarySection::Footer { .. } => "footer",
            })
            .collect();
        assert_eq!(
            names,
            vec!["header", "items", "totals", "offer", "next-steps", "contact", "footer"]
        );
    }

    #[test]
    fn test_render_contents() {
        let text = summary(&cart(), Some("SAVE10")).render_text();

        assert!(text.starts_with("NEW ORDER FROM GLOWCART\n"));
        assert!(text.contains("Date: Monday, June 10, 2024\n"));
        assert!(text.contains("Time: 02:05 PM\n"));
        assert!(text.contains("Order ID: ORD-1718028300000\n"));
        assert!(text.contains("1. Vitamin C Serum\n   Category: Skincare\n"));
        assert!(text.contains("   Price: $39.99 (was $49.99)\n   You Save: $20.00\n"));
        assert!(text.contains("   Quantity: 2\n   Subtotal: $79.98\n"));
        assert!(text.contains("2. Matte Lipstick\n   Variant: Ruby\n   Price: $18.00\n"));
        assert!(text.contains("Items (2): $97.98\n"));
        assert!(text.contains("Discount: -$9.80\n"));
        assert!(text.contains("Shipping: FREE\n"));
        assert!(text.contains("Tax: $7.84\n"));
        assert!(text.contains("TOTAL: $96.02\n"));
        assert!(text.contains("Congratulations! You qualified for FREE shipping!"));
        assert!(text.ends_with("Thank you for choosing Glowcart!\n"));
    }

    #[test]
    fn test_tip_below_threshold() {
        let items = vec![CartLineItem::from_product(&Product::new("p2", "Lipstick", usd(1800)))];
        let text = summary(&items, None).render_text();
        assert!(text.contains("Shipping: $9.99\n"));
        assert!(text.contains("Tip: Add $57.01 more to get FREE shipping!"));
        assert!(!text.contains("Discount"));
    }

    #[test]
    fn test_tip_at_exact_threshold() {
        let items = vec![CartLineItem::from_product(&Product::new("p3", "Palette", usd(7500)))];
        let text = summary(&items, None).render_text();
        assert!(text.contains("Shipping: $9.99\n"));
        assert!(text.contains("Tip: Add $0.01 more to get FREE shipping!"));
        assert!(!text.contains("Congratulations"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = summary(&cart(), Some("FREESHIP")).render_text();
        let b = summary(&cart(), Some("FREESHIP")).render_text();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let policy = PricingPolicy::default();
        let shipping = policy.default_shipping_method().unwrap();
        let breakdown = price_cart(&[], shipping, None, &policy).unwrap();
        assert!(OrderSummary::build(&[], &breakdown, &metadata()).is_err());
    }

    #[test]
    fn test_summary_serializes_with_section_tags() {
        let json = serde_json::to_value(summary(&cart(), None)).unwrap();
        assert_eq!(json["sections"][0]["section"], "header");
        assert_eq!(json["sections"][1]["lines"][0]["lineTotal"]["amountCents"], 7998);
    }

    #[test]
    fn test_metadata_now_uses_millis_id() {
        let meta = OrderMetadata::now(StoreProfile::default());
        assert_eq!(
            meta.order_id.as_str(),
            format!("ORD-{}", meta.placed_at.timestamp_millis())
        );
    }
}
