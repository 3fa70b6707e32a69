use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::error::CheckoutError;

/// Direction of a quantity +/- click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityAction {
    Increase,
    Decrease,
}

impl QuantityAction {
    /// New quantity after the click. Decreasing never goes below 1; removal is
    /// a separate action.
    pub fn apply(self, current: u32) -> u32 {
        match self {
            QuantityAction::Increase => current.saturating_add(1),
            QuantityAction::Decrease => current.saturating_sub(1).max(1),
        }
    }
}

impl FromStr for QuantityAction {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(QuantityAction::Increase),
            "decrease" => Ok(QuantityAction::Decrease),
            other => Err(CheckoutError::Validation(format!(
                "Unknown quantity action: {other}"
            ))),
        }
    }
}

/// Response of the cart update and remove endpoints.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CartItemUpdate {
    pub success: bool,
    pub message: Option<String>,
    pub item_removed: bool,
    pub quantity: Option<u32>,
    pub item_total: Option<Decimal>,
    pub cart_item_count: u32,
}

/// Server-computed cart totals. The client never recomputes any of these.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CartTotals {
    pub success: bool,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub cart_subtotal: Decimal,
    pub delivery_cost: Decimal,
    pub order_total: Decimal,
    pub free_delivery_threshold: Decimal,
    pub fixed_delivery_cost: Decimal,
}

impl CartTotals {
    pub fn has_discount(&self) -> bool {
        self.discount > Decimal::ZERO
    }

    pub fn delivery_notice(&self) -> DeliveryNotice {
        DeliveryNotice::new(
            self.cart_subtotal,
            self.free_delivery_threshold,
            self.fixed_delivery_cost,
        )
    }
}

/// Line shown under the totals explaining whether delivery is charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryNotice {
    pub text: String,
    /// Free delivery is rendered in the accent colour.
    pub highlighted: bool,
}

impl DeliveryNotice {
    pub fn new(cart_subtotal: Decimal, threshold: Decimal, fixed_cost: Decimal) -> Self {
        if cart_subtotal < threshold {
            Self {
                text: format!(
                    "Order amount less than $ {}. Delivery will be charged $ {}.",
                    threshold.normalize(),
                    fixed_cost.normalize()
                ),
                highlighted: false,
            }
        } else {
            Self {
                text: "The order will be delivered free of charge.".to_string(),
                highlighted: true,
            }
        }
    }
}

/// Two-decimal rendering used for every price on the page.
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(QuantityAction::Increase.apply(1), 2);
        assert_eq!(QuantityAction::Decrease.apply(3), 2);
        assert_eq!(QuantityAction::Decrease.apply(1), 1);
        assert_eq!(QuantityAction::Decrease.apply(0), 1);
    }

    #[test]
    fn test_totals_decode_from_floats() {
        let totals: CartTotals = serde_json::from_str(
            r#"{"success": true, "subtotal": 120.5, "discount": 12.05,
                "cart_subtotal": 108.45, "delivery_cost": 0, "order_total": 108.45,
                "free_delivery_threshold": 100, "fixed_delivery_cost": 5}"#,
        )
        .unwrap();
        assert_eq!(totals.discount, dec!(12.05));
        assert_eq!(totals.order_total, dec!(108.45));
        assert!(totals.has_discount());
    }

    #[test]
    fn test_item_update_tolerates_missing_fields() {
        let update: CartItemUpdate =
            serde_json::from_str(r#"{"success": false, "message": "Item not found in cart"}"#)
                .unwrap();
        assert!(!update.success);
        assert_eq!(update.item_total, None);
        assert_eq!(update.cart_item_count, 0);
    }

    #[test]
    fn test_delivery_notice_below_threshold() {
        let notice = DeliveryNotice::new(dec!(42.50), dec!(100.0), dec!(5));
        assert_eq!(
            notice.text,
            "Order amount less than $ 100. Delivery will be charged $ 5."
        );
        assert!(!notice.highlighted);
    }

    #[test]
    fn test_delivery_notice_at_threshold_is_free() {
        let notice = DeliveryNotice::new(dec!(100), dec!(100), dec!(5));
        assert_eq!(notice.text, "The order will be delivered free of charge.");
        assert!(notice.highlighted);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(12.5)), "12.50");
        assert_eq!(format_money(dec!(0)), "0.00");
        assert_eq!(format_money(dec!(3.14159)), "3.14");
    }
}
