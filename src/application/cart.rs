use crate::domain::cart::{QuantityAction, format_money};
use crate::domain::ports::{CartBackendBox, CartView};
use crate::error::{CheckoutError, Result};
use tracing::{debug, info, warn};

/// What happened to one cart action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    Applied,
    /// `success: false`, with the server's message when it sent one.
    Rejected(Option<String>),
    TransportFailed,
    /// A confirm arrived with no removal pending.
    NothingPending,
}

/// Cart page behaviour: quantity buttons, confirmed removal, coupon and
/// totals. Every figure shown comes from the server.
pub struct CartController<V: CartView> {
    backend: CartBackendBox,
    view: V,
    pending_remove: Option<String>,
}

impl<V: CartView> CartController<V> {
    pub fn new(backend: CartBackendBox, view: V) -> Self {
        Self {
            backend,
            view,
            pending_remove: None,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub fn pending_remove(&self) -> Option<&str> {
        self.pending_remove.as_deref()
    }

    pub async fn change_quantity(
        &mut self,
        dish_id: &str,
        current: u32,
        action: QuantityAction,
    ) -> Result<CartOutcome> {
        let quantity = action.apply(current);
        debug!(dish_id, quantity, "updating cart quantity");

        let update = match self.backend.update_quantity(dish_id, quantity).await {
            Ok(update) => update,
            Err(e) => return transport(e),
        };
        if !update.success {
            return Ok(CartOutcome::Rejected(update.message));
        }

        self.view.set_quantity(dish_id, quantity);
        if let Some(total) = update.item_total {
            self.view.set_item_total(dish_id, &format_money(total));
        }
        if update.item_removed {
            self.view.remove_row(dish_id);
        }
        self.view.set_cart_count(update.cart_item_count);
        self.refresh_totals().await?;
        Ok(CartOutcome::Applied)
    }

    /// First step of removal: remember the dish and ask for confirmation.
    pub fn request_remove(&mut self, dish_id: &str) {
        self.pending_remove = Some(dish_id.to_string());
        self.view.show_remove_confirm(true);
    }

    pub fn cancel_remove(&mut self) {
        self.pending_remove = None;
        self.view.show_remove_confirm(false);
    }

    /// Second step of removal. The pending dish is consumed before the request
    /// goes out, so a repeated confirm is a no-op.
    pub async fn confirm_remove(&mut self) -> Result<CartOutcome> {
        let Some(dish_id) = self.pending_remove.take() else {
            return Ok(CartOutcome::NothingPending);
        };
        self.view.show_remove_confirm(false);

        let update = match self.backend.remove_item(&dish_id).await {
            Ok(update) => update,
            Err(e) => return transport(e),
        };
        if !update.success {
            return Ok(CartOutcome::Rejected(update.message));
        }

        info!(dish_id = %dish_id, remaining = update.cart_item_count, "cart item removed");
        if update.cart_item_count == 0 {
            self.view.navigate_to_cart();
            return Ok(CartOutcome::Applied);
        }

        self.view.remove_row(&dish_id);
        self.view.set_cart_count(update.cart_item_count);
        self.refresh_totals().await?;
        Ok(CartOutcome::Applied)
    }

    pub async fn apply_coupon(&mut self, coupon_code: &str) -> Result<CartOutcome> {
        let ack = match self.backend.apply_coupon(coupon_code.trim()).await {
            Ok(ack) => ack,
            Err(e) => return transport(e),
        };
        if !ack.success {
            self.view.show_coupon_error(Some(ack.message_or("")));
            return Ok(CartOutcome::Rejected(ack.message));
        }

        self.view.show_coupon_error(None);
        self.refresh_totals().await?;
        Ok(CartOutcome::Applied)
    }

    pub async fn refresh_totals(&mut self) -> Result<CartOutcome> {
        let totals = match self.backend.totals().await {
            Ok(totals) => totals,
            Err(e) => return transport(e),
        };
        if !totals.success {
            // The subtotal line is still refreshed; the breakdown is left alone.
            self.view.show_order_subtotal(&format_money(totals.cart_subtotal));
            return Ok(CartOutcome::Rejected(None));
        }

        let notice = totals.delivery_notice();
        self.view.show_totals(&totals, &notice);
        Ok(CartOutcome::Applied)
    }
}

fn transport(e: CheckoutError) -> Result<CartOutcome> {
    if e.is_transport() {
        warn!(error = %e, "cart request failed");
        Ok(CartOutcome::TransportFailed)
    } else {
        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::{CartItemUpdate, CartTotals};
    use crate::infrastructure::in_memory::{RecordingView, ScriptedBackend};
    use rust_decimal_macros::dec;

    fn totals() -> CartTotals {
        CartTotals {
            success: true,
            subtotal: dec!(40),
            discount: dec!(0),
            cart_subtotal: dec!(40),
            delivery_cost: dec!(5),
            order_total: dec!(45),
            free_delivery_threshold: dec!(100),
            fixed_delivery_cost: dec!(5),
        }
    }

    #[tokio::test]
    async fn test_decrease_never_sends_zero() {
        let backend = ScriptedBackend::new();
        backend.push_cart_update(Ok(CartItemUpdate {
            success: true,
            item_total: Some(dec!(12.5)),
            cart_item_count: 1,
            ..Default::default()
        }));
        backend.push_totals(Ok(totals()));
        let mut cart = CartController::new(Box::new(backend.clone()), RecordingView::new());

        let outcome = cart
            .change_quantity("7", 1, QuantityAction::Decrease)
            .await
            .unwrap();

        assert_eq!(outcome, CartOutcome::Applied);
        assert_eq!(backend.quantity_requests(), vec![("7".to_string(), 1)]);
        assert_eq!(cart.view().quantities.get("7"), Some(&1));
        assert_eq!(cart.view().item_totals.get("7").map(String::as_str), Some("12.50"));
        assert_eq!(cart.view().cart_count, Some(1));
    }

    #[tokio::test]
    async fn test_rejected_update_changes_nothing() {
        let backend = ScriptedBackend::new();
        backend.push_cart_update(Ok(CartItemUpdate {
            success: false,
            message: Some("Item not found in cart".to_string()),
            ..Default::default()
        }));
        let mut cart = CartController::new(Box::new(backend.clone()), RecordingView::new());

        let outcome = cart
            .change_quantity("7", 2, QuantityAction::Increase)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CartOutcome::Rejected(Some("Item not found in cart".to_string()))
        );
        assert!(cart.view().quantities.is_empty());
        assert_eq!(backend.totals_calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_forgets_pending_removal() {
        let backend = ScriptedBackend::new();
        let mut cart = CartController::new(Box::new(backend.clone()), RecordingView::new());

        cart.request_remove("3");
        assert!(cart.view().remove_confirm_visible);
        cart.cancel_remove();

        assert!(!cart.view().remove_confirm_visible);
        assert_eq!(cart.confirm_remove().await.unwrap(), CartOutcome::NothingPending);
        assert_eq!(backend.remove_calls(), 0);
    }

    #[tokio::test]
    async fn test_removing_last_item_navigates() {
        let backend = ScriptedBackend::new();
        backend.push_cart_remove(Ok(CartItemUpdate {
            success: true,
            item_removed: true,
            cart_item_count: 0,
            ..Default::default()
        }));
        let mut cart = CartController::new(Box::new(backend.clone()), RecordingView::new());

        cart.request_remove("3");
        cart.confirm_remove().await.unwrap();

        assert!(cart.view().navigated_to_cart);
        assert_eq!(backend.totals_calls(), 0);
        assert_eq!(cart.pending_remove(), None);
    }

    #[tokio::test]
    async fn test_remove_with_items_left() {
        let backend = ScriptedBackend::new();
        backend.push_cart_remove(Ok(CartItemUpdate {
            success: true,
            item_removed: true,
            cart_item_count: 2,
            ..Default::default()
        }));
        backend.push_totals(Ok(totals()));
        let mut cart = CartController::new(Box::new(backend.clone()), RecordingView::new());

        cart.request_remove("3");
        cart.confirm_remove().await.unwrap();

        let view = cart.view();
        assert!(view.removed_rows.contains(&"3".to_string()));
        assert_eq!(view.cart_count, Some(2));
        assert!(!view.navigated_to_cart);
        assert!(view.totals.is_some());
    }

    #[tokio::test]
    async fn test_counter_updated_when_totals_fail_locally() {
        let backend = ScriptedBackend::new();
        backend.push_cart_update(Ok(CartItemUpdate {
            success: true,
            cart_item_count: 5,
            ..Default::default()
        }));
        backend.push_totals(Err(CheckoutError::Config(
            "No anti-forgery token found on the cart page".into(),
        )));
        let mut cart = CartController::new(Box::new(backend.clone()), RecordingView::new());

        let err = cart
            .change_quantity("7", 4, QuantityAction::Increase)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Config(_)));
        assert_eq!(cart.view().quantities.get("7"), Some(&5));
        assert_eq!(cart.view().cart_count, Some(5));
    }

    #[tokio::test]
    async fn test_counter_updated_after_remove_when_totals_fail_locally() {
        let backend = ScriptedBackend::new();
        backend.push_cart_remove(Ok(CartItemUpdate {
            success: true,
            item_removed: true,
            cart_item_count: 1,
            ..Default::default()
        }));
        backend.push_totals(Err(CheckoutError::Config("no token".into())));
        let mut cart = CartController::new(Box::new(backend.clone()), RecordingView::new());

        cart.request_remove("3");
        assert!(cart.confirm_remove().await.is_err());

        assert_eq!(cart.view().removed_rows, vec!["3".to_string()]);
        assert_eq!(cart.view().cart_count, Some(1));
    }

    #[tokio::test]
    async fn test_rejected_totals_still_show_subtotal() {
        let backend = ScriptedBackend::new();
        backend.push_totals(Ok(CartTotals {
            success: false,
            cart_subtotal: dec!(42.5),
            ..Default::default()
        }));
        let mut cart = CartController::new(Box::new(backend.clone()), RecordingView::new());

        let outcome = cart.refresh_totals().await.unwrap();

        assert_eq!(outcome, CartOutcome::Rejected(None));
        assert_eq!(cart.view().order_subtotal.as_deref(), Some("42.50"));
        assert!(cart.view().totals.is_none());
        assert!(cart.view().delivery_notice.is_none());
    }

    #[tokio::test]
    async fn test_coupon_error_then_success() {
        let backend = ScriptedBackend::new();
        backend.push_coupon(Ok(crate::domain::ack::Ack::rejected("Invalid coupon code")));
        backend.push_coupon(Ok(crate::domain::ack::Ack::ok()));
        let mut discounted = totals();
        discounted.discount = dec!(4);
        backend.push_totals(Ok(discounted));
        let mut cart = CartController::new(Box::new(backend.clone()), RecordingView::new());

        cart.apply_coupon("NOPE").await.unwrap();
        assert_eq!(cart.view().coupon_error.as_deref(), Some("Invalid coupon code"));

        cart.apply_coupon(" SAVE10 ").await.unwrap();
        let view = cart.view();
        assert_eq!(view.coupon_error, None);
        assert!(view.discount_visible);
        assert_eq!(backend.coupon_requests(), vec!["NOPE".to_string(), "SAVE10".to_string()]);
    }
}
