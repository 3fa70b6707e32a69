use crate::domain::cart::{CartTotals, DeliveryNotice, format_money};
use crate::domain::order::DraftField;
use crate::domain::ports::{CartView, CheckoutView, ReservationView};
use crate::domain::reservation::ReservationField;
use std::io::Write;

const CODE_PROMPT: &str = "Enter SMS code: ";

/// Renders the checkout, cart and booking screens as plain text lines.
///
/// Output is best-effort: a closed writer must not abort the flow, so write
/// errors are dropped.
pub struct TerminalView<W: Write> {
    out: W,
    submit_label: String,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            submit_label: "Confirm Order".to_string(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn prompt_code(&mut self) {
        let _ = write!(self.out, "{CODE_PROMPT}");
        let _ = self.out.flush();
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn busy(&mut self, busy: bool, label: &str) {
        self.submit_label = label.to_string();
        if busy {
            self.line(label);
        }
    }
}

impl<W: Write> CheckoutView for TerminalView<W> {
    fn mark_field(&mut self, field: DraftField, invalid: bool) {
        if invalid {
            self.line(&format!("! {field} is required"));
        }
    }

    fn submit_label(&self) -> String {
        self.submit_label.clone()
    }

    fn set_submit_busy(&mut self, busy: bool, label: &str) {
        self.busy(busy, label);
    }

    fn hide_submit_controls(&mut self) {}

    fn show_sms_section(&mut self) {
        self.line("An SMS code has been sent to your phone.");
    }

    fn focus_code_input(&mut self) {
        self.prompt_code();
    }

    fn show_sms_error(&mut self, message: &str) {
        self.line(message);
    }

    fn clear_sms_error(&mut self) {}

    fn show_confirmation(&mut self) {
        self.line("Order confirmed. Thank you!");
    }
}

impl<W: Write> CartView for TerminalView<W> {
    fn set_quantity(&mut self, dish_id: &str, quantity: u32) {
        self.line(&format!("Dish {dish_id}: quantity {quantity}"));
    }

    fn set_item_total(&mut self, dish_id: &str, total: &str) {
        self.line(&format!("Dish {dish_id}: total {total}"));
    }

    fn remove_row(&mut self, dish_id: &str) {
        self.line(&format!("Dish {dish_id} removed"));
    }

    fn set_cart_count(&mut self, count: u32) {
        self.line(&format!("Items in cart: {count}"));
    }

    fn show_remove_confirm(&mut self, _visible: bool) {}

    fn navigate_to_cart(&mut self) {
        self.line("Your cart is empty.");
    }

    fn show_totals(&mut self, totals: &CartTotals, notice: &DeliveryNotice) {
        self.line(&format!("Subtotal: {}", format_money(totals.cart_subtotal)));
        if totals.has_discount() {
            self.line(&format!("Discount: {}", format_money(totals.discount)));
        }
        self.line(&format!("Delivery: {}", format_money(totals.delivery_cost)));
        self.line(&format!("Order Total: {}", format_money(totals.order_total)));
        self.line(&notice.text);
    }

    fn show_coupon_error(&mut self, message: Option<&str>) {
        match message {
            Some(message) => self.line(message),
            None => self.line("Coupon applied."),
        }
    }

    fn show_order_subtotal(&mut self, amount: &str) {
        self.line(&format!("Subtotal: {amount}"));
    }
}

impl<W: Write> ReservationView for TerminalView<W> {
    fn submit_label(&self) -> String {
        self.submit_label.clone()
    }

    fn set_submit_busy(&mut self, busy: bool, label: &str) {
        self.busy(busy, label);
    }

    fn clear_field_errors(&mut self) {}

    fn show_field_error(&mut self, field: ReservationField, message: &str) {
        self.line(&format!("! {field}: {message}"));
    }

    fn reset_form(&mut self) {}

    fn show_success(&mut self, message: &str) {
        self.line(message);
    }

    fn show_failure(&mut self, message: &str) {
        self.line(message);
    }
}
