use super::ack::Ack;
use super::cart::{CartItemUpdate, CartTotals, DeliveryNotice};
use super::code::VerificationCode;
use super::order::{DraftField, OrderDraft};
use super::reservation::{ReservationDraft, ReservationField, ReservationReply};
use crate::error::Result;
use async_trait::async_trait;

/// Server side of the checkout flow.
///
/// `Err` means the request never produced a well-formed acknowledgment
/// (network failure or undecodable body). A rejection is an `Ok(Ack)` with
/// `success == false`.
#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn create_order(&self, draft: &OrderDraft) -> Result<Ack>;
    async fn verify_sms(&self, code: &VerificationCode) -> Result<Ack>;
}

/// Server side of the cart page.
#[async_trait]
pub trait CartBackend: Send + Sync {
    async fn update_quantity(&self, dish_id: &str, quantity: u32) -> Result<CartItemUpdate>;
    async fn remove_item(&self, dish_id: &str) -> Result<CartItemUpdate>;
    async fn apply_coupon(&self, coupon_code: &str) -> Result<Ack>;
    async fn totals(&self) -> Result<CartTotals>;
}

/// Server side of the table booking form.
#[async_trait]
pub trait ReservationBackend: Send + Sync {
    async fn create_reservation(&self, draft: &ReservationDraft) -> Result<ReservationReply>;
}

/// Everything the checkout flow may change on screen.
pub trait CheckoutView {
    fn mark_field(&mut self, field: DraftField, invalid: bool);
    /// Current label of the submit control, so it can be restored later.
    fn submit_label(&self) -> String;
    fn set_submit_busy(&mut self, busy: bool, label: &str);
    fn hide_submit_controls(&mut self);
    fn show_sms_section(&mut self);
    fn focus_code_input(&mut self);
    fn show_sms_error(&mut self, message: &str);
    fn clear_sms_error(&mut self);
    fn show_confirmation(&mut self);
}

/// Everything the cart controller may change on screen.
pub trait CartView {
    fn set_quantity(&mut self, dish_id: &str, quantity: u32);
    fn set_item_total(&mut self, dish_id: &str, total: &str);
    fn remove_row(&mut self, dish_id: &str);
    fn set_cart_count(&mut self, count: u32);
    fn show_remove_confirm(&mut self, visible: bool);
    fn navigate_to_cart(&mut self);
    fn show_totals(&mut self, totals: &CartTotals, notice: &DeliveryNotice);
    fn show_coupon_error(&mut self, message: Option<&str>);
    /// The subtotal next to the delivery notice. Written even when the totals
    /// request is rejected.
    fn show_order_subtotal(&mut self, amount: &str);
}

pub trait ReservationView {
    fn submit_label(&self) -> String;
    fn set_submit_busy(&mut self, busy: bool, label: &str);
    fn clear_field_errors(&mut self);
    fn show_field_error(&mut self, field: ReservationField, message: &str);
    fn reset_form(&mut self);
    fn show_success(&mut self, message: &str);
    fn show_failure(&mut self, message: &str);
}

pub type CheckoutBackendBox = Box<dyn CheckoutBackend>;
pub type CartBackendBox = Box<dyn CartBackend>;
pub type ReservationBackendBox = Box<dyn ReservationBackend>;
