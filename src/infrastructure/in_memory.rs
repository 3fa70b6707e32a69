//! Test support: a scripted backend and a recording view.
//!
//! Nothing here touches the network or a terminal. The unit tests and the
//! integration tests under `tests/` drive every component through these two,
//! queueing server answers on one side and reading the would-be screen on the
//! other.

use crate::domain::ack::Ack;
use crate::domain::cart::{CartItemUpdate, CartTotals, DeliveryNotice};
use crate::domain::code::VerificationCode;
use crate::domain::order::{DraftField, OrderDraft};
use crate::domain::ports::{
    CartBackend, CartView, CheckoutBackend, CheckoutView, ReservationBackend, ReservationView,
};
use crate::domain::reservation::{ReservationDraft, ReservationField, ReservationReply};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Script {
    orders: VecDeque<Result<Ack>>,
    verifications: VecDeque<Result<Ack>>,
    cart_updates: VecDeque<Result<CartItemUpdate>>,
    cart_removals: VecDeque<Result<CartItemUpdate>>,
    coupons: VecDeque<Result<Ack>>,
    totals: VecDeque<Result<CartTotals>>,
    reservations: VecDeque<Result<ReservationReply>>,

    order_requests: Vec<OrderDraft>,
    code_requests: Vec<String>,
    quantity_requests: Vec<(String, u32)>,
    remove_requests: Vec<String>,
    coupon_requests: Vec<String>,
    totals_calls: usize,
    reservation_requests: Vec<ReservationDraft>,
}

/// A backend that replays queued responses and records every request.
///
/// Clones share the same script, so a test keeps one handle for assertions
/// and boxes another into the component. An empty queue answers with a
/// rejection.
#[derive(Default, Clone)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    /// An empty script: every call gets the fallback answer until something
    /// is pushed.
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_order(&self, response: Result<Ack>) {
        self.script().orders.push_back(response);
    }

    pub fn push_verify(&self, response: Result<Ack>) {
        self.script().verifications.push_back(response);
    }

    pub fn push_cart_update(&self, response: Result<CartItemUpdate>) {
        self.script().cart_updates.push_back(response);
    }

    pub fn push_cart_remove(&self, response: Result<CartItemUpdate>) {
        self.script().cart_removals.push_back(response);
    }

    pub fn push_coupon(&self, response: Result<Ack>) {
        self.script().coupons.push_back(response);
    }

    pub fn push_totals(&self, response: Result<CartTotals>) {
        self.script().totals.push_back(response);
    }

    pub fn push_reservation(&self, response: Result<ReservationReply>) {
        self.script().reservations.push_back(response);
    }

    pub fn order_calls(&self) -> usize {
        self.script().order_requests.len()
    }

    pub fn order_requests(&self) -> Vec<OrderDraft> {
        self.script().order_requests.clone()
    }

    pub fn verify_calls(&self) -> usize {
        self.script().code_requests.len()
    }

    pub fn code_requests(&self) -> Vec<String> {
        self.script().code_requests.clone()
    }

    pub fn quantity_requests(&self) -> Vec<(String, u32)> {
        self.script().quantity_requests.clone()
    }

    pub fn remove_calls(&self) -> usize {
        self.script().remove_requests.len()
    }

    pub fn coupon_requests(&self) -> Vec<String> {
        self.script().coupon_requests.clone()
    }

    pub fn totals_calls(&self) -> usize {
        self.script().totals_calls
    }

    pub fn reservation_calls(&self) -> usize {
        self.script().reservation_requests.len()
    }

    pub fn reservation_requests(&self) -> Vec<ReservationDraft> {
        self.script().reservation_requests.clone()
    }
}

fn unscripted() -> Ack {
    Ack::rejected("no scripted response")
}

#[async_trait]
impl CheckoutBackend for ScriptedBackend {
    async fn create_order(&self, draft: &OrderDraft) -> Result<Ack> {
        let mut script = self.script();
        script.order_requests.push(draft.clone());
        script.orders.pop_front().unwrap_or_else(|| Ok(unscripted()))
    }

    async fn verify_sms(&self, code: &VerificationCode) -> Result<Ack> {
        let mut script = self.script();
        script.code_requests.push(code.as_str().to_string());
        script
            .verifications
            .pop_front()
            .unwrap_or_else(|| Ok(unscripted()))
    }
}

#[async_trait]
impl CartBackend for ScriptedBackend {
    async fn update_quantity(&self, dish_id: &str, quantity: u32) -> Result<CartItemUpdate> {
        let mut script = self.script();
        script.quantity_requests.push((dish_id.to_string(), quantity));
        script
            .cart_updates
            .pop_front()
            .unwrap_or_else(|| Ok(CartItemUpdate::default()))
    }

    async fn remove_item(&self, dish_id: &str) -> Result<CartItemUpdate> {
        let mut script = self.script();
        script.remove_requests.push(dish_id.to_string());
        script
            .cart_removals
            .pop_front()
            .unwrap_or_else(|| Ok(CartItemUpdate::default()))
    }

    async fn apply_coupon(&self, coupon_code: &str) -> Result<Ack> {
        let mut script = self.script();
        script.coupon_requests.push(coupon_code.to_string());
        script.coupons.pop_front().unwrap_or_else(|| Ok(unscripted()))
    }

    async fn totals(&self) -> Result<CartTotals> {
        let mut script = self.script();
        script.totals_calls += 1;
        script
            .totals
            .pop_front()
            .unwrap_or_else(|| Ok(CartTotals::default()))
    }
}

#[async_trait]
impl ReservationBackend for ScriptedBackend {
    async fn create_reservation(&self, draft: &ReservationDraft) -> Result<ReservationReply> {
        let mut script = self.script();
        script.reservation_requests.push(draft.clone());
        script
            .reservations
            .pop_front()
            .unwrap_or_else(|| Ok(ReservationReply::default()))
    }
}

/// A view that keeps the would-be page state in plain fields.
#[derive(Debug, Clone)]
pub struct RecordingView {
    pub invalid_fields: HashSet<DraftField>,
    pub submit_label: String,
    pub submit_disabled: bool,
    pub busy_history: Vec<bool>,
    pub submit_visible: bool,
    pub agreement_visible: bool,
    pub sms_section_visible: bool,
    pub sms_section_reveals: usize,
    pub code_input_focused: bool,
    pub sms_error: Option<String>,
    pub confirmation_visible: bool,

    pub quantities: HashMap<String, u32>,
    pub item_totals: HashMap<String, String>,
    pub removed_rows: Vec<String>,
    pub cart_count: Option<u32>,
    pub remove_confirm_visible: bool,
    pub navigated_to_cart: bool,
    pub totals: Option<CartTotals>,
    pub delivery_notice: Option<DeliveryNotice>,
    pub discount_visible: bool,
    pub coupon_error: Option<String>,
    pub order_subtotal: Option<String>,

    pub reservation_errors: HashMap<ReservationField, String>,
    pub reservation_resets: usize,
    pub reservation_notice: Option<String>,
    pub reservation_failure: Option<String>,
}

impl RecordingView {
    /// A freshly loaded page: submit control visible and labelled
    /// "Confirm Order", nothing marked, no SMS section.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for RecordingView {
    fn default() -> Self {
        Self {
            invalid_fields: HashSet::new(),
            submit_label: "Confirm Order".to_string(),
            submit_disabled: false,
            busy_history: Vec::new(),
            submit_visible: true,
            agreement_visible: true,
            sms_section_visible: false,
            sms_section_reveals: 0,
            code_input_focused: false,
            sms_error: None,
            confirmation_visible: false,
            quantities: HashMap::new(),
            item_totals: HashMap::new(),
            removed_rows: Vec::new(),
            cart_count: None,
            remove_confirm_visible: false,
            navigated_to_cart: false,
            totals: None,
            delivery_notice: None,
            discount_visible: false,
            coupon_error: None,
            order_subtotal: None,
            reservation_errors: HashMap::new(),
            reservation_resets: 0,
            reservation_notice: None,
            reservation_failure: None,
        }
    }
}

impl CheckoutView for RecordingView {
    fn mark_field(&mut self, field: DraftField, invalid: bool) {
        if invalid {
            self.invalid_fields.insert(field);
        } else {
            self.invalid_fields.remove(&field);
        }
    }

    fn submit_label(&self) -> String {
        self.submit_label.clone()
    }

    fn set_submit_busy(&mut self, busy: bool, label: &str) {
        self.submit_disabled = busy;
        self.submit_label = label.to_string();
        self.busy_history.push(busy);
    }

    fn hide_submit_controls(&mut self) {
        self.submit_visible = false;
        self.agreement_visible = false;
    }

    fn show_sms_section(&mut self) {
        self.sms_section_visible = true;
        self.sms_section_reveals += 1;
    }

    fn focus_code_input(&mut self) {
        self.code_input_focused = true;
    }

    fn show_sms_error(&mut self, message: &str) {
        self.sms_error = Some(message.to_string());
    }

    fn clear_sms_error(&mut self) {
        self.sms_error = None;
    }

    fn show_confirmation(&mut self) {
        self.confirmation_visible = true;
    }
}

impl CartView for RecordingView {
    fn set_quantity(&mut self, dish_id: &str, quantity: u32) {
        self.quantities.insert(dish_id.to_string(), quantity);
    }

    fn set_item_total(&mut self, dish_id: &str, total: &str) {
        self.item_totals.insert(dish_id.to_string(), total.to_string());
    }

    fn remove_row(&mut self, dish_id: &str) {
        self.removed_rows.push(dish_id.to_string());
    }

    fn set_cart_count(&mut self, count: u32) {
        self.cart_count = Some(count);
    }

    fn show_remove_confirm(&mut self, visible: bool) {
        self.remove_confirm_visible = visible;
    }

    fn navigate_to_cart(&mut self) {
        self.navigated_to_cart = true;
    }

    fn show_totals(&mut self, totals: &CartTotals, notice: &DeliveryNotice) {
        self.discount_visible = totals.has_discount();
        self.totals = Some(totals.clone());
        self.delivery_notice = Some(notice.clone());
    }

    fn show_coupon_error(&mut self, message: Option<&str>) {
        self.coupon_error = message.map(str::to_string);
    }

    fn show_order_subtotal(&mut self, amount: &str) {
        self.order_subtotal = Some(amount.to_string());
    }
}

// Shares the submit button fields with the checkout side.
impl ReservationView for RecordingView {
    fn submit_label(&self) -> String {
        self.submit_label.clone()
    }

    fn set_submit_busy(&mut self, busy: bool, label: &str) {
        self.submit_disabled = busy;
        self.submit_label = label.to_string();
        self.busy_history.push(busy);
    }

    fn clear_field_errors(&mut self) {
        self.reservation_errors.clear();
    }

    fn show_field_error(&mut self, field: ReservationField, message: &str) {
        self.reservation_errors.insert(field, message.to_string());
    }

    fn reset_form(&mut self) {
        self.reservation_resets += 1;
    }

    fn show_success(&mut self, message: &str) {
        self.reservation_notice = Some(message.to_string());
    }

    fn show_failure(&mut self, message: &str) {
        self.reservation_failure = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_backend_replays_in_order() {
        let backend = ScriptedBackend::new();
        backend.push_verify(Ok(Ack::rejected("Invalid SMS code")));
        backend.push_verify(Ok(Ack::ok()));

        let code = VerificationCode::parse("1234").unwrap();
        assert!(!backend.verify_sms(&code).await.unwrap().success);
        assert!(backend.verify_sms(&code).await.unwrap().success);
        assert_eq!(backend.code_requests(), vec!["1234", "1234"]);
    }

    #[tokio::test]
    async fn test_empty_script_rejects() {
        let backend = ScriptedBackend::new();
        let ack = backend.create_order(&OrderDraft::default()).await.unwrap();
        assert!(!ack.success);
        assert_eq!(backend.order_calls(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_script() {
        let backend = ScriptedBackend::new();
        let handle = backend.clone();
        backend.push_totals(Ok(CartTotals {
            success: true,
            ..Default::default()
        }));

        assert!(handle.totals().await.unwrap().success);
        assert_eq!(backend.totals_calls(), 1);
    }

    #[tokio::test]
    async fn test_unscripted_reservation_is_rejected() {
        let backend = ScriptedBackend::new();
        let reply = backend
            .create_reservation(&ReservationDraft::default())
            .await
            .unwrap();
        assert!(!reply.success);
        assert_eq!(backend.reservation_calls(), 1);
    }

    #[test]
    fn test_view_field_marks() {
        let mut view = RecordingView::new();
        view.mark_field(DraftField::Phone, true);
        view.mark_field(DraftField::Phone, false);
        assert!(view.invalid_fields.is_empty());
    }
}
