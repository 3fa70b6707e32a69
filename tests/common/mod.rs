#![allow(dead_code)]

use tavola::application::checkout::{CheckoutFlow, SubmitOutcome};
use tavola::domain::ack::Ack;
use tavola::domain::order::{OrderDraft, PaymentMethod};
use tavola::infrastructure::in_memory::{RecordingView, ScriptedBackend};

pub fn ann_draft() -> OrderDraft {
    OrderDraft {
        customer_name: "Ann".to_string(),
        phone_number: "+7 900 000 00 00".to_string(),
        delivery_address: "1 Main St".to_string(),
        payment_method: PaymentMethod::Cash,
        agree: true,
    }
}

pub fn new_flow(backend: &ScriptedBackend) -> CheckoutFlow<RecordingView> {
    CheckoutFlow::new(Box::new(backend.clone()), RecordingView::new())
}

/// A flow already past order creation, waiting for the SMS code.
pub async fn awaiting_code(backend: &ScriptedBackend) -> CheckoutFlow<RecordingView> {
    backend.push_order(Ok(Ack {
        success: true,
        message: Some("SMS code sent to your phone".to_string()),
        order_id: Some("17".to_string()),
    }));
    let mut flow = new_flow(backend);
    let outcome = flow.submit_order(&ann_draft()).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::AwaitingCode);
    flow
}

pub const CART_PAGE: &str = r#"<!doctype html>
<html><body>
<form id="coupon-form" method="post" action="/orders/cart/apply-coupon/">
  <input type="hidden" name="csrfmiddlewaretoken" value="page-token-123">
  <input type="text" name="coupon_code">
</form>
</body></html>"#;
