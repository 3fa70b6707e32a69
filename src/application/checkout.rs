use crate::domain::code::{INVALID_CODE_FORMAT, VerificationCode};
use crate::domain::order::{DraftCheck, DraftField, OrderDraft};
use crate::domain::ports::{CheckoutBackendBox, CheckoutView};
use crate::domain::stage::{Stage, StageEvent};
use crate::error::Result;
use tracing::{debug, info, warn};

pub const SENDING_LABEL: &str = "Sending...";
pub const ORDER_REJECTED_FALLBACK: &str = "Could not place the order";
pub const CODE_REJECTED_FALLBACK: &str = "Invalid code";
pub const CONNECTIVITY_MESSAGE: &str = "Something went wrong. Please try again.";

/// What happened to one "confirm order" click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank fields or unchecked agreement; nothing was sent.
    Invalid(DraftCheck),
    /// The server answered `success: false`.
    Rejected(String),
    /// No usable answer from the server.
    TransportFailed,
    /// Order created, SMS step revealed.
    AwaitingCode,
}

/// What happened to one "verify code" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Not four digits; nothing was sent.
    InvalidFormat,
    Rejected(String),
    TransportFailed,
    Confirmed,
}

/// Client-visible state of placing an order.
///
/// Owns the stage and drives the view; the backend is the only thing that
/// moves the stage forward. All actions take `&mut self`, so a second submit
/// cannot start while one is awaiting its response.
pub struct CheckoutFlow<V: CheckoutView> {
    backend: CheckoutBackendBox,
    view: V,
    stage: Stage,
}

impl<V: CheckoutView> CheckoutFlow<V> {
    pub fn new(backend: CheckoutBackendBox, view: V) -> Self {
        Self {
            backend,
            view,
            stage: Stage::Drafting,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Marks every text field as failing or passing and reports the result.
    pub fn validate_draft(&mut self, draft: &OrderDraft) -> DraftCheck {
        let check = draft.check();
        for field in DraftField::ALL {
            self.view.mark_field(field, check.is_blank(field));
        }
        check
    }

    /// Validates the draft and, if complete, sends it to the order endpoint.
    ///
    /// The submit control is disabled before the request goes out and is
    /// re-enabled with its old label whatever the answer.
    pub async fn submit_order(&mut self, draft: &OrderDraft) -> Result<SubmitOutcome> {
        self.stage.apply(StageEvent::SubmitOrder)?;

        let check = self.validate_draft(draft);
        if !check.is_valid() {
            debug!(blank = ?check.blank, agreed = check.agreed, "draft incomplete");
            return Ok(SubmitOutcome::Invalid(check));
        }

        let label = self.view.submit_label();
        self.view.set_submit_busy(true, SENDING_LABEL);
        let result = self.backend.create_order(draft).await;
        self.view.set_submit_busy(false, &label);

        match result {
            Ok(ack) if ack.success => {
                self.stage = self.stage.apply(StageEvent::OrderAccepted)?;
                self.view.hide_submit_controls();
                self.view.show_sms_section();
                self.view.focus_code_input();
                info!(order_id = ?ack.order_id, stage = %self.stage, "order accepted");
                Ok(SubmitOutcome::AwaitingCode)
            }
            Ok(ack) => {
                let message = ack.message_or(ORDER_REJECTED_FALLBACK).to_string();
                warn!(%message, "order rejected");
                Ok(SubmitOutcome::Rejected(message))
            }
            Err(e) if e.is_transport() => {
                warn!(error = %e, "order request failed");
                Ok(SubmitOutcome::TransportFailed)
            }
            Err(e) => Err(e),
        }
    }

    /// Checks the code locally and, if well-formed, sends it for verification.
    ///
    /// Failures leave the stage at `AwaitingSmsCode`; the user can try again
    /// as often as they like.
    pub async fn submit_code(&mut self, raw: &str) -> Result<VerifyOutcome> {
        self.stage.apply(StageEvent::SubmitCode)?;
        self.view.clear_sms_error();

        let Ok(code) = VerificationCode::parse(raw) else {
            self.view.show_sms_error(INVALID_CODE_FORMAT);
            return Ok(VerifyOutcome::InvalidFormat);
        };

        match self.backend.verify_sms(&code).await {
            Ok(ack) if ack.success => {
                self.stage = self.stage.apply(StageEvent::CodeAccepted)?;
                self.view.clear_sms_error();
                self.view.show_confirmation();
                info!(stage = %self.stage, "order confirmed");
                Ok(VerifyOutcome::Confirmed)
            }
            Ok(ack) => {
                let message = ack.message_or(CODE_REJECTED_FALLBACK).to_string();
                self.view.show_sms_error(&message);
                warn!(%message, "verification code rejected");
                Ok(VerifyOutcome::Rejected(message))
            }
            Err(e) if e.is_transport() => {
                self.view.show_sms_error(CONNECTIVITY_MESSAGE);
                warn!(error = %e, "verification request failed");
                Ok(VerifyOutcome::TransportFailed)
            }
            Err(e) => Err(e),
        }
    }
}
