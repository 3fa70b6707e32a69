use crate::application::checkout::SENDING_LABEL;
use crate::domain::reservation::{FieldError, ReservationDraft};
use crate::domain::ports::{ReservationBackendBox, ReservationView};
use crate::error::Result;
use tracing::{debug, info, warn};

pub const RESERVATION_ACCEPTED_FALLBACK: &str =
    "Thank you! The administrator will contact you to confirm your reservation!";
pub const RESERVATION_REJECTED_FALLBACK: &str = "Please correct the errors in the form";
pub const RESERVATION_SEND_FAILED: &str = "Could not send the reservation. Please try again.";

/// What happened to one "book a table" click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationOutcome {
    /// Required inputs missing; nothing was sent.
    Invalid(Vec<FieldError>),
    /// Booked; carries the notice shown to the user.
    Accepted(String),
    /// The server refused the form. Empty when it named no known field.
    Rejected(Vec<FieldError>),
    TransportFailed,
}

/// The table booking form. Single request per submit, field errors from the
/// server mapped back onto the inputs.
pub struct ReservationForm<V: ReservationView> {
    backend: ReservationBackendBox,
    view: V,
}

impl<V: ReservationView> ReservationForm<V> {
    pub fn new(backend: ReservationBackendBox, view: V) -> Self {
        Self { backend, view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub async fn submit(&mut self, draft: &ReservationDraft) -> Result<ReservationOutcome> {
        self.view.clear_field_errors();

        let missing = draft.check();
        if !missing.is_empty() {
            debug!(missing = missing.len(), "reservation form incomplete");
            self.show_errors(&missing);
            return Ok(ReservationOutcome::Invalid(missing));
        }

        let label = self.view.submit_label();
        self.view.set_submit_busy(true, SENDING_LABEL);
        let result = self.backend.create_reservation(draft).await;
        self.view.set_submit_busy(false, &label);

        let reply = match result {
            Ok(reply) => reply,
            Err(e) if e.is_transport() => {
                warn!(error = %e, "reservation request failed");
                self.view.show_failure(RESERVATION_SEND_FAILED);
                return Ok(ReservationOutcome::TransportFailed);
            }
            Err(e) => return Err(e),
        };

        if reply.success {
            let notice = reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| RESERVATION_ACCEPTED_FALLBACK.to_string());
            info!(guests = ?draft.guests, date = %draft.visit_date, "reservation accepted");
            self.view.reset_form();
            self.view.show_success(&notice);
            return Ok(ReservationOutcome::Accepted(notice));
        }

        let errors = reply.field_errors();
        warn!(fields = errors.len(), "reservation rejected");
        if errors.is_empty() {
            let message = reply.message.as_deref().filter(|m| !m.is_empty());
            self.view
                .show_failure(message.unwrap_or(RESERVATION_REJECTED_FALLBACK));
        }
        self.show_errors(&errors);
        Ok(ReservationOutcome::Rejected(errors))
    }

    fn show_errors(&mut self, errors: &[FieldError]) {
        for error in errors {
            self.view.show_field_error(error.field, &error.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reservation::{ReservationField, ReservationReply};
    use crate::error::CheckoutError;
    use crate::infrastructure::in_memory::{RecordingView, ScriptedBackend};

    fn draft() -> ReservationDraft {
        ReservationDraft {
            name: "Ann".to_string(),
            email: "ann@example.org".to_string(),
            phone: "+7 900 000 00 00".to_string(),
            guests: Some(4),
            visit_date: "2030-05-01".to_string(),
            visit_time: "19:30".to_string(),
            ..Default::default()
        }
    }

    fn form(backend: &ScriptedBackend) -> ReservationForm<RecordingView> {
        ReservationForm::new(Box::new(backend.clone()), RecordingView::new())
    }

    #[tokio::test]
    async fn test_incomplete_form_is_not_sent() {
        let backend = ScriptedBackend::new();
        let mut form = form(&backend);
        let mut d = draft();
        d.email.clear();

        let outcome = form.submit(&d).await.unwrap();

        assert!(matches!(outcome, ReservationOutcome::Invalid(ref e) if e.len() == 1));
        assert_eq!(backend.reservation_calls(), 0);
        assert_eq!(
            form.view().reservation_errors.get(&ReservationField::Email).map(String::as_str),
            Some("Email field is empty")
        );
        assert!(form.view().busy_history.is_empty());
    }

    #[tokio::test]
    async fn test_accepted_resets_form() {
        let backend = ScriptedBackend::new();
        backend.push_reservation(Ok(ReservationReply::accepted("See you soon!")));
        let mut form = form(&backend);

        let outcome = form.submit(&draft()).await.unwrap();

        assert_eq!(outcome, ReservationOutcome::Accepted("See you soon!".to_string()));
        let view = form.view();
        assert_eq!(view.reservation_resets, 1);
        assert_eq!(view.reservation_notice.as_deref(), Some("See you soon!"));
        assert_eq!(view.busy_history, vec![true, false]);
        assert_eq!(view.submit_label, "Confirm Order");
        assert_eq!(backend.reservation_requests()[0].guests, Some(4));
    }

    #[tokio::test]
    async fn test_accepted_without_message_uses_fallback() {
        let backend = ScriptedBackend::new();
        backend.push_reservation(Ok(ReservationReply {
            success: true,
            ..Default::default()
        }));
        let mut form = form(&backend);

        let outcome = form.submit(&draft()).await.unwrap();

        assert_eq!(
            outcome,
            ReservationOutcome::Accepted(RESERVATION_ACCEPTED_FALLBACK.to_string())
        );
    }

    #[tokio::test]
    async fn test_server_field_errors_are_marked() {
        let backend = ScriptedBackend::new();
        backend.push_reservation(Ok(ReservationReply::rejected(
            "visit_date",
            &["The date cannot be in the past", "Pick another day"],
        )));
        let mut form = form(&backend);

        let outcome = form.submit(&draft()).await.unwrap();

        let ReservationOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(errors[0].field, ReservationField::VisitDate);
        let view = form.view();
        assert_eq!(
            view.reservation_errors.get(&ReservationField::VisitDate).map(String::as_str),
            Some("The date cannot be in the past, Pick another day")
        );
        assert_eq!(view.reservation_resets, 0);
        assert_eq!(view.reservation_failure, None);
        assert!(!view.submit_disabled);
    }

    #[tokio::test]
    async fn test_previous_errors_cleared_on_resubmit() {
        let backend = ScriptedBackend::new();
        backend.push_reservation(Ok(ReservationReply::rejected("phone", &["Bad phone"])));
        backend.push_reservation(Ok(ReservationReply::accepted("Booked")));
        let mut form = form(&backend);

        form.submit(&draft()).await.unwrap();
        assert!(!form.view().reservation_errors.is_empty());
        form.submit(&draft()).await.unwrap();

        assert!(form.view().reservation_errors.is_empty());
        assert_eq!(backend.reservation_calls(), 2);
    }

    #[tokio::test]
    async fn test_rejection_without_known_fields_shows_message() {
        let backend = ScriptedBackend::new();
        backend.push_reservation(Ok(ReservationReply::rejected("__all__", &["Closed"])));
        let mut form = form(&backend);

        let outcome = form.submit(&draft()).await.unwrap();

        assert_eq!(outcome, ReservationOutcome::Rejected(Vec::new()));
        assert_eq!(
            form.view().reservation_failure.as_deref(),
            Some("Please correct the errors in the form:")
        );
    }

    #[tokio::test]
    async fn test_transport_failure_restores_button() {
        let backend = ScriptedBackend::new();
        let decode = serde_json::from_str::<ReservationReply>("<html>").unwrap_err();
        backend.push_reservation(Err(CheckoutError::Decode(decode)));
        let mut form = form(&backend);

        let outcome = form.submit(&draft()).await.unwrap();

        assert_eq!(outcome, ReservationOutcome::TransportFailed);
        let view = form.view();
        assert_eq!(view.reservation_failure.as_deref(), Some(RESERVATION_SEND_FAILED));
        assert!(!view.submit_disabled);
        assert_eq!(view.submit_label, "Confirm Order");
    }
}
