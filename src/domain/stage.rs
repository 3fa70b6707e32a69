use crate::error::{CheckoutError, Result};
use std::fmt;

/// Phase of the checkout flow.
///
/// Transitions only move forward and only on server acknowledgment.
/// `Confirmed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Drafting,
    AwaitingSmsCode,
    Confirmed,
}

/// Something that happens to the flow: a user action or a server acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    SubmitOrder,
    OrderAccepted,
    SubmitCode,
    CodeAccepted,
}

impl Stage {
    /// Applies `event` and returns the resulting stage.
    ///
    /// Every `(stage, event)` pair is listed; anything not allowed is an
    /// `InvalidStage` error and the caller must leave its state untouched.
    pub fn apply(self, event: StageEvent) -> Result<Stage> {
        use Stage::*;
        use StageEvent::*;

        match (self, event) {
            (Drafting, SubmitOrder) => Ok(Drafting),
            (Drafting, OrderAccepted) => Ok(AwaitingSmsCode),
            (Drafting, SubmitCode | CodeAccepted) => Err(self.reject(event)),
            (AwaitingSmsCode, SubmitCode) => Ok(AwaitingSmsCode),
            (AwaitingSmsCode, CodeAccepted) => Ok(Confirmed),
            (AwaitingSmsCode, SubmitOrder | OrderAccepted) => Err(self.reject(event)),
            (Confirmed, SubmitOrder | OrderAccepted | SubmitCode | CodeAccepted) => {
                Err(self.reject(event))
            }
        }
    }

    pub fn permits(self, event: StageEvent) -> bool {
        self.apply(event).is_ok()
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Confirmed
    }

    fn reject(self, event: StageEvent) -> CheckoutError {
        CheckoutError::InvalidStage { stage: self, event }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Drafting => "drafting",
            Stage::AwaitingSmsCode => "awaiting SMS code",
            Stage::Confirmed => "confirmed",
        };
        f.write_str(s)
    }
}

impl fmt::Display for StageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageEvent::SubmitOrder => "submit order",
            StageEvent::OrderAccepted => "accept order",
            StageEvent::SubmitCode => "submit code",
            StageEvent::CodeAccepted => "accept code",
        };
        f.write_str(s)
    }
}
