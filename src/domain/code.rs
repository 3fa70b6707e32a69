use crate::error::CheckoutError;

pub const INVALID_CODE_FORMAT: &str = "Please enter a valid 4-digit code";

const CODE_LEN: usize = 4;

/// A 4-digit SMS verification code.
///
/// Only constructible from input that is exactly four ASCII digits after
/// trimming surrounding whitespace.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn parse(raw: &str) -> Result<Self, CheckoutError> {
        let code = raw.trim();
        if code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err(CheckoutError::Validation(INVALID_CODE_FORMAT.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Codes are secrets; keep them out of logs.
impl std::fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VerificationCode(****)")
    }
}

impl TryFrom<&str> for VerificationCode {
    type Error = CheckoutError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
