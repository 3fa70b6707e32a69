use crate::error::CheckoutError;
use std::fmt;
use std::str::FromStr;

/// The three text inputs of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Name,
    Phone,
    Address,
}

impl DraftField {
    pub const ALL: [DraftField; 3] = [DraftField::Name, DraftField::Phone, DraftField::Address];

    /// Form field name expected by the order-creation endpoint.
    pub fn form_name(self) -> &'static str {
        match self {
            DraftField::Name => "customer_name",
            DraftField::Phone => "phone_number",
            DraftField::Address => "delivery_address",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DraftField::Name => "name",
            DraftField::Phone => "phone",
            DraftField::Address => "address",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            other => Err(CheckoutError::Validation(format!(
                "Unknown payment method: {other}"
            ))),
        }
    }
}

/// In-progress, unsubmitted order form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderDraft {
    pub customer_name: String,
    pub phone_number: String,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub agree: bool,
}

/// Result of checking a draft: which text fields are blank and whether the
/// terms were accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftCheck {
    pub blank: Vec<DraftField>,
    pub agreed: bool,
}

impl DraftCheck {
    pub fn is_valid(&self) -> bool {
        self.blank.is_empty() && self.agreed
    }

    pub fn is_blank(&self, field: DraftField) -> bool {
        self.blank.contains(&field)
    }
}

impl OrderDraft {
    pub fn value(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.customer_name,
            DraftField::Phone => &self.phone_number,
            DraftField::Address => &self.delivery_address,
        }
    }

    pub fn check(&self) -> DraftCheck {
        DraftCheck {
            blank: DraftField::ALL
                .into_iter()
                .filter(|field| self.value(*field).trim().is_empty())
                .collect(),
            agreed: self.agree,
        }
    }

    /// Body of the order-creation request, without the anti-forgery token.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields: Vec<(&'static str, String)> = DraftField::ALL
            .into_iter()
            .map(|field| (field.form_name(), self.value(field).trim().to_string()))
            .collect();
        fields.push(("payment_method", self.payment_method.as_str().to_string()));
        // The server treats any non-empty value as consent.
        fields.push(("agree", if self.agree { "true" } else { "" }.to_string()));
        fields
    }
}
