use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Party sizes the booking form offers. `8` stands for "more than 6".
pub const GUEST_CHOICES: [u8; 7] = [1, 2, 3, 4, 5, 6, 8];

/// Inputs of the table booking form, named as the server names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReservationField {
    Name,
    Email,
    Phone,
    Guests,
    VisitDate,
    VisitTime,
    SpecialRequest,
    Captcha,
}

impl ReservationField {
    pub const ALL: [ReservationField; 8] = [
        ReservationField::Name,
        ReservationField::Email,
        ReservationField::Phone,
        ReservationField::Guests,
        ReservationField::VisitDate,
        ReservationField::VisitTime,
        ReservationField::SpecialRequest,
        ReservationField::Captcha,
    ];

    pub fn form_name(self) -> &'static str {
        match self {
            ReservationField::Name => "name",
            ReservationField::Email => "email",
            ReservationField::Phone => "phone",
            ReservationField::Guests => "guests",
            ReservationField::VisitDate => "visit_date",
            ReservationField::VisitTime => "visit_time",
            ReservationField::SpecialRequest => "special_request",
            ReservationField::Captcha => "captcha",
        }
    }

    pub fn from_form_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.form_name() == name)
    }

    // Same wording the server uses for its `required` errors.
    fn required_message(self) -> Option<&'static str> {
        match self {
            ReservationField::Name => Some("Your Name field is empty"),
            ReservationField::Email => Some("Email field is empty"),
            ReservationField::Phone => Some("Phone field is empty"),
            ReservationField::Guests => Some("Select the number of guests"),
            ReservationField::VisitDate => Some("Select the date"),
            ReservationField::VisitTime => Some("Select the time"),
            ReservationField::SpecialRequest | ReservationField::Captcha => None,
        }
    }
}

impl fmt::Display for ReservationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

/// A message to show under one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: ReservationField,
    pub message: String,
}

/// What the user typed into the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub guests: Option<u8>,
    /// `YYYY-MM-DD`
    pub visit_date: String,
    /// `HH:MM`, 24-hour
    pub visit_time: String,
    pub special_request: String,
    /// reCAPTCHA response token, when the site asks for one.
    pub captcha: Option<String>,
}

impl ReservationDraft {
    /// Required inputs that are blank, or a party size the form does not
    /// offer. Format checks (email, phone, past dates) stay with the server.
    pub fn check(&self) -> Vec<FieldError> {
        ReservationField::ALL
            .into_iter()
            .filter(|field| self.is_missing(*field))
            .filter_map(|field| {
                field.required_message().map(|message| FieldError {
                    field,
                    message: message.to_string(),
                })
            })
            .collect()
    }

    fn is_missing(&self, field: ReservationField) -> bool {
        match field {
            ReservationField::Name => self.name.trim().is_empty(),
            ReservationField::Email => self.email.trim().is_empty(),
            ReservationField::Phone => self.phone.trim().is_empty(),
            ReservationField::Guests => {
                !matches!(self.guests, Some(g) if GUEST_CHOICES.contains(&g))
            }
            ReservationField::VisitDate => self.visit_date.trim().is_empty(),
            ReservationField::VisitTime => self.visit_time.trim().is_empty(),
            ReservationField::SpecialRequest | ReservationField::Captcha => false,
        }
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.trim().to_string()),
            ("email", self.email.trim().to_string()),
            ("phone", self.phone.trim().to_string()),
            (
                "guests",
                self.guests.map(|g| g.to_string()).unwrap_or_default(),
            ),
            ("visit_date", self.visit_date.trim().to_string()),
            ("visit_time", self.visit_time.trim().to_string()),
            ("special_request", self.special_request.trim().to_string()),
        ];
        if let Some(captcha) = &self.captcha {
            fields.push(("g-recaptcha-response", captcha.clone()));
        }
        fields
    }
}

/// Response of the booking endpoint. On rejection `errors` maps form field
/// names to the server's messages for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReservationReply {
    pub success: bool,
    pub message: Option<String>,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ReservationReply {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            errors: BTreeMap::new(),
        }
    }

    /// Rejection carrying the messages for a single field.
    pub fn rejected(field: &str, messages: &[&str]) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(
            field.to_string(),
            messages.iter().map(|m| m.to_string()).collect(),
        );
        Self {
            success: false,
            message: Some("Please correct the errors in the form:".to_string()),
            errors,
        }
    }

    /// One entry per known field, its messages joined with `", "`. Keys the
    /// form has no input for (such as `__all__`) are dropped.
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.errors
            .iter()
            .filter_map(|(name, messages)| {
                let field = ReservationField::from_form_name(name)?;
                Some(FieldError {
                    field,
                    message: messages.join(", "),
                })
            })
            .collect()
    }
}
