//! Client configuration: where the site lives, which paths it serves and the
//! optional session credentials to start from.
//!
//! Loaded from TOML; every key has a default so an empty file is valid.

use crate::error::{CheckoutError, Result};
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Paths of the site's JSON endpoints, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub cart_update: String,
    pub cart_remove: String,
    pub update_totals: String,
    pub apply_coupon: String,
    pub checkout: String,
    pub verify_sms: String,
    pub cart_details: String,
    pub create_reservation: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cart_update: "/orders/cart/update/".to_string(),
            cart_remove: "/orders/cart/remove/".to_string(),
            update_totals: "/orders/cart/update-totals/".to_string(),
            apply_coupon: "/orders/cart/apply-coupon/".to_string(),
            checkout: "/orders/checkout/".to_string(),
            verify_sms: "/orders/verify-sms/".to_string(),
            cart_details: "/orders/cart/".to_string(),
            create_reservation: "/reservations/create-reservation/".to_string(),
        }
    }
}

impl Endpoints {
    fn all(&self) -> [(&'static str, &str); 8] {
        [
            ("cart_update", self.cart_update.as_str()),
            ("cart_remove", self.cart_remove.as_str()),
            ("update_totals", self.update_totals.as_str()),
            ("apply_coupon", self.apply_coupon.as_str()),
            ("checkout", self.checkout.as_str()),
            ("verify_sms", self.verify_sms.as_str()),
            ("cart_details", self.cart_details.as_str()),
            ("create_reservation", self.create_reservation.as_str()),
        ]
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Anti-forgery token. When absent it is scraped from the cart page.
    pub csrf_token: Option<String>,
    /// Existing server session to join, sent as the `sessionid` cookie.
    pub session_id: Option<String>,
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            csrf_token: None,
            session_id: None,
            endpoints: Endpoints::default(),
        }
    }
}

// Token and session are credentials.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| "<redacted>"))
            .field("session_id", &self.session_id.as_ref().map(|_| "<redacted>"))
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl FromStr for ClientConfig {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl ClientConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckoutError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        content.parse()
    }

    /// Replaces file values with whatever was given on the command line.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        csrf_token: Option<String>,
        session_id: Option<String>,
    ) -> Result<Self> {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if csrf_token.is_some() {
            self.csrf_token = csrf_token;
        }
        if session_id.is_some() {
            self.session_id = session_id;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.base()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CheckoutError::Config(format!(
                "base_url must be http or https, got {}",
                base.scheme()
            )));
        }
        for (name, path) in self.endpoints.all() {
            if !path.starts_with('/') {
                return Err(CheckoutError::Config(format!(
                    "endpoint {name} must start with '/', got {path:?}"
                )));
            }
        }
        if matches!(self.csrf_token.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(CheckoutError::Config("csrf_token cannot be empty".into()));
        }
        Ok(())
    }

    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| CheckoutError::Config(format!("Invalid base_url {}: {}", self.base_url, e)))
    }

    /// Absolute URL of an endpoint path.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base()?
            .join(path)
            .map_err(|e| CheckoutError::Config(format!("Invalid endpoint {path}: {e}")))
    }
}
