use crate::config::ClientConfig;
use crate::domain::ack::Ack;
use crate::domain::cart::{CartItemUpdate, CartTotals};
use crate::domain::code::VerificationCode;
use crate::domain::order::OrderDraft;
use crate::domain::ports::{CartBackend, CheckoutBackend, ReservationBackend};
use crate::domain::reservation::{ReservationDraft, ReservationReply};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::cookie::Jar;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const CSRF_FIELD: &str = "csrfmiddlewaretoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Where the anti-forgery token travels on a given endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenPlacement {
    FormField,
    Header,
}

/// Talks to the restaurant site over HTTP.
///
/// Keeps a cookie jar so the server-side session (cart, pending order) spans
/// calls. Bodies are decoded as JSON whatever the status code; anything that
/// does not decode is a transport failure. No timeout and no retry: each call
/// is one request.
pub struct HttpBackend {
    http: reqwest::Client,
    config: ClientConfig,
    csrf_token: OnceCell<String>,
    scraper: TokenScraper,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = config.base()?;
        let jar = Arc::new(Jar::default());
        if let Some(session_id) = &config.session_id {
            jar.add_cookie_str(&format!("sessionid={session_id}"), &base);
        }
        if let Some(token) = &config.csrf_token {
            jar.add_cookie_str(&format!("csrftoken={token}"), &base);
        }

        let http = reqwest::Client::builder().cookie_provider(jar).build()?;
        Ok(Self {
            http,
            csrf_token: OnceCell::new_with(config.csrf_token.clone()),
            config,
            scraper: TokenScraper::new()?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The anti-forgery token, fetched from the cart page on first use unless
    /// one was configured. Only mutating requests need it, so nothing goes
    /// over the network before the first of those.
    pub async fn csrf_token(&self) -> Result<&str> {
        self.csrf_token
            .get_or_try_init(|| self.fetch_csrf_token())
            .await
            .map(String::as_str)
    }

    // Loading the page also sets the session and csrftoken cookies.
    async fn fetch_csrf_token(&self) -> Result<String> {
        let url = self.config.url(&self.config.endpoints.cart_details)?;
        debug!(%url, "fetching anti-forgery token");
        let page = self.http.get(url).send().await?.text().await?;

        let token = self.scraper.extract(&page).ok_or_else(|| {
            CheckoutError::Config("No anti-forgery token found on the cart page".into())
        })?;
        info!("anti-forgery token acquired");
        Ok(token)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        mut form: Vec<(&str, String)>,
        placement: TokenPlacement,
    ) -> Result<T> {
        let token = self.csrf_token().await?;
        let url = self.config.url(path)?;
        debug!(%url, fields = form.len(), "POST");

        let mut request = self.http.post(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        match placement {
            TokenPlacement::FormField => form.push((CSRF_FIELD, token.to_string())),
            TokenPlacement::Header => request = request.header(CSRF_HEADER, token),
        }
        if !form.is_empty() {
            request = request.form(&form);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(path, status = status.as_u16(), bytes = body.len(), "response");

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CheckoutBackend for HttpBackend {
    async fn create_order(&self, draft: &OrderDraft) -> Result<Ack> {
        self.post(
            &self.config.endpoints.checkout,
            &[],
            draft.form_fields(),
            TokenPlacement::FormField,
        )
        .await
    }

    async fn verify_sms(&self, code: &VerificationCode) -> Result<Ack> {
        self.post(
            &self.config.endpoints.verify_sms,
            &[],
            vec![("sms_code", code.as_str().to_string())],
            TokenPlacement::Header,
        )
        .await
    }
}

#[async_trait]
impl CartBackend for HttpBackend {
    async fn update_quantity(&self, dish_id: &str, quantity: u32) -> Result<CartItemUpdate> {
        self.post(
            &self.config.endpoints.cart_update,
            &[],
            vec![
                ("dish_id", dish_id.to_string()),
                ("quantity", quantity.to_string()),
            ],
            TokenPlacement::FormField,
        )
        .await
    }

    async fn remove_item(&self, dish_id: &str) -> Result<CartItemUpdate> {
        self.post(
            &self.config.endpoints.cart_remove,
            &[("dish_id", dish_id)],
            vec![
                ("dish_id", dish_id.to_string()),
                ("action", "remove".to_string()),
            ],
            TokenPlacement::FormField,
        )
        .await
    }

    async fn apply_coupon(&self, coupon_code: &str) -> Result<Ack> {
        self.post(
            &self.config.endpoints.apply_coupon,
            &[],
            vec![("coupon_code", coupon_code.to_string())],
            TokenPlacement::FormField,
        )
        .await
    }

    async fn totals(&self) -> Result<CartTotals> {
        self.post(
            &self.config.endpoints.update_totals,
            &[],
            Vec::new(),
            TokenPlacement::Header,
        )
        .await
    }
}

#[async_trait]
impl ReservationBackend for HttpBackend {
    async fn create_reservation(&self, draft: &ReservationDraft) -> Result<ReservationReply> {
        self.post(
            &self.config.endpoints.create_reservation,
            &[],
            draft.form_fields(),
            TokenPlacement::Header,
        )
        .await
    }
}

/// Finds the `csrfmiddlewaretoken` hidden input in an HTML page.
///
/// Tags are matched whole, quoted attribute values included, so a `>` inside
/// a value does not end the tag. Attributes are read by exact name:
/// `data-value` is not `value`.
pub struct TokenScraper {
    input: Regex,
    attr: Regex,
}

impl TokenScraper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            input: Regex::new(r#"(?i)<input\b(?:[^>"']|"[^"]*"|'[^']*')*>"#)?,
            attr: Regex::new(
                r#"(?:^|\s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
            )?,
        })
    }

    pub fn extract(&self, html: &str) -> Option<String> {
        self.input
            .find_iter(html)
            .find_map(|tag| self.token_in(tag.as_str()))
    }

    fn token_in(&self, tag: &str) -> Option<String> {
        let mut name = None;
        let mut value = None;
        for caps in self.attr.captures_iter(tag) {
            let attr = caps.get(1)?.as_str();
            let text = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            if attr.eq_ignore_ascii_case("name") {
                name = Some(text);
            } else if attr.eq_ignore_ascii_case("value") {
                value = Some(text);
            }
        }
        if name? != CSRF_FIELD {
            return None;
        }
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}
