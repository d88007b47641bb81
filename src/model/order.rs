//! Represents a placed order.
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
//! Orders are created from a [`CheckoutRequest`]; the checkout form is
//! validated and the totals are computed once, at creation.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;

/// Flat fee added to every order, in cents.
pub const DELIVERY_FEE_CENTS: u32 = 500;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Formats cents as dollars, e.g. `2448` -> `$24.48`.
pub fn format_cents(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: u32,
}

impl CartItem {
    pub fn new(name: impl Into<String>, quantity: u32, unit_price_cents: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price_cents,
        }
    }

    /// `None` when the line total does not fit in a `u32`.
    pub fn line_total_cents(&self) -> Option<u32> {
        self.quantity.checked_mul(self.unit_price_cents)
    }
}

/// Sum of `quantity × unit price` over the cart, `None` on overflow.
pub fn subtotal_cents(items: &[CartItem]) -> Option<u32> {
    items
        .iter()
        .try_fold(0u32, |sum, item| sum.checked_add(item.line_total_cents()?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    PayPal,
    ApplePay,
}

impl std::str::FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "paypal" => Ok(PaymentMethod::PayPal),
            "applepay" => Ok(PaymentMethod::ApplePay),
            other => Err(CheckoutError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Fields collected by the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub payment_method: PaymentMethod,
    pub promo_code: Option<String>,
}

/// A checkout form after validation, with fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Display for DeliveryDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {} {}", self.address, self.city, self.state, self.zip)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Please enter a valid street address.")]
    InvalidAddress,
    #[error("Please enter a valid city.")]
    InvalidCity,
    #[error("Please enter a valid state.")]
    InvalidState,
    #[error("Please enter a valid ZIP code.")]
    InvalidZip,
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Quantity for {0} must be at least 1")]
    InvalidQuantity(String),
    #[error("Order total is too large")]
    TotalTooLarge,
}

// `ddddd` or `ddddd-dddd`, nothing around it
fn is_valid_zip(zip: &str) -> bool {
    let all_digits = |part: &str, len: usize| {
        part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
    };
    match zip.split_once('-') {
        None => all_digits(zip, 5),
        Some((head, tail)) => all_digits(head, 5) && all_digits(tail, 4),
    }
}

impl CheckoutForm {
    /// Lengths are counted on the fields as entered; the stored details are trimmed.
    pub fn validate(&self) -> Result<DeliveryDetails, CheckoutError> {
        if self.address.chars().count() < 10 {
            return Err(CheckoutError::InvalidAddress);
        }
        if self.city.chars().count() < 2 {
            return Err(CheckoutError::InvalidCity);
        }
        if self.state.chars().count() < 2 {
            return Err(CheckoutError::InvalidState);
        }
        if !is_valid_zip(&self.zip) {
            return Err(CheckoutError::InvalidZip);
        }

        Ok(DeliveryDetails {
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip: self.zip.clone(),
        })
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub restaurant: String,
    pub items: Vec<CartItem>,
    pub form: CheckoutForm,
    pub estimated_delivery: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub restaurant: String,
    pub items: Vec<CartItem>,
    pub delivery: DeliveryDetails,
    pub payment_method: PaymentMethod,
    pub promo_code: Option<String>,
    pub subtotal_cents: u32,
    pub delivery_fee_cents: u32,
    pub total_cents: u32,
    pub estimated_delivery: String,
}

impl Order {
    /// Validates `request` and prices the cart.
    pub fn place(id: OrderId, request: CheckoutRequest) -> Result<Self, CheckoutError> {
        if request.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if let Some(item) = request.items.iter().find(|item| item.quantity == 0) {
            return Err(CheckoutError::InvalidQuantity(item.name.clone()));
        }
        let delivery = request.form.validate()?;

        let subtotal_cents =
            subtotal_cents(&request.items).ok_or(CheckoutError::TotalTooLarge)?;
        let total_cents = subtotal_cents
            .checked_add(DELIVERY_FEE_CENTS)
            .ok_or(CheckoutError::TotalTooLarge)?;
        let promo_code = request
            .form
            .promo_code
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        Ok(Self {
            id,
            restaurant: request.restaurant,
            items: request.items,
            delivery,
            payment_method: request.form.payment_method,
            promo_code,
            subtotal_cents,
            delivery_fee_cents: DELIVERY_FEE_CENTS,
            total_cents,
            estimated_delivery: request.estimated_delivery,
        })
    }
}
