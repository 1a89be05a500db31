//! Helpers for whatever renders the cart.
//!
//! Nothing here holds state. Display surfaces read aggregates through
//! [`CartSummary`], format money with [`format_price`], and drive checkout
//! feedback from the store's result with [`checkout_with_feedback`].

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::cart_actor::CartError;
use crate::checkout::OrderConfirmation;
use crate::clients::CartClient;

/// What the user should be told about a checkout attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutFeedback {
    Processing,
    Succeeded { order_id: String, message: String },
    Failed { message: String, retryable: bool },
}

impl CheckoutFeedback {
    fn from_result(result: &Result<OrderConfirmation, CartError>) -> Self {
        match result {
            Ok(confirmation) => CheckoutFeedback::Succeeded {
                order_id: confirmation.order_id.clone(),
                message: format!(
                    "Order {} placed: {} item(s), {}",
                    confirmation.order_id,
                    confirmation.total_items,
                    format_price(confirmation.total_price)
                ),
            },
            Err(e) => CheckoutFeedback::Failed {
                message: failure_message(e),
                retryable: e.is_retryable(),
            },
        }
    }
}

fn failure_message(error: &CartError) -> String {
    match error {
        CartError::EmptyCart => "Your cart is empty".to_string(),
        CartError::CheckoutInProgress => "Your order is already being placed".to_string(),
        CartError::CheckoutFailed(_) | CartError::CheckoutTimedOut(_) => {
            "Checkout failed. Please try again".to_string()
        }
        CartError::ActorCommunicationError(_) => "The cart is unavailable".to_string(),
    }
}

/// Runs a checkout and reports its progress through `notify`.
///
/// `notify` sees `Processing` first and then exactly one terminal feedback.
/// The store's result is returned unchanged so callers can decide what to do
/// next (navigate away, offer a retry).
#[instrument(skip(client, notify))]
pub async fn checkout_with_feedback<F>(
    client: &CartClient,
    mut notify: F,
) -> Result<OrderConfirmation, CartError>
where
    F: FnMut(CheckoutFeedback),
{
    notify(CheckoutFeedback::Processing);

    let result = client.checkout().await;
    match &result {
        Ok(confirmation) => info!(order_id = %confirmation.order_id, "Checkout completed"),
        Err(e) => warn!(error = %e, "Checkout did not complete"),
    }

    notify(CheckoutFeedback::from_result(&result));
    result
}

/// Aggregates shown next to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartSummary {
    pub item_count: u64,
    pub subtotal: f64,
}

impl CartSummary {
    pub async fn load(client: &CartClient) -> Result<Self, CartError> {
        Ok(Self {
            item_count: client.total_items().await?,
            subtotal: client.total_price().await?,
        })
    }

    pub fn subtotal_display(&self) -> String {
        format_price(self.subtotal)
    }
}

/// Rounds to cents for display. Stored totals keep full precision.
pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Badge text for the header cart link, hidden when the cart is empty.
pub fn cart_badge(total_items: u64) -> Option<String> {
    (total_items > 0).then(|| total_items.to_string())
}
