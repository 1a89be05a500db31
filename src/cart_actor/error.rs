use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during cart operations.
///
/// Removing or updating a product that is not in the cart is not an error;
/// those calls are silent no-ops.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cannot check out an empty cart")]
    EmptyCart,
    #[error("A checkout is already in progress")]
    CheckoutInProgress,
    #[error("Checkout failed: {0}")]
    CheckoutFailed(String),
    #[error("Checkout timed out after {0:?}")]
    CheckoutTimedOut(Duration),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl CartError {
    /// Whether calling `checkout` again may succeed without changing the cart.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CartError::CheckoutFailed(_) | CartError::CheckoutTimedOut(_)
        )
    }

    /// Rejected before anything was attempted; the cart is unchanged.
    pub fn is_precondition(&self) -> bool {
        matches!(self, CartError::EmptyCart | CartError::CheckoutInProgress)
    }
}
