use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::cart_actor::{CartError, CartEvent, CartListener, CartRequest, SubscriptionId};
use crate::checkout::{CheckoutStatus, OrderConfirmation};
use crate::domain::{CartItem, Product, ProductId};

/// Handle to the cart actor. Cheap to clone; every clone talks to the same
/// cart.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    /// Registers `listener` to be called after every committed change and on
    /// each checkout transition.
    #[instrument(skip(self, listener))]
    pub async fn subscribe<F>(&self, listener: F) -> Result<SubscriptionId, CartError>
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::Subscribe {
                listener: CartListener::new(listener),
                respond_to,
            })
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(
    /// Adds one unit of `product`, or bumps the quantity if it is already in the cart.
    CartClient => fn add_to_cart(product: Product) -> () as CartRequest::AddToCart, Error = CartError
);
client_method!(
    /// Removes the product's line. Absent products are ignored.
    CartClient => fn remove_from_cart(product_id: ProductId) -> () as CartRequest::RemoveFromCart, Error = CartError
);
client_method!(
    /// Sets a line's quantity; zero or negative removes the line.
    CartClient => fn update_quantity(product_id: ProductId, quantity: i64) -> () as CartRequest::UpdateQuantity, Error = CartError
);
client_method!(CartClient => fn clear_cart() -> () as CartRequest::ClearCart, Error = CartError);
client_method!(CartClient => fn items() -> Vec<CartItem> as CartRequest::GetItems, Error = CartError);
client_method!(CartClient => fn total_items() -> u64 as CartRequest::GetTotalItems, Error = CartError);
client_method!(CartClient => fn total_price() -> f64 as CartRequest::GetTotalPrice, Error = CartError);
client_method!(CartClient => fn checkout_status() -> CheckoutStatus as CartRequest::GetCheckoutStatus, Error = CartError);
client_method!(
    /// Places an order for the current cart contents.
    ///
    /// Resolves once the attempt finishes. On success the ordered items have
    /// been removed from the cart; on any error the cart is unchanged.
    CartClient => fn checkout() -> OrderConfirmation as CartRequest::Checkout, Error = CartError
);
client_method!(CartClient => fn unsubscribe(id: SubscriptionId) -> bool as CartRequest::Unsubscribe, Error = CartError);

// Test-only method for internal state inspection
#[cfg(test)]
client_method!(CartClient => fn listener_count() -> usize as CartRequest::GetListenerCount, Error = CartError);
