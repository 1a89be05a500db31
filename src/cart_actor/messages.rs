use tokio::sync::oneshot;

use super::error::CartError;
use super::events::{CartListener, SubscriptionId};
use crate::checkout::{CheckoutStatus, OrderConfirmation};
use crate::domain::{CartItem, Product, ProductId};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for the cart actor. Each variant includes parameters
/// and a oneshot channel for the response.
#[derive(Debug)]
pub enum CartRequest {
    AddToCart {
        product: Product,
        respond_to: ServiceResponse<(), CartError>,
    },
    RemoveFromCart {
        product_id: ProductId,
        respond_to: ServiceResponse<(), CartError>,
    },
    UpdateQuantity {
        product_id: ProductId,
        quantity: i64,
        respond_to: ServiceResponse<(), CartError>,
    },
    ClearCart {
        respond_to: ServiceResponse<(), CartError>,
    },
    GetItems {
        respond_to: ServiceResponse<Vec<CartItem>, CartError>,
    },
    GetTotalItems {
        respond_to: ServiceResponse<u64, CartError>,
    },
    GetTotalPrice {
        respond_to: ServiceResponse<f64, CartError>,
    },
    GetCheckoutStatus {
        respond_to: ServiceResponse<CheckoutStatus, CartError>,
    },
    Checkout {
        respond_to: ServiceResponse<OrderConfirmation, CartError>,
    },
    Subscribe {
        listener: CartListener,
        respond_to: ServiceResponse<SubscriptionId, CartError>,
    },
    Unsubscribe {
        id: SubscriptionId,
        respond_to: ServiceResponse<bool, CartError>,
    },
    Shutdown,
    #[cfg(test)]
    GetListenerCount {
        respond_to: ServiceResponse<usize, CartError>,
    },
}
