//! # Mock Framework
//!
//! Utilities for testing code that talks to the cart without running the
//! cart actor.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then use the
//! `expect_*` helpers to pull the next request off the receiver and answer it.

use tokio::sync::mpsc;

use crate::cart_actor::{CartError, CartRequest, ServiceResponse};
use crate::checkout::OrderConfirmation;
use crate::clients::CartClient;
use crate::domain::Product;

/// Creates a client whose requests land on the returned receiver.
///
/// The test plays the actor: it decides what each request answers, and when,
/// so failures and slow responses are deterministic.
pub fn create_mock_client(buffer_size: usize) -> (CartClient, mpsc::Receiver<CartRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CartClient::new(sender), receiver)
}

/// Next message must be a Checkout request.
pub async fn expect_checkout(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<ServiceResponse<OrderConfirmation, CartError>> {
    match receiver.recv().await {
        Some(CartRequest::Checkout { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Next message must be an AddToCart request.
pub async fn expect_add_to_cart(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<(Product, ServiceResponse<(), CartError>)> {
    match receiver.recv().await {
        Some(CartRequest::AddToCart {
            product,
            respond_to,
        }) => Some((product, respond_to)),
        _ => None,
    }
}

pub async fn expect_get_total_items(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<ServiceResponse<u64, CartError>> {
    match receiver.recv().await {
        Some(CartRequest::GetTotalItems { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub async fn expect_get_total_price(
    receiver: &mut mpsc::Receiver<CartRequest>,
) -> Option<ServiceResponse<f64, CartError>> {
    match receiver.recv().await {
        Some(CartRequest::GetTotalPrice { respond_to }) => Some(respond_to),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let add_task = tokio::spawn(async move {
            client
                .add_to_cart(Product::new(7, "Lamp", 35.0))
                .await
        });

        let (product, responder) = expect_add_to_cart(&mut receiver)
            .await
            .expect("Expected AddToCart request");
        assert_eq!(product.id, 7);
        responder.send(Ok(())).unwrap();

        assert_eq!(add_task.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_dropped_responder_is_communication_error() {
        let (client, mut receiver) = create_mock_client(10);

        let task = tokio::spawn(async move { client.total_items().await });
        let responder = expect_get_total_items(&mut receiver)
            .await
            .expect("Expected GetTotalItems request");
        drop(responder);

        assert!(matches!(
            task.await.unwrap(),
            Err(CartError::ActorCommunicationError(_))
        ));
    }
}
