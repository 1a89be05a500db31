use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, info_span, instrument, warn, Instrument};

use super::error::CartError;
use super::events::{CartEvent, CartListener, Listeners, SubscriptionId};
use super::messages::{CartRequest, ServiceResponse};
use crate::checkout::{CheckoutGateway, CheckoutStatus, OrderConfirmation, PendingOrder};
use crate::clients::CartClient;
use crate::domain::{Cart, CartItem, Product, ProductId};

/// Result of a checkout attempt, routed back to the actor so that only the
/// actor task ever touches the cart.
struct CheckoutCompletion {
    ordered: Vec<CartItem>,
    result: Result<OrderConfirmation, CartError>,
    respond_to: ServiceResponse<OrderConfirmation, CartError>,
}

/// Single owner of the cart.
///
/// Mutations and reads are handled in arrival order on the actor task.
/// Checkout is the only operation that waits on I/O: the gateway call runs on
/// a spawned task while the actor keeps serving requests, and the outcome is
/// applied when the completion comes back.
pub struct CartService<G: CheckoutGateway> {
    receiver: mpsc::Receiver<CartRequest>,
    completions: mpsc::UnboundedReceiver<CheckoutCompletion>,
    completion_sender: mpsc::UnboundedSender<CheckoutCompletion>,
    gateway: Arc<G>,
    checkout_timeout: Duration,
    cart: Cart,
    status: CheckoutStatus,
    listeners: Listeners,
}

impl<G: CheckoutGateway> CartService<G> {
    pub fn new(buffer_size: usize, gateway: G, checkout_timeout: Duration) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_sender, completions) = mpsc::unbounded_channel();
        let service = Self {
            receiver,
            completions,
            completion_sender,
            gateway: Arc::new(gateway),
            checkout_timeout,
            cart: Cart::new(),
            status: CheckoutStatus::Idle,
            listeners: Listeners::default(),
        };
        let client = CartClient::new(sender);
        (service, client)
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!("CartService starting");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(CartRequest::Shutdown) | None => {
                        info!("CartService shutting down");
                        break;
                    }
                    Some(msg) => self.handle_request(msg),
                },
                Some(completion) = self.completions.recv() => {
                    self.handle_checkout_completion(completion);
                }
            }
        }

        if self.status == CheckoutStatus::Submitting {
            warn!("Stopped with a checkout still pending");
        }
        info!("CartService stopped");
    }

    fn handle_request(&mut self, msg: CartRequest) {
        match msg {
            CartRequest::AddToCart { product, respond_to } => {
                self.handle_add_to_cart(product, respond_to);
            }
            CartRequest::RemoveFromCart { product_id, respond_to } => {
                self.handle_remove_from_cart(product_id, respond_to);
            }
            CartRequest::UpdateQuantity {
                product_id,
                quantity,
                respond_to,
            } => {
                self.handle_update_quantity(product_id, quantity, respond_to);
            }
            CartRequest::ClearCart { respond_to } => {
                self.handle_clear_cart(respond_to);
            }
            CartRequest::GetItems { respond_to } => {
                let _ = respond_to.send(Ok(self.cart.items().to_vec()));
            }
            CartRequest::GetTotalItems { respond_to } => {
                let _ = respond_to.send(Ok(self.cart.total_items()));
            }
            CartRequest::GetTotalPrice { respond_to } => {
                let _ = respond_to.send(Ok(self.cart.total_price()));
            }
            CartRequest::GetCheckoutStatus { respond_to } => {
                let _ = respond_to.send(Ok(self.status));
            }
            CartRequest::Checkout { respond_to } => {
                self.handle_checkout(respond_to);
            }
            CartRequest::Subscribe { listener, respond_to } => {
                self.handle_subscribe(listener, respond_to);
            }
            CartRequest::Unsubscribe { id, respond_to } => {
                let removed = self.listeners.remove(id);
                debug!(subscription_id = id, removed, "Listener unsubscribed");
                let _ = respond_to.send(Ok(removed));
            }
            // Handled by the run loop
            CartRequest::Shutdown => {}
            #[cfg(test)]
            CartRequest::GetListenerCount { respond_to } => {
                let _ = respond_to.send(Ok(self.listeners.len()));
            }
        }
    }

    #[instrument(fields(product_id = product.id), skip(self, product, respond_to))]
    fn handle_add_to_cart(&mut self, product: Product, respond_to: ServiceResponse<(), CartError>) {
        debug!("Processing add_to_cart request");

        let quantity = self.cart.add(product);
        info!(quantity, "Product added to cart");
        self.publish_change();

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    fn handle_remove_from_cart(&mut self, product_id: ProductId, respond_to: ServiceResponse<(), CartError>) {
        debug!("Processing remove_from_cart request");

        if self.cart.remove(product_id) {
            info!("Product removed from cart");
            self.publish_change();
        } else {
            debug!("Product not in cart");
        }

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_id = %product_id, quantity = %quantity), skip(self, respond_to))]
    fn handle_update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        respond_to: ServiceResponse<(), CartError>,
    ) {
        debug!("Processing update_quantity request");

        if self.cart.update_quantity(product_id, quantity) {
            info!("Cart quantity updated");
            self.publish_change();
        } else {
            debug!("Nothing to update");
        }

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_clear_cart(&mut self, respond_to: ServiceResponse<(), CartError>) {
        debug!("Processing clear_cart request");

        if self.cart.clear() {
            info!("Cart cleared");
            self.publish_change();
        }

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, listener, respond_to))]
    fn handle_subscribe(&mut self, listener: CartListener, respond_to: ServiceResponse<SubscriptionId, CartError>) {
        let id = self.listeners.add(listener);
        debug!(subscription_id = id, "Listener subscribed");
        let _ = respond_to.send(Ok(id));
    }

    /// Starts a checkout attempt.
    ///
    /// Rejects immediately, without touching any state, when the cart is
    /// empty or another attempt is still pending. Otherwise the cart is
    /// frozen into a [`PendingOrder`] and the gateway call is spawned; the
    /// spawned task owns `respond_to` until it hands it back through the
    /// completion channel.
    #[instrument(
        fields(line_count = self.cart.len(), total_items = self.cart.total_items()),
        skip(self, respond_to)
    )]
    fn handle_checkout(&mut self, respond_to: ServiceResponse<OrderConfirmation, CartError>) {
        debug!("Processing checkout request");

        if self.status == CheckoutStatus::Submitting {
            warn!("Checkout rejected: another checkout is in progress");
            let _ = respond_to.send(Err(CartError::CheckoutInProgress));
            return;
        }
        if self.cart.is_empty() {
            warn!("Checkout rejected: cart is empty");
            let _ = respond_to.send(Err(CartError::EmptyCart));
            return;
        }

        let ordered = self.cart.items().to_vec();
        let order = PendingOrder {
            items: ordered.clone(),
            total_items: self.cart.total_items(),
            total_price: self.cart.total_price(),
        };

        self.status = CheckoutStatus::Submitting;
        self.listeners.publish(&CartEvent::CheckoutStarted {
            total_items: order.total_items,
            total_price: order.total_price,
        });
        info!(total_price = order.total_price, "Checkout submitted");

        let gateway = Arc::clone(&self.gateway);
        let timeout = self.checkout_timeout;
        let completions = self.completion_sender.clone();

        tokio::spawn(
            async move {
                let result = match tokio::time::timeout(timeout, gateway.place_order(order)).await {
                    Ok(Ok(confirmation)) => Ok(confirmation),
                    Ok(Err(e)) => Err(CartError::CheckoutFailed(e.to_string())),
                    Err(_) => Err(CartError::CheckoutTimedOut(timeout)),
                };

                let completion = CheckoutCompletion {
                    ordered,
                    result,
                    respond_to,
                };
                if completions.send(completion).is_err() {
                    warn!("CartService stopped before checkout completed");
                }
            }
            .instrument(info_span!("checkout_attempt")),
        );
    }

    #[instrument(skip(self, completion))]
    fn handle_checkout_completion(&mut self, completion: CheckoutCompletion) {
        self.status = CheckoutStatus::Idle;

        match &completion.result {
            Ok(confirmation) => {
                if self.cart.settle(&completion.ordered) {
                    self.publish_change();
                }
                info!(order_id = %confirmation.order_id, "Checkout succeeded");
                self.listeners
                    .publish(&CartEvent::CheckoutSucceeded(confirmation.clone()));
            }
            Err(e) => {
                warn!(error = %e, "Checkout failed, cart left unchanged");
                self.listeners.publish(&CartEvent::CheckoutFailed {
                    reason: e.to_string(),
                    retryable: e.is_retryable(),
                });
            }
        }

        let _ = completion.respond_to.send(completion.result);
    }

    fn publish_change(&self) {
        self.listeners.publish(&CartEvent::Changed(self.cart.snapshot()));
    }
}
