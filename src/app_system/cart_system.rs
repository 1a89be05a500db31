use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::cart_actor::{CartError, CartService};
use crate::checkout::{CheckoutGateway, SimulatedGateway};
use crate::clients::CartClient;
use crate::config::AppConfig;

/// Owns the running cart actor.
///
/// There is exactly one cart per `CartSystem`; whatever owns the UI or the
/// request scope constructs it, hands out clones of `cart_client`, and calls
/// [`CartSystem::shutdown`] when done. Must be constructed inside a tokio
/// runtime.
pub struct CartSystem {
    pub cart_client: CartClient,
    handles: Vec<JoinHandle<()>>,
}

impl CartSystem {
    /// Starts the cart actor with the given checkout gateway.
    #[instrument(name = "cart_system", skip(config, gateway))]
    pub fn new<G: CheckoutGateway>(config: &AppConfig, gateway: G) -> Self {
        info!("Starting cart system");

        let (cart_service, cart_client) =
            CartService::new(config.cart_buffer_size, gateway, config.checkout_timeout());
        let handles = vec![tokio::spawn(cart_service.run())];

        info!("Cart system started successfully");
        Self {
            cart_client,
            handles,
        }
    }

    /// Starts the cart actor backed by the simulated order service.
    pub fn simulated(config: &AppConfig) -> Self {
        let gateway = SimulatedGateway::new(config.checkout_latency(), config.checkout_outcome);
        Self::new(config, gateway)
    }

    /// Stops the cart actor and waits for it to finish.
    ///
    /// Errors while stopping are logged; shutdown always runs to completion.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), CartError> {
        info!("Shutting down cart system");

        if let Err(e) = self.cart_client.shutdown().await {
            error!(error = %e, "Cart service already stopped");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
            }
        }

        info!("Cart system shutdown complete");
        Ok(())
    }
}
