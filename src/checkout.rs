//! Checkout gateway seam and the simulated order backend.
//!
//! The cart actor hands a [`PendingOrder`] to a [`CheckoutGateway`] and waits
//! for an [`OrderConfirmation`]. No payment provider is contacted: the
//! [`SimulatedGateway`] pretends to make one network round-trip and then
//! succeeds or declines according to its [`SimulatedOutcome`].

use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::CartItem;

/// Where the checkout state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CheckoutStatus {
    #[default]
    Idle,
    Submitting,
}

/// The cart contents frozen at the moment checkout began.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingOrder {
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: f64,
}

/// Receipt returned by the gateway for an accepted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub total_items: u64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Order declined: {0}")]
    Declined(String),
    #[error("Order service unavailable: {0}")]
    Unavailable(String),
}

/// Places orders on behalf of the cart actor.
///
/// Implementations run on a background task, so they must not assume they are
/// on the actor's task and must not touch the cart.
pub trait CheckoutGateway: Send + Sync + 'static {
    fn place_order(
        &self,
        order: PendingOrder,
    ) -> impl Future<Output = Result<OrderConfirmation, GatewayError>> + Send;
}

/// How the simulated backend answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulatedOutcome {
    AlwaysSucceed,
    AlwaysFail,
    /// Every Nth attempt is declined, the rest succeed.
    FailEvery(NonZeroU32),
}

impl SimulatedOutcome {
    fn accepts(&self, attempt: u64) -> bool {
        match self {
            SimulatedOutcome::AlwaysSucceed => true,
            SimulatedOutcome::AlwaysFail => false,
            SimulatedOutcome::FailEvery(n) => attempt % u64::from(n.get()) != 0,
        }
    }
}

impl fmt::Display for SimulatedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatedOutcome::AlwaysSucceed => write!(f, "succeed"),
            SimulatedOutcome::AlwaysFail => write!(f, "fail"),
            SimulatedOutcome::FailEvery(n) => write!(f, "fail-every:{}", n),
        }
    }
}

impl FromStr for SimulatedOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "succeed" => Ok(SimulatedOutcome::AlwaysSucceed),
            "fail" => Ok(SimulatedOutcome::AlwaysFail),
            other => other
                .strip_prefix("fail-every:")
                .and_then(|n| n.parse::<NonZeroU32>().ok())
                .map(SimulatedOutcome::FailEvery)
                .ok_or_else(|| format!("unknown checkout outcome: {}", other)),
        }
    }
}

/// In-process stand-in for an order service.
pub struct SimulatedGateway {
    latency: Duration,
    outcome: SimulatedOutcome,
    attempts: AtomicU64,
    next_order_id: AtomicU64,
}

impl SimulatedGateway {
    pub fn new(latency: Duration, outcome: SimulatedOutcome) -> Self {
        Self {
            latency,
            outcome,
            attempts: AtomicU64::new(0),
            next_order_id: AtomicU64::new(1),
        }
    }
}

impl CheckoutGateway for SimulatedGateway {
    #[instrument(
        name = "simulated_gateway",
        fields(total_items = order.total_items, latency_ms = self.latency.as_millis() as u64),
        skip(self, order)
    )]
    async fn place_order(&self, order: PendingOrder) -> Result<OrderConfirmation, GatewayError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        // Simulate the round-trip to the order service
        tokio::time::sleep(self.latency).await;

        if !self.outcome.accepts(attempt) {
            warn!(attempt, "Simulated order declined");
            return Err(GatewayError::Declined(format!(
                "simulated failure on attempt {}",
                attempt
            )));
        }

        let id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        let confirmation = OrderConfirmation {
            order_id: format!("order_{}", id),
            total_items: order.total_items,
            total_price: order.total_price,
        };
        info!(order_id = %confirmation.order_id, attempt, "Simulated order accepted");
        Ok(confirmation)
    }
}
