//! The cart store: a single-writer actor that owns the cart, publishes
//! change events, and runs the checkout state machine.

pub mod error;
pub mod events;
pub mod messages;
pub mod service;

pub use error::*;
pub use events::{CartEvent, CartListener, SubscriptionId};
pub use messages::*;
pub use service::CartService;
