//! Storefront shopping cart.
//!
//! A single-writer cart actor ([`cart_actor::CartService`]) owns the cart
//! and runs checkout against an order service. Everything else talks to it
//! through cloneable [`clients::CartClient`] handles. Product data comes from
//! the remote catalog via [`catalog::CatalogClient`].

pub mod app_system;
pub mod cart_actor;
pub mod catalog;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod domain;
pub mod presentation;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;

pub use app_system::{setup_tracing, CartSystem};
pub use cart_actor::{CartError, CartEvent};
pub use clients::CartClient;
pub use config::AppConfig;
