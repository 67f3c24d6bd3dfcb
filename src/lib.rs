//! Paddock Store
//!
//! Motorsport merchandise storefront. The interesting part is the pricing
//! engine in [`domain`]: per-product sale overrides and a cart-wide bundle
//! deal are resolved into one deterministic, explainable price per line and
//! per order. Everything else is catalog/order CRUD behind [`catalog`] and
//! thin HTTP glue in [`api`].
//!
//! ## Pricing flow
//! catalog -> sale resolution (price attached per cart line) ->
//! bundle discount allocation -> order totals -> order submission.

pub mod api;
pub mod cart_store;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod error;
pub mod webhook;

pub use error::{Result, StoreError};
