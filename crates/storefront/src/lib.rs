//! Acadshop Storefront cart library.
//!
//! Keeps the three cart surfaces of the storefront (header badge, side cart
//! quick view, full cart sidebar) in step with the cart held by the server.
//!
//! # Architecture
//!
//! - [`api`] - typed client for the cart API (`reqwest`), behind the
//!   [`api::CartApi`] trait
//! - [`views`] - badge and cart views rendered with Askama templates
//! - [`page`] - the host page elements the surfaces write into
//! - [`sync`] - [`sync::CartSyncController`]: mutate, then reconcile every
//!   surface from the server's snapshot
//! - [`config`], [`error`], [`telemetry`] - environment config, error
//!   taxonomy, tracing and Sentry setup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod page;
pub mod sync;
pub mod telemetry;
pub mod views;
