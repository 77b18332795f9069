//! Acadshop Core - Shared types library.
//!
//! This crate provides common types used across all Acadshop components:
//! - `storefront` - Browser-side cart surfaces (badge, side cart, sidebar)
//! - `cli` - Command-line driver for the cart surfaces
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, BRL price display, and quantity input clamping

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
