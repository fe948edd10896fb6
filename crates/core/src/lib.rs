//! Shopfront Core - Shared types library.
//!
//! This crate provides the types shared by every Shopfront component:
//! - `storefront` - Server-rendered shop front over the remote commerce API
//! - `cli` - Terminal client for the same API
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. The remote API owns every cart, product and order; the types
//! here only describe what the client sends and checks before sending.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, phone numbers, quantities and prices
//! - [`order`] - Checkout form validation and the order draft it produces

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod order;
pub mod types;

pub use order::{Field, OrderDraft, OrderForm, Recipient, ValidationErrors};
pub use types::*;
