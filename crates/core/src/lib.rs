//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types shared by every RocketShoes component:
//! - `cart` - Cart store, catalog client and storage adapters
//! - `cli` - Command-line front end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients, no storage access. Every cart mutation is computed here
//! as a new [`Cart`] value; committing it is the caller's job.
//!
//! # Modules
//!
//! - [`types`] - Product ids, catalog records, stock and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
