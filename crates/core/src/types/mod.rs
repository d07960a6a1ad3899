//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::Cart;
pub use id::*;
pub use product::{CartItem, Price, Product, Stock};
