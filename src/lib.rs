//! Bookshelf application library
//!
//! Hosts the project modules that plug into the bookshelf kernel.

pub mod modules;

pub use modules::*;
