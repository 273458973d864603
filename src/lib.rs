//! Item catalog core
//!
//! The append-only item library, its key-value persistence, draft validation
//! and the lightbox carousel. The iced shell in `main.rs` drives these.

pub mod config;
pub mod state;
