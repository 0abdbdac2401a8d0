//! Time Trial Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the map and
//! player contexts depend on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod repository;
