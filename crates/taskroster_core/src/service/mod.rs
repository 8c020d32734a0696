//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into presentation-facing operations.
//! - Keep presentation layers decoupled from GraphQL details.

pub mod sync_controller;
