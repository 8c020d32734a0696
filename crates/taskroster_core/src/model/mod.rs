//! Domain records mirrored from the GraphQL backend.
//!
//! # Responsibility
//! - Define the client-side shape of people and tasks.
//! - Own the name validation rule shared by every write path.
//!
//! # Invariants
//! - Identifiers are opaque server-assigned strings; the client never mints one.
//! - Records are replaced wholesale on reload, never patched in place.

pub mod name;
pub mod person;
pub mod task;
