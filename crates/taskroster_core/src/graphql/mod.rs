//! GraphQL-over-HTTP transport and wire contract.
//!
//! # Responsibility
//! - Send fixed query/mutation documents with the application header.
//! - Decode response envelopes into explicit typed records.
//!
//! # Invariants
//! - Every request goes to the network; nothing is cached.
//! - A response without `data` is never dereferenced.

pub mod documents;
pub mod error;
pub mod transport;
pub mod wire;

pub use error::{TransportError, TransportResult};
pub use transport::{GraphQlTransport, HttpTransport, APPLICATION_ID_HEADER};
pub use wire::{ErrorLocation, GraphQlError, GraphQlRequest, GraphQlResponse};
