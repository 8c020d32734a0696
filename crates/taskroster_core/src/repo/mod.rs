//! Repository layer over the GraphQL backend.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Keep GraphQL documents and envelope decoding out of the sync service.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`MissingData`, `GraphQl`) in
//!   addition to transport errors.
//! - List results keep server order.

pub mod error;
pub mod graphql_repo;
pub mod person_repo;
pub mod task_repo;
