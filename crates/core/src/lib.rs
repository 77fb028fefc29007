//! Domain logic for the school directory.
//!
//! Everything here is free of concrete I/O: the record store and object
//! store are reached through the traits in [`store`], so the intake and
//! browse flows can be driven by the Postgres/storage adapters in
//! production and by in-memory fakes in tests.

pub mod browse;
pub mod error;
pub mod filter;
pub mod intake;
pub mod naming;
pub mod school;
pub mod store;
pub mod types;
pub mod validation;
