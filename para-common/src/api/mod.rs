//! Shared API-boundary types
//!
//! Pure validation logic only; HTTP-framework glue lives in the service
//! crate.

pub mod auth;
