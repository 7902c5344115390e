//! HTTP API for managing events over a document store.
//!
//! Requests flow through the authentication gate (mutating routes and
//! get-by-id), the schema validator and the record store adapter before a
//! response is formatted:
//!
//! ```text
//! request ─► AuthLayer ─► Schema::validate ─► Collection ─► response
//! ```

pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod utils;
pub mod validation;
