//! HTTP transport for the agenda service.
//!
//! - [`config`] -- server settings read from the environment.
//! - [`state`] -- shared services handed to every handler.
//! - [`error`] -- mapping of service failures onto problem+json responses.
//! - [`middleware`] -- bearer token authentication.
//! - [`handlers`] / [`routes`] -- the REST surface under `/api`.
//! - [`sse`] -- server-sent event streams fed by the slot publisher.
//! - [`router`] -- the fully layered application router.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod sse;
pub mod state;
