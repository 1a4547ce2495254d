//! Agenda domain model.
//!
//! This crate has zero internal deps so it can be shared by the repository,
//! publisher, service and transport layers alike.
//!
//! - [`domain`] -- users, tokens, events, time slots and participants.
//! - [`error`] -- the closed sets of domain failures returned by services.
//! - [`config`] -- token and password policy knobs.
//! - [`clock`] -- injectable time source.
//! - [`password`] / [`token`] -- credential hashing primitives.

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod password;
pub mod token;
pub mod types;
