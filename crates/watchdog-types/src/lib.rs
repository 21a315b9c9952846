//! Shared types, adapter traits, and core utilities for the watchdog.
//!
//! This crate holds everything that both the policy engine and the event
//! store implementations need to agree on. Keeping it separate lets adapter
//! crates depend on the contract without pulling in the engine.

pub mod error;
pub mod event_store;
pub mod identity;
pub mod identity_provider;
pub mod prelude;
pub mod types;

// vim: ts=4
