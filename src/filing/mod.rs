//! Filing lifecycle engine.
//!
//! A filing moves from `draft` through optional reviewer routing, comments,
//! and approval to a terminal `filed` state with an acknowledgement number.
//! The module follows hexagonal architecture:
//!
//! - Domain types and the transition function in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
