//! Taxflow: personal income-tax filing lifecycle.
//!
//! This crate tracks an income-tax return from draft to e-filing. It computes
//! tax under the supported regimes, routes returns to a chartered accountant
//! for review, gates approval on resolved comments, and stamps filed returns
//! with a unique acknowledgement number.
//!
//! # Architecture
//!
//! Taxflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, PostgreSQL)
//!
//! # Modules
//!
//! - [`tax`]: Bracket tables, tax assessment and regime comparison
//! - [`filing`]: Filing state machine, review workflow and e-filing
//! - [`config`]: Environment-driven configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod filing;
pub mod tax;
pub mod telemetry;
