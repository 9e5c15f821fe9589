//! Adapter implementations for filing lifecycle ports.

pub mod memory;
pub mod postgres;
