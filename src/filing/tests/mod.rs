//! Unit tests for the filing lifecycle.

mod support;
