//! Unit tests for the tax computation engine.
