//! Shared fixtures and assertion helpers for the integration tests.

pub mod grammar_fixtures;
pub mod parse_assertions;
