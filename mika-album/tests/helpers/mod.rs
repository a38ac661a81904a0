//! Test Helper Utilities
//!
//! Shared utilities for testing mika-album

#![allow(dead_code)]

pub mod fake_catalogs;

pub use fake_catalogs::{album, attempt, record, FakePrimary, FakeSecondary};
