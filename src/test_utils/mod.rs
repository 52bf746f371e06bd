//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures and event payloads
//! - In-memory implementations of the billing, provider and email ports
//! - Helper builders for constructing app state with test dependencies

mod app_state_builder;
mod billing_mocks;
mod email_mocks;
mod factories;

pub use app_state_builder::*;
pub use billing_mocks::*;
pub use email_mocks::*;
pub use factories::*;
