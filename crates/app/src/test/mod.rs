//! Shared fixtures for service tests.

mod db;

pub(crate) use context::{TEST_JWT_SECRET, TEST_PASSWORD, TestContext};
