//! Test doubles and helpers shared by the workspace's integration tests.

pub mod generator;
pub mod pool;
pub mod router;
