//! Shared infrastructure for service tests that run against PostgreSQL.

mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
