//! Infrastructure layer - External service implementations

pub mod logging;
pub mod observability;
pub mod participant;
pub mod rate_limit;
pub mod storage;
