//! Integration test modules for paramlink

pub mod bridge;
pub mod scenarios;
pub mod session;
