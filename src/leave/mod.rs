//! Leave-entitlement resolution and application workflow engine.

pub mod approval;
pub mod balance;
pub mod error;
pub mod history;
pub mod monetization;
pub mod registry;
pub mod store;
pub mod submit;
