// ABOUTME: Requirement management module
// ABOUTME: Priorities, workflow status, and requirement storage

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use storage::RequirementStorage;
pub use types::{
    InvalidPriority, InvalidStatus, NewRequirement, Priority, Requirement, RequirementStatus,
    RequirementUpdateInput,
};
