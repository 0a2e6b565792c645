// ABOUTME: User account management module
// ABOUTME: Roles, account status, and user storage

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use storage::UserStorage;
pub use types::{AccountStatus, InvalidRole, LoginRecord, NewUser, Role, User};
