// ABOUTME: Authentication primitives for Reqtrack
// ABOUTME: Password hashing and opaque bearer session tokens

pub mod passwords;
pub mod sessions;
pub mod types;

pub use passwords::{hash_password, verify_password, PasswordError};
pub use sessions::SessionStorage;
pub use types::{Session, SessionGeneration};
