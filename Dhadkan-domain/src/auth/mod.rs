//! Password handling and account event logging
//!
//! Login issues an opaque token that no other endpoint checks.

pub mod logging;
mod password;

pub use password::{generate_token, hash_password, verify_password, PasswordError};
