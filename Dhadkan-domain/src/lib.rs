// Dhadkan Domain
// This crate contains the business logic for the Dhadkan screening API

// Services that implement business logic
pub mod services;

// Authentication helpers (password hashing, login tokens, auth event log)
pub mod auth;

// Domain entities
pub mod entities;

// Injectable time source and timestamp formatting
pub mod clock;

// Health checks and system status
pub mod health;

// Re-export the database module from the data crate for convenience
pub use dhadkan_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
