// Public entities for the Dhadkan API
// Request payloads and the response envelope shared across the HTTP boundary

// Response envelope and request conversion errors
pub mod common;

// Login payload
pub mod auth;

// Doctor registration and update payloads
pub mod doctor;

// Screening form payload
pub mod screening;
