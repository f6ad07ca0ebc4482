// Dhadkan Data
// This crate owns the SQLite schema and every query the API runs

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
