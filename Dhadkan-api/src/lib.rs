// Dhadkan-api lib.rs
//
// HTTP layer of the Dhadkan screening API: router, handlers, public
// entities, configuration and the OpenAPI document.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
