//! Request handler module
//!
//! Responsible for request routing dispatch and endpoint logic.

mod endpoints;
mod fizzbuzz;
pub mod router;
mod types;

// Re-export main entry point
pub use router::handle_request;
