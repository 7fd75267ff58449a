//! service-core: Shared infrastructure for the pdf-service workspace.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
