//! HTTP layer of docserve: webhooks, homepage and documentation serving.

pub mod api;
pub mod app;
pub mod errors;
pub mod headers;
pub mod pages;
pub mod tracing;
