//! Resolution of webhook branches to versions and of doc URLs to build artifacts.

pub mod docs;
pub mod version;
