//! This module contains the API endpoints for the server.
pub mod docs;
pub mod home;
pub mod hooks;
pub mod routes;
pub mod state;
