//! This module contains all the sqlx structs for the database tables.

/// sqlx structs for build_job table.
pub mod build_job;
/// sqlx structs for imported_file table.
pub mod imported_file;
/// sqlx structs for project table.
pub mod project;
/// sqlx structs for version table.
pub mod version;
