//! # Userhub Shared Library
//!
//! This crate contains the data layer used by the userhub API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migrations
//! - `models`: The `User` data model
//! - `repository`: User persistence contract and its implementations
//! - `storage`: Local file store for uploaded avatars

pub mod db;
pub mod models;
pub mod repository;
pub mod storage;

/// Current version of the userhub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
