//! # Userhub API Server Library
//!
//! This library provides the HTTP layer of the userhub service: user CRUD
//! and avatar upload over a PostgreSQL `users` table.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `logging`: Structured log initialisation
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
