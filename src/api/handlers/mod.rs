//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Registration and login.
pub mod auth;
/// Liveness check.
pub mod health;
/// Profile handlers for the authenticated caller.
pub mod users;
