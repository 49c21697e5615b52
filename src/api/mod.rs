//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Fiet, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::docs`](crate::api::docs) - OpenAPI document
//!
//! # API Endpoints
//!
//! ## Public (`/api/v1`)
//! - `GET /api/v1/ping` - Liveness check
//! - `POST /api/v1/register` - Register new user
//! - `POST /api/v1/login` - Login and receive JWT token
//!
//! ## Protected (`/api/v1`)
//! - `GET /api/v1/users` - List users
//! - `GET /api/v1/user` - Caller's profile
//! - `PATCH /api/v1/user` - Update `name`, `age`, `email`
//! - `DELETE /api/v1/user` - Delete caller's account
//! - `PUT /api/v1/user/password` - Change password
//!
//! # Authentication
//!
//! Protected endpoints require a valid JWT token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! The document is served at `/api-docs/openapi.json`. With the `swagger-ui`
//! feature, interactive documentation is available at `/swagger-ui/`.

/// OpenAPI document.
pub mod docs;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
