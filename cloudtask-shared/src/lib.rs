//! # CloudTask Shared Library
//!
//! Shared types and business logic used by the CloudTask API server and
//! worker. The heart of the crate is the [`access`] module: the
//! authorization-aware data-access layer that decides who may read or
//! mutate which projects and tasks, and keeps the task cache consistent
//! with the store.
//!
//! ## Module Organization
//!
//! - `models`: database models (users, projects, tasks) and their SQL
//! - `store`: the durable-storage seam (Postgres + in-memory)
//! - `cache`: the TTL key-value cache seam (Redis + in-memory)
//! - `access`: authorization policy and the access service
//! - `auth`: password hashing and JWT tokens
//! - `jobs`: background job queue (Redis list + in-memory)
//! - `db`: connection pool and migrations
//! - `error`: shared error taxonomy

pub mod access;
pub mod auth;
pub mod cache;
pub mod db;
pub mod error;
pub mod jobs;
pub mod models;
pub mod store;

/// Current version of the CloudTask shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
