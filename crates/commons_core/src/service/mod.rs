//! Use-case services built on top of repositories.
//!
//! # Responsibility
//! - Orchestrate repository calls into user-facing operations.
//!
//! # Invariants
//! - Services stay storage-agnostic.

pub mod category_service;
