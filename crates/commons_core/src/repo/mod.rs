//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate storage channel details from service orchestration.
//!
//! # Invariants
//! - Repositories persist values as given; input validation is a service
//!   concern.
//! - "Not found" is an empty result, never an error.

pub mod category_repo;
