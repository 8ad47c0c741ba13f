//! Domain model for category usage tracking.
//!
//! # Responsibility
//! - Define plain value types shared by repository and service layers.
//!
//! # Invariants
//! - Model types carry no storage handles; persistence lives in `repo`.

pub mod category;
