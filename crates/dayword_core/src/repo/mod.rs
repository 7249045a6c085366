//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the challenge and
//!   feed surfaces.
//! - Isolate SQLite query details from the calling API layer.
//!
//! # Invariants
//! - Repository writes validate model input before SQL mutations.
//! - Multi-document cascades run inside one `IMMEDIATE` transaction.
//! - Repository APIs return semantic errors (`NotFound` kinds) in addition
//!   to DB transport errors.

pub mod challenge_repo;
pub mod feed_repo;
