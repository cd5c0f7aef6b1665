//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the document-store primitives the facade builds on.
//! - Isolate SQLite query details and error codes from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateKey`) in
//!   addition to DB transport errors.

pub mod pokemon_repo;
