//! Domain model for the pokedex store.
//!
//! # Responsibility
//! - Define the canonical pokemon view returned by core APIs.
//! - Define the input shapes accepted by the facade.
//!
//! # Invariants
//! - Every stored pokemon is identified by a store-assigned `PokemonId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod pokemon;
