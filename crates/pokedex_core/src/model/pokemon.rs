//! Pokemon domain model and use-case inputs.
//!
//! # Responsibility
//! - Define the public view of a stored pokemon document.
//! - Define the already-validated inputs handed over by the transport layer.
//!
//! # Invariants
//! - `id` is assigned by the store on creation and never changes.
//! - `no` and `name` are unique across all documents.
//! - Persisted `name` values are always lower-case.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned document identifier.
pub type PokemonId = Uuid;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Public view of a stored pokemon document.
///
/// Internal bookkeeping (`version`, timestamps) stays in the store and is
/// never part of this view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Opaque document identifier.
    pub id: PokemonId,
    /// Human-facing ordinal.
    pub no: u32,
    /// Lower-cased name.
    pub name: String,
}

/// Input for creating a pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePokemonInput {
    pub no: u32,
    pub name: String,
}

impl CreatePokemonInput {
    pub fn new(no: u32, name: impl Into<String>) -> Self {
        Self {
            no,
            name: name.into(),
        }
    }
}

/// Partial update input. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePokemonInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdatePokemonInput {
    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.no.is_none() && self.name.is_none()
    }
}

/// Limit/offset pagination input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInput {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl PaginationInput {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Effective page size, falling back to [`DEFAULT_PAGE_LIMIT`].
    pub fn limit_or_default(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    /// Effective number of skipped documents, falling back to zero.
    pub fn offset_or_default(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// Normalizes a name for persistence.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}
