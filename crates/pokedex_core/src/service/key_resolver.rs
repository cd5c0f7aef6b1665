//! Flexible key resolution.
//!
//! One caller-supplied key may denote an ordinal, a document identifier or a
//! name. Strategies are tried in [`RESOLUTION_ORDER`]; a strategy whose parse
//! does not apply is skipped, and the first lookup that finds a document wins.

use crate::model::pokemon::{Pokemon, PokemonId};
use crate::repo::pokemon_repo::{PokemonRepository, RepoResult};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// One interpretation of a flexible key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Key parses as an unsigned integer; matched against `no`.
    Ordinal,
    /// Key is a syntactically valid document identifier; matched against `id`.
    DocumentId,
    /// Key is matched against `name`, trimmed and lower-cased.
    Name,
}

/// Priority order, highest first.
pub const RESOLUTION_ORDER: [KeyStrategy; 3] = [
    KeyStrategy::Ordinal,
    KeyStrategy::DocumentId,
    KeyStrategy::Name,
];

/// Parsed form of a key under one strategy.
enum ParsedKey {
    Ordinal(u32),
    DocumentId(PokemonId),
    Name(String),
}

impl KeyStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ordinal => "ordinal",
            Self::DocumentId => "document_id",
            Self::Name => "name",
        }
    }

    /// Returns the parsed key when this strategy applies to `key`.
    fn parse(self, key: &str) -> Option<ParsedKey> {
        match self {
            Self::Ordinal => parse_ordinal(key).map(ParsedKey::Ordinal),
            Self::DocumentId => parse_document_id(key).map(ParsedKey::DocumentId),
            Self::Name => Some(ParsedKey::Name(key.trim().to_lowercase())),
        }
    }

    fn lookup<R: PokemonRepository>(self, repo: &R, key: &str) -> RepoResult<Option<Pokemon>> {
        match self.parse(key) {
            Some(ParsedKey::Ordinal(no)) => repo.find_by_no(no),
            Some(ParsedKey::DocumentId(id)) => repo.find_by_id(id),
            Some(ParsedKey::Name(name)) => repo.find_by_name(&name),
            None => Ok(None),
        }
    }
}

impl Display for KeyStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves `key` to a stored pokemon, reporting the strategy that matched.
///
/// Returns `Ok(None)` when no strategy finds a document. Storage errors stop
/// the resolution immediately.
pub fn resolve_key<R: PokemonRepository>(
    repo: &R,
    key: &str,
) -> RepoResult<Option<(Pokemon, KeyStrategy)>> {
    for strategy in RESOLUTION_ORDER {
        if let Some(pokemon) = strategy.lookup(repo, key)? {
            return Ok(Some((pokemon, strategy)));
        }
    }
    Ok(None)
}

fn parse_ordinal(key: &str) -> Option<u32> {
    key.trim().parse::<u32>().ok()
}

fn parse_document_id(key: &str) -> Option<PokemonId> {
    Uuid::parse_str(key).ok()
}
