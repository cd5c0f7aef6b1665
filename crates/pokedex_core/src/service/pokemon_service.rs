//! Pokemon use-case facade.
//!
//! # Responsibility
//! - Expose create / find-page / find-one / update / remove entry points.
//! - Normalize names and resolve flexible keys before reaching the store.
//! - Translate repository failures into caller-facing domain errors.
//!
//! # Invariants
//! - Names reach the repository lower-cased.
//! - Storage failures other than uniqueness violations are logged here and
//!   surfaced without internal detail.

use crate::logging::sanitize_message;
use crate::model::pokemon::{
    normalize_name, CreatePokemonInput, PaginationInput, Pokemon, UpdatePokemonInput,
};
use crate::repo::pokemon_repo::{PokemonListQuery, PokemonRepository, RepoError, UniqueField};
use crate::service::key_resolver::resolve_key;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MAX_LOGGED_KEY_CHARS: usize = 64;
const MAX_LOGGED_ERROR_CHARS: usize = 512;

pub type PokemonResult<T> = Result<T, PokemonError>;

/// Caller-facing errors raised by [`PokemonService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokemonError {
    /// Create/update collided with another document's unique field.
    DuplicateKey { field: UniqueField, value: String },
    /// Flexible key matched no document. Carries the original key.
    NotFound(String),
    /// Delete target does not exist. Carries the requested identifier.
    BadRequest(String),
    /// Any other storage failure. Details are only in the server log.
    StorageFailure { operation: &'static str },
}

impl Display for PokemonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey { field, value } => {
                write!(f, "pokemon exists in db with {field} `{value}`")
            }
            Self::NotFound(key) => write!(f, "pokemon with id, name or no `{key}` not found"),
            Self::BadRequest(id) => write!(f, "pokemon with id `{id}` not found"),
            Self::StorageFailure { operation } => {
                write!(f, "can't {operation} pokemon - check server logs")
            }
        }
    }
}

impl Error for PokemonError {}

/// Facade over a [`PokemonRepository`].
pub struct PokemonService<R: PokemonRepository> {
    repo: R,
}

impl<R: PokemonRepository> PokemonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a pokemon with a lower-cased name.
    ///
    /// # Errors
    /// - `DuplicateKey` when `no` or `name` is already taken.
    /// - `StorageFailure` for any other store error.
    pub fn create(&self, input: &CreatePokemonInput) -> PokemonResult<Pokemon> {
        let normalized = CreatePokemonInput {
            no: input.no,
            name: normalize_name(&input.name),
        };

        let pokemon = self
            .repo
            .insert_pokemon(&normalized)
            .map_err(|err| self.handle_storage_error("create", err))?;

        info!(
            "event=pokemon_create module=service status=ok id={} no={}",
            pokemon.id, pokemon.no
        );
        Ok(pokemon)
    }

    /// Returns one page ordered by `no` ascending.
    ///
    /// Missing `limit`/`offset` default to 10 and 0.
    pub fn find_page(&self, pagination: &PaginationInput) -> PokemonResult<Vec<Pokemon>> {
        let query = PokemonListQuery {
            limit: pagination.limit_or_default(),
            offset: pagination.offset_or_default(),
        };

        self.repo
            .list_pokemons(&query)
            .map_err(|err| self.handle_storage_error("list", err))
    }

    /// Finds a pokemon by ordinal, document identifier or name, in that order.
    ///
    /// # Errors
    /// - `NotFound(key)` when no interpretation of `key` matches.
    pub fn find_one(&self, key: &str) -> PokemonResult<Pokemon> {
        match resolve_key(&self.repo, key) {
            Ok(Some((pokemon, strategy))) => {
                debug!(
                    "event=pokemon_resolve module=service status=ok resolved_by={strategy} id={}",
                    pokemon.id
                );
                Ok(pokemon)
            }
            Ok(None) => {
                debug!(
                    "event=pokemon_resolve module=service status=miss key={}",
                    sanitize_message(key, MAX_LOGGED_KEY_CHARS)
                );
                Err(PokemonError::NotFound(key.to_string()))
            }
            Err(err) => Err(self.handle_storage_error("find", err)),
        }
    }

    /// Applies a partial update to the pokemon resolved from `key`.
    ///
    /// Returns the document as persisted after the write. An empty patch
    /// leaves the document untouched.
    ///
    /// # Errors
    /// - `NotFound(key)` when `key` does not resolve, or the document vanished
    ///   before the write landed.
    /// - `DuplicateKey` when the patch collides with another document.
    pub fn update(&self, key: &str, patch: &UpdatePokemonInput) -> PokemonResult<Pokemon> {
        let current = self.find_one(key)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let normalized = UpdatePokemonInput {
            no: patch.no,
            name: patch.name.as_deref().map(normalize_name),
        };

        match self.repo.update_pokemon(current.id, &normalized) {
            Ok(()) => {}
            Err(RepoError::NotFound(_)) => return Err(PokemonError::NotFound(key.to_string())),
            Err(err) => return Err(self.handle_storage_error("update", err)),
        }

        let updated = self
            .repo
            .find_by_id(current.id)
            .map_err(|err| self.handle_storage_error("update", err))?
            .ok_or_else(|| PokemonError::NotFound(key.to_string()))?;

        info!(
            "event=pokemon_update module=service status=ok id={} no={}",
            updated.id, updated.no
        );
        Ok(updated)
    }

    /// Deletes the pokemon with exactly this document identifier.
    ///
    /// # Errors
    /// - `BadRequest(id)` when no document matched, including when `id` is not
    ///   a valid identifier at all.
    pub fn remove(&self, id: &str) -> PokemonResult<()> {
        let Ok(document_id) = Uuid::parse_str(id) else {
            return Err(PokemonError::BadRequest(id.to_string()));
        };

        match self.repo.delete_pokemon(document_id) {
            Ok(()) => {
                info!("event=pokemon_remove module=service status=ok id={document_id}");
                Ok(())
            }
            Err(RepoError::NotFound(_)) => Err(PokemonError::BadRequest(id.to_string())),
            Err(err) => Err(self.handle_storage_error("remove", err)),
        }
    }

    fn handle_storage_error(&self, operation: &'static str, err: RepoError) -> PokemonError {
        match err {
            RepoError::DuplicateKey { field, value } => {
                info!(
                    "event=pokemon_{operation} module=service status=rejected error_code=duplicate_key field={field}"
                );
                PokemonError::DuplicateKey { field, value }
            }
            other => {
                error!(
                    "event=pokemon_{operation} module=service status=error error_code=storage_failure error={}",
                    sanitize_message(&other.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                PokemonError::StorageFailure { operation }
            }
        }
    }
}
