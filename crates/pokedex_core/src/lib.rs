//! Core data access for the pokedex.
//! This crate is the single source of truth for pokemon storage invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, PokedexConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LogLevel};
pub use model::pokemon::{
    CreatePokemonInput, PaginationInput, Pokemon, PokemonId, UpdatePokemonInput,
    DEFAULT_PAGE_LIMIT,
};
pub use repo::pokemon_repo::{
    PokemonListQuery, PokemonRepository, RepoError, RepoResult, SqlitePokemonRepository,
    UniqueField,
};
pub use service::key_resolver::{resolve_key, KeyStrategy};
pub use service::pokemon_service::{PokemonError, PokemonResult, PokemonService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
