//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging, store and facade the way a host process would.
//! - Print the first page of the configured store for quick sanity checks.

use log::error;
use pokedex_core::db::open_db;
use pokedex_core::{
    core_version, init_logging, PaginationInput, PokedexConfig, PokemonService,
    SqlitePokemonRepository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("pokedex_cli failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = PokedexConfig::from_env()?;
    if let Some(log_config) = config.log_config() {
        init_logging(&log_config)?;
    }

    println!("pokedex_core version={}", core_version());
    println!("pokedex_core db_path={}", config.db_path.display());

    let conn = open_db(&config.db_path)?;
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    let page = service.find_page(&PaginationInput::default())?;

    println!("pokedex_core page_size={}", page.len());
    for pokemon in page {
        println!("{:>4} {} {}", pokemon.no, pokemon.name, pokemon.id);
    }
    Ok(())
}
