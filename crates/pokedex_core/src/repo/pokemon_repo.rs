//! Pokemon repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the document-store primitives (`find`, `findOne`, `findById`,
//!   `create`, `updateOne`, `deleteOne`) over the `pokemons` collection.
//! - Classify driver failures so callers never inspect SQLite error codes.
//!
//! # Invariants
//! - Identifiers are assigned here, never by callers.
//! - Internal columns (`version`, timestamps) are never selected into views.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::pokemon::{CreatePokemonInput, Pokemon, PokemonId, UpdatePokemonInput};
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const POKEMON_SELECT_SQL: &str = "SELECT id, no, name FROM pokemons";
const UNIQUE_FAILURE_PREFIX: &str = "UNIQUE constraint failed: ";

pub type RepoResult<T> = Result<T, RepoError>;

/// Fields carrying a store-enforced uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    No,
    Name,
}

impl UniqueField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Name => "name",
        }
    }

    fn from_column(column: &str) -> Option<Self> {
        match column {
            "no" => Some(Self::No),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

impl Display for UniqueField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository error for pokemon persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// A write collided with another document's unique field.
    DuplicateKey { field: UniqueField, value: String },
    Db(DbError),
    NotFound(PokemonId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey { field, value } => {
                write!(f, "duplicate key on `{field}` with value `{value}`")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "pokemon not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pokemon data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateKey { .. } | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing pokemons ordered by `no`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PokemonListQuery {
    pub limit: u32,
    pub offset: u32,
}

/// Repository interface for the pokemon collection.
pub trait PokemonRepository {
    /// Inserts a new document and returns it with its assigned identifier.
    fn insert_pokemon(&self, input: &CreatePokemonInput) -> RepoResult<Pokemon>;
    fn find_by_no(&self, no: u32) -> RepoResult<Option<Pokemon>>;
    fn find_by_id(&self, id: PokemonId) -> RepoResult<Option<Pokemon>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Pokemon>>;
    fn list_pokemons(&self, query: &PokemonListQuery) -> RepoResult<Vec<Pokemon>>;
    /// Applies only the fields present in `patch`.
    fn update_pokemon(&self, id: PokemonId, patch: &UpdatePokemonInput) -> RepoResult<()>;
    fn delete_pokemon(&self, id: PokemonId) -> RepoResult<()>;
}

/// SQLite-backed pokemon repository.
pub struct SqlitePokemonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePokemonRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn find_first(&self, filter: &str, value: Value) -> RepoResult<Option<Pokemon>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POKEMON_SELECT_SQL} WHERE {filter} = ?1 LIMIT 1;"))?;
        let pokemon = stmt
            .query_row([value], |row| Ok(read_row(row)))
            .optional()?;
        pokemon.transpose()
    }
}

impl PokemonRepository for SqlitePokemonRepository<'_> {
    fn insert_pokemon(&self, input: &CreatePokemonInput) -> RepoResult<Pokemon> {
        let id = Uuid::new_v4();

        self.conn
            .execute(
                "INSERT INTO pokemons (id, no, name) VALUES (?1, ?2, ?3);",
                params![id.to_string(), input.no, input.name.as_str()],
            )
            .map_err(|err| {
                classify_write_error(err, Some(input.no), Some(input.name.as_str()))
            })?;

        Ok(Pokemon {
            id,
            no: input.no,
            name: input.name.clone(),
        })
    }

    fn find_by_no(&self, no: u32) -> RepoResult<Option<Pokemon>> {
        self.find_first("no", Value::Integer(i64::from(no)))
    }

    fn find_by_id(&self, id: PokemonId) -> RepoResult<Option<Pokemon>> {
        self.find_first("id", Value::Text(id.to_string()))
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Pokemon>> {
        self.find_first("name", Value::Text(name.to_string()))
    }

    fn list_pokemons(&self, query: &PokemonListQuery) -> RepoResult<Vec<Pokemon>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POKEMON_SELECT_SQL} ORDER BY no ASC LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![query.limit, query.offset])?;
        let mut pokemons = Vec::new();

        while let Some(row) = rows.next()? {
            pokemons.push(read_row(row)?);
        }

        Ok(pokemons)
    }

    fn update_pokemon(&self, id: PokemonId, patch: &UpdatePokemonInput) -> RepoResult<()> {
        let mut sql = String::from("UPDATE pokemons SET version = version + 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(no) = patch.no {
            sql.push_str(", no = ?");
            bind_values.push(Value::Integer(i64::from(no)));
        }
        if let Some(name) = patch.name.as_ref() {
            sql.push_str(", name = ?");
            bind_values.push(Value::Text(name.clone()));
        }

        sql.push_str(", updated_at = (strftime('%s', 'now') * 1000) WHERE id = ?;");
        bind_values.push(Value::Text(id.to_string()));

        let changed = self
            .conn
            .execute(&sql, params_from_iter(bind_values))
            .map_err(|err| classify_write_error(err, patch.no, patch.name.as_deref()))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_pokemon(&self, id: PokemonId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM pokemons WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn read_row(row: &Row<'_>) -> RepoResult<Pokemon> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid id value `{id_text}` in pokemons.id"))
    })?;

    let no_value: i64 = row.get("no")?;
    let no = u32::try_from(no_value).map_err(|_| {
        RepoError::InvalidData(format!("invalid no value `{no_value}` in pokemons.no"))
    })?;

    Ok(Pokemon {
        id,
        no,
        name: row.get("name")?,
    })
}

/// Maps a failed write to `DuplicateKey` when SQLite reports a uniqueness
/// violation on `no` or `name`, echoing the value the write attempted.
fn classify_write_error(err: rusqlite::Error, no: Option<u32>, name: Option<&str>) -> RepoError {
    let Some(field) = unique_violation_field(&err) else {
        return err.into();
    };

    let value = match field {
        UniqueField::No => no.map(|value| value.to_string()),
        UniqueField::Name => name.map(str::to_string),
    };

    match value {
        Some(value) => RepoError::DuplicateKey { field, value },
        None => err.into(),
    }
}

fn unique_violation_field(err: &rusqlite::Error) -> Option<UniqueField> {
    let rusqlite::Error::SqliteFailure(failure, Some(message)) = err else {
        return None;
    };
    if failure.extended_code != ffi::SQLITE_CONSTRAINT_UNIQUE {
        return None;
    }

    parse_unique_failure_message(message)
}

/// Parses `UNIQUE constraint failed: pokemons.<column>[, ...]`.
fn parse_unique_failure_message(message: &str) -> Option<UniqueField> {
    let columns = message.strip_prefix(UNIQUE_FAILURE_PREFIX)?;
    let first = columns.split(',').next()?.trim();
    let column = first.rsplit('.').next()?;
    UniqueField::from_column(column)
}
