use pokedex_core::db::open_db_in_memory;
use pokedex_core::{
    CreatePokemonInput, PaginationInput, Pokemon, PokemonError, PokemonService,
    SqlitePokemonRepository, UniqueField, UpdatePokemonInput,
};
use rusqlite::Connection;

fn seed(service: &PokemonService<SqlitePokemonRepository<'_>>, entries: &[(u32, &str)]) {
    for (no, name) in entries {
        service
            .create(&CreatePokemonInput::new(*no, *name))
            .unwrap();
    }
}

fn stored_version(conn: &Connection, pokemon: &Pokemon) -> i64 {
    conn.query_row(
        "SELECT version FROM pokemons WHERE id = ?1",
        [pokemon.id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn create_lowercases_name_and_assigns_id() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));

    let created = service
        .create(&CreatePokemonInput::new(25, "PiKaChU"))
        .unwrap();
    assert_eq!(created.no, 25);
    assert_eq!(created.name, "pikachu");

    let stored_name: String = conn
        .query_row(
            "SELECT name FROM pokemons WHERE id = ?1",
            [created.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored_name, "pikachu");
}

#[test]
fn create_with_duplicate_no_returns_duplicate_key() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(1, "bulbasaur")]);

    let err = service
        .create(&CreatePokemonInput::new(1, "ivysaur"))
        .unwrap_err();
    assert_eq!(
        err,
        PokemonError::DuplicateKey {
            field: UniqueField::No,
            value: "1".to_string(),
        }
    );
}

#[test]
fn create_with_duplicate_name_in_other_case_returns_duplicate_key() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(1, "bulbasaur")]);

    let err = service
        .create(&CreatePokemonInput::new(2, "BULBASAUR"))
        .unwrap_err();
    assert_eq!(
        err,
        PokemonError::DuplicateKey {
            field: UniqueField::Name,
            value: "bulbasaur".to_string(),
        }
    );

    let all = service.find_page(&PaginationInput::default()).unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn find_page_orders_by_no_and_applies_limit_offset() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(
        &service,
        &[(4, "charmander"), (1, "bulbasaur"), (7, "squirtle"), (2, "ivysaur")],
    );

    let page = service.find_page(&PaginationInput::new(2, 1)).unwrap();
    let numbers: Vec<u32> = page.iter().map(|pokemon| pokemon.no).collect();
    assert_eq!(numbers, vec![2, 4]);
}

#[test]
fn find_page_uses_default_limit_of_ten() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    for no in 1..=12 {
        service
            .create(&CreatePokemonInput::new(no, format!("pokemon-{no}")))
            .unwrap();
    }

    let page = service.find_page(&PaginationInput::default()).unwrap();
    assert_eq!(page.len(), 10);
    assert_eq!(page[0].no, 1);
    assert_eq!(page[9].no, 10);

    let rest = service
        .find_page(&PaginationInput {
            limit: None,
            offset: Some(10),
        })
        .unwrap();
    let numbers: Vec<u32> = rest.iter().map(|pokemon| pokemon.no).collect();
    assert_eq!(numbers, vec![11, 12]);
}

#[test]
fn find_page_past_the_end_or_with_zero_limit_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(1, "bulbasaur")]);

    assert!(service
        .find_page(&PaginationInput::new(10, 5))
        .unwrap()
        .is_empty());
    assert!(service
        .find_page(&PaginationInput::new(0, 0))
        .unwrap()
        .is_empty());
}

#[test]
fn page_view_does_not_expose_internal_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(1, "bulbasaur")]);

    let page = service.find_page(&PaginationInput::default()).unwrap();
    let json = serde_json::to_value(&page[0]).unwrap();
    let object = json.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["id", "name", "no"]);
}

#[test]
fn update_lowercases_name_and_keeps_no() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(25, "pikachu")]);

    let patch = UpdatePokemonInput {
        no: None,
        name: Some("RAICHU".to_string()),
    };
    let updated = service.update("pikachu", &patch).unwrap();
    assert_eq!(updated.name, "raichu");
    assert_eq!(updated.no, 25);

    let reloaded = service.find_one("25").unwrap();
    assert_eq!(reloaded, updated);
    assert_eq!(stored_version(&conn, &reloaded), 1);
}

#[test]
fn update_changes_only_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(25, "pikachu")]);
    let original = service.find_one("pikachu").unwrap();

    let patch = UpdatePokemonInput {
        no: Some(26),
        name: None,
    };
    let updated = service.update(&original.id.to_string(), &patch).unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.no, 26);
    assert_eq!(updated.name, "pikachu");
}

#[test]
fn update_with_empty_patch_returns_current_document() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(25, "pikachu")]);

    let unchanged = service
        .update("25", &UpdatePokemonInput::default())
        .unwrap();
    assert_eq!(unchanged.name, "pikachu");
    assert_eq!(stored_version(&conn, &unchanged), 0);
}

#[test]
fn update_unknown_key_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));

    let patch = UpdatePokemonInput {
        no: Some(3),
        name: None,
    };
    let err = service.update("missingno", &patch).unwrap_err();
    assert_eq!(err, PokemonError::NotFound("missingno".to_string()));
}

#[test]
fn update_colliding_with_other_document_returns_duplicate_key() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(25, "pikachu"), (26, "raichu")]);

    let patch = UpdatePokemonInput {
        no: None,
        name: Some("Raichu".to_string()),
    };
    let err = service.update("25", &patch).unwrap_err();
    assert_eq!(
        err,
        PokemonError::DuplicateKey {
            field: UniqueField::Name,
            value: "raichu".to_string(),
        }
    );

    let patch = UpdatePokemonInput {
        no: Some(26),
        name: None,
    };
    let err = service.update("pikachu", &patch).unwrap_err();
    assert!(matches!(
        err,
        PokemonError::DuplicateKey { field: UniqueField::No, ref value } if value == "26"
    ));

    assert_eq!(service.find_one("25").unwrap().name, "pikachu");
}

#[test]
fn remove_existing_then_lookup_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(25, "pikachu")]);
    let pokemon = service.find_one("pikachu").unwrap();
    let id = pokemon.id.to_string();

    service.remove(&id).unwrap();

    assert_eq!(
        service.find_one(&id).unwrap_err(),
        PokemonError::NotFound(id.clone())
    );
    assert!(service
        .find_page(&PaginationInput::default())
        .unwrap()
        .is_empty());
}

#[test]
fn remove_missing_id_returns_bad_request() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));

    let missing = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    assert_eq!(
        service.remove(missing).unwrap_err(),
        PokemonError::BadRequest(missing.to_string())
    );
}

#[test]
fn remove_does_not_resolve_names_or_ordinals() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::new(&conn));
    seed(&service, &[(25, "pikachu")]);

    assert_eq!(
        service.remove("pikachu").unwrap_err(),
        PokemonError::BadRequest("pikachu".to_string())
    );
    assert_eq!(
        service.remove("25").unwrap_err(),
        PokemonError::BadRequest("25".to_string())
    );
    assert!(service.find_one("pikachu").is_ok());
}
