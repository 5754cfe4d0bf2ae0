use poetrystream_core::db::open_db_in_memory;
use poetrystream_core::{
    Alignment, Line, Poem, PoemListQuery, PoemRepository, PoemService, PoemServiceError,
    RepoError, SqlitePoemRepository, Stanza, TextRun,
};
use rusqlite::params;
use uuid::Uuid;

const OWNER: &str = "google-1001";
const OTHER: &str = "google-2002";

fn stanzas() -> Vec<Stanza> {
    vec![
        Stanza::new(
            "s1",
            vec![
                Line::new(vec![
                    TextRun::plain("I wandered ").italic(),
                    TextRun::plain("lonely").bold().underline(),
                ])
                .aligned(Alignment::Center),
                Line::new(Vec::new()),
            ],
        ),
        Stanza::new("s2", Vec::new()),
    ]
}

#[test]
fn create_and_get_round_trips_full_hierarchy() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePoemRepository::try_new(&conn).unwrap();

    let poem = Poem::new(stanzas());
    let id = repo.create_poem(OWNER, Some("Daffodils"), &poem).unwrap();

    let stored = repo.get_poem(id).unwrap().unwrap();
    assert_eq!(stored.poem, poem);
    assert_eq!(stored.user_id, OWNER);
    assert_eq!(stored.title.as_deref(), Some("Daffodils"));
    assert!(stored.created_at > 0);
}

#[test]
fn get_missing_poem_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePoemRepository::try_new(&conn).unwrap();
    assert!(repo.get_poem(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn writes_are_scoped_to_owner() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePoemRepository::try_new(&conn).unwrap();
    let poem = Poem::new(stanzas());
    repo.create_poem(OWNER, None, &poem).unwrap();

    let edited = Poem::with_id(poem.id, Vec::new());
    let update_err = repo.update_poem(OTHER, None, &edited).unwrap_err();
    assert!(matches!(update_err, RepoError::NotFound(id) if id == poem.id));

    let delete_err = repo.delete_poem(OTHER, poem.id).unwrap_err();
    assert!(matches!(delete_err, RepoError::NotFound(_)));

    assert_eq!(repo.get_poem(poem.id).unwrap().unwrap().poem, poem);
}

#[test]
fn list_returns_only_owner_poems_in_stable_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePoemRepository::try_new(&conn).unwrap();

    let older = Poem::new(stanzas());
    let newer = Poem::new(Vec::new());
    let foreign = Poem::new(Vec::new());
    repo.create_poem(OWNER, Some("older"), &older).unwrap();
    repo.create_poem(OWNER, Some("newer"), &newer).unwrap();
    repo.create_poem(OTHER, Some("foreign"), &foreign).unwrap();

    conn.execute(
        "UPDATE poems SET updated_at = 1000 WHERE uuid = ?1;",
        params![older.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE poems SET updated_at = 2000 WHERE uuid = ?1;",
        params![newer.id.to_string()],
    )
    .unwrap();

    let listed = repo
        .list_poems_for_user(&PoemListQuery {
            user_id: OWNER.to_string(),
            ..PoemListQuery::default()
        })
        .unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|stored| stored.poem.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    let page = repo
        .list_poems_for_user(&PoemListQuery {
            user_id: OWNER.to_string(),
            limit: Some(1),
            offset: 1,
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].poem.id, older.id);
}

#[test]
fn corrupt_body_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePoemRepository::try_new(&conn).unwrap();
    let poem = Poem::new(stanzas());
    repo.create_poem(OWNER, None, &poem).unwrap();

    conn.execute(
        "UPDATE poems SET body = '{\"not\": \"stanzas\"}' WHERE uuid = ?1;",
        params![poem.id.to_string()],
    )
    .unwrap();

    let err = repo.get_poem(poem.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_requires_migrated_schema() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqlitePoemRepository::try_new(&conn)
        .err()
        .expect("unmigrated connection should be rejected");
    assert!(matches!(err, RepoError::MissingRequiredTable("poems")));
}

#[test]
fn service_creates_saves_lists_and_renders() {
    let conn = open_db_in_memory().unwrap();
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());

    let created = service
        .create_poem(OWNER, Some("  Daffodils "), stanzas())
        .unwrap();
    assert_eq!(created.title.as_deref(), Some("Daffodils"));
    assert_eq!(created.poem.stanzas, stanzas());

    let revised = vec![Stanza::new(
        "s1",
        vec![Line::new(vec![TextRun::plain("a host")])],
    )];
    let saved = service
        .save_stanzas(OWNER, created.poem.id, Some("Daffodils"), revised.clone())
        .unwrap();
    assert_eq!(saved.poem.stanzas, revised);

    let page = service.list_poems(OWNER, Some(500), 0).unwrap();
    assert_eq!(page.applied_limit, 100);
    assert_eq!(page.items.len(), 1);

    let view = service.render_poem(OWNER, created.poem.id).unwrap();
    assert_eq!(view.poem_id, created.poem.id);
    assert_eq!(view.stanzas[0].lines[0].spans[0].text, "a host");
    assert_eq!(view.stanzas[0].lines[0].alignment, Alignment::Left);
}

#[test]
fn service_maps_missing_poems_and_blank_owner() {
    let conn = open_db_in_memory().unwrap();
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    assert!(matches!(
        service.render_poem(OWNER, missing),
        Err(PoemServiceError::PoemNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete_poem(OWNER, missing),
        Err(PoemServiceError::PoemNotFound(_))
    ));
    assert!(matches!(
        service.create_poem(" ", None, Vec::new()),
        Err(PoemServiceError::InvalidOwner)
    ));
}

#[test]
fn service_delete_removes_poem() {
    let conn = open_db_in_memory().unwrap();
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let created = service.create_poem(OWNER, None, stanzas()).unwrap();

    service.delete_poem(OWNER, created.poem.id).unwrap();
    assert!(service.get_poem(OWNER, created.poem.id).unwrap().is_none());
}

#[test]
fn service_reads_are_scoped_to_owner() {
    let conn = open_db_in_memory().unwrap();
    let service = PoemService::new(SqlitePoemRepository::try_new(&conn).unwrap());
    let created = service.create_poem(OWNER, None, stanzas()).unwrap();
    let id = created.poem.id;

    assert_eq!(service.get_poem(OWNER, id).unwrap(), Some(created));
    assert!(service.get_poem(OTHER, id).unwrap().is_none());
    assert!(matches!(
        service.render_poem(OTHER, id),
        Err(PoemServiceError::PoemNotFound(found)) if found == id
    ));
    assert!(matches!(
        service.get_poem("  ", id),
        Err(PoemServiceError::InvalidOwner)
    ));
}
