use poetrystream_core::db::open_db_in_memory;
use poetrystream_core::{
    resolve_redirect, AccountRepository, CandidateUser, ProviderAccount, ReconcileOutcome,
    SignInCallback, SignInError, SignInReconciler, SqliteAccountRepository,
};
use rusqlite::Connection;

fn callback(email: &str, provider_account_id: &str) -> SignInCallback {
    SignInCallback {
        user: CandidateUser {
            name: Some("Ada Lovelace".to_string()),
            email: Some(email.to_string()),
            image: Some("https://img.test/ada.png".to_string()),
        },
        account: ProviderAccount {
            provider: "google".to_string(),
            provider_account_id: provider_account_id.to_string(),
        },
    }
}

fn user_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn first_sign_in_creates_exactly_one_account() {
    let conn = open_db_in_memory().unwrap();
    let reconciler = SignInReconciler::new(SqliteAccountRepository::try_new(&conn).unwrap());

    let outcome = reconciler
        .reconcile(&callback("ada@x.test", "1001"))
        .unwrap();

    assert!(outcome.is_created());
    let account = outcome.account();
    assert_eq!(account.id, "google-1001");
    assert_eq!(account.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(account.email, "ada@x.test");
    assert_eq!(account.image.as_deref(), Some("https://img.test/ada.png"));
    assert!(account.created_at > 0);
    assert_eq!(user_count(&conn), 1);
}

#[test]
fn repeated_sign_in_keeps_existing_account_and_allows_session() {
    let conn = open_db_in_memory().unwrap();
    let reconciler = SignInReconciler::new(SqliteAccountRepository::try_new(&conn).unwrap());

    assert!(reconciler.sign_in(&callback("ada@x.test", "1001")));
    let second = reconciler
        .reconcile(&callback("ada@x.test", "2002"))
        .unwrap();

    match second {
        ReconcileOutcome::Existing(account) => assert_eq!(account.id, "google-1001"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(reconciler.sign_in(&callback("ada@x.test", "1001")));
    assert_eq!(user_count(&conn), 1);
}

#[test]
fn email_match_is_case_insensitive() {
    let conn = open_db_in_memory().unwrap();
    let reconciler = SignInReconciler::new(SqliteAccountRepository::try_new(&conn).unwrap());

    assert!(reconciler.sign_in(&callback("Ada@X.test", "1001")));
    let outcome = reconciler
        .reconcile(&callback("ada@x.test", "1001"))
        .unwrap();
    assert!(!outcome.is_created());
    assert_eq!(user_count(&conn), 1);
}

#[test]
fn provider_account_with_new_email_is_allowed_and_stored() {
    let conn = open_db_in_memory().unwrap();
    let reconciler = SignInReconciler::new(SqliteAccountRepository::try_new(&conn).unwrap());

    assert!(reconciler.sign_in(&callback("old@x.test", "1001")));
    let outcome = reconciler
        .reconcile(&callback("new@x.test", "1001"))
        .unwrap();

    assert!(outcome.is_created());
    assert_eq!(outcome.account().id, "google-1001");
    assert_eq!(outcome.account().email, "new@x.test");
    assert!(reconciler.sign_in(&callback("new@x.test", "1001")));
    assert_eq!(user_count(&conn), 2);
}

#[test]
fn independent_reconcilers_never_duplicate_an_email() {
    let conn = open_db_in_memory().unwrap();
    let first = SignInReconciler::new(SqliteAccountRepository::try_new(&conn).unwrap());
    let second = SignInReconciler::new(SqliteAccountRepository::try_new(&conn).unwrap());

    let a = first.reconcile(&callback("ada@x.test", "1001")).unwrap();
    let b = second.reconcile(&callback("ada@x.test", "1001")).unwrap();

    assert!(a.is_created());
    assert!(!b.is_created());
    assert_eq!(user_count(&conn), 1);
}

#[test]
fn storage_failure_denies_sign_in() {
    let conn = open_db_in_memory().unwrap();
    let reconciler = SignInReconciler::new(SqliteAccountRepository::try_new(&conn).unwrap());
    conn.execute_batch("DROP TABLE users;").unwrap();

    assert!(matches!(
        reconciler.reconcile(&callback("ada@x.test", "1001")),
        Err(SignInError::StorageUnavailable(_))
    ));
    assert!(!reconciler.sign_in(&callback("ada@x.test", "1001")));
}

#[test]
fn missing_email_denies_sign_in() {
    let conn = open_db_in_memory().unwrap();
    let reconciler = SignInReconciler::new(SqliteAccountRepository::try_new(&conn).unwrap());

    let mut no_email = callback("", "1001");
    no_email.user.email = None;
    assert!(!reconciler.sign_in(&no_email));
    assert_eq!(user_count(&conn), 0);
}

#[test]
fn poem_owner_index_is_ensured_idempotently() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP INDEX idx_poems_user_id;").unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();

    repo.ensure_poem_owner_index().unwrap();
    repo.ensure_poem_owner_index().unwrap();

    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master
                WHERE type = 'index' AND name = 'idx_poems_user_id'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(exists);
}

#[test]
fn redirect_examples() {
    let base = "https://x.test";
    assert_eq!(resolve_redirect("https://x.test/auth/", base), "https://x.test");
    assert_eq!(resolve_redirect("https://evil.test/phish", base), "https://x.test");
    assert_eq!(
        resolve_redirect("https://x.test/poems/42", base),
        "https://x.test/poems/42"
    );
}
