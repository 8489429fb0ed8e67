//! Repository tests against a real PostgreSQL database
//!
//! Run with `DATABASE_URL` pointing at a scratch database and `--ignored`.

use common::database::{DatabaseConfig, init_pool, run_migrations};
use jsonwebtoken::get_current_timestamp;
use notes::{
    MIGRATOR,
    models::{NewUser, NoteRequest, Role},
    repositories::{NoteRepository, PgNoteRepository, PgUserRepository, UserRepository},
};
use sqlx::PgPool;

async fn migrated_pool() -> PgPool {
    let config = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
    let pool = init_pool(&config).await.expect("database reachable");
    run_migrations(&pool, &MIGRATOR)
        .await
        .expect("migrations apply");
    pool
}

/// Emails must not collide with earlier runs against the same database
fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, get_current_timestamp())
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Pg Test".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        role: Role::User,
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_unique_index_rejects_duplicate_email() {
    let users = PgUserRepository::new(migrated_pool().await);
    let email = unique_email("dup");

    let created = users.create(&new_user(&email)).await.unwrap();
    assert_eq!(created.role, "user");

    let err = users.create(&new_user(&email)).await.unwrap_err();
    assert!(err.is_unique_violation(), "unexpected error: {err}");

    let found = users.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_note_operations_are_owner_scoped() {
    let pool = migrated_pool().await;
    let users = PgUserRepository::new(pool.clone());
    let notes = PgNoteRepository::new(pool);

    let owner = users.create(&new_user(&unique_email("owner"))).await.unwrap();
    let other = users.create(&new_user(&unique_email("other"))).await.unwrap();

    let request = NoteRequest {
        title: "pg note".to_string(),
        content: Some("body".to_string()),
    };
    let note = notes.create(owner.id, &request).await.unwrap();

    assert!(notes.find_owned(note.id, other.id).await.unwrap().is_none());
    assert!(
        notes
            .update_owned(note.id, other.id, &request)
            .await
            .unwrap()
            .is_none()
    );
    assert!(!notes.delete_owned(note.id, other.id).await.unwrap());

    let replaced = NoteRequest {
        title: "pg note v2".to_string(),
        content: None,
    };
    let updated = notes
        .update_owned(note.id, owner.id, &replaced)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "pg note v2");
    assert_eq!(updated.content, None);

    assert!(notes.delete_owned(note.id, owner.id).await.unwrap());
    assert!(notes.find_owned(note.id, owner.id).await.unwrap().is_none());
}
