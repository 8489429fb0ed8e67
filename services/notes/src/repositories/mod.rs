//! Repositories for database operations
//!
//! Handlers only see the traits below. Production wires the PostgreSQL
//! implementations; tests and local experiments can use [`InMemoryStore`].

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{NewUser, Note, NoteRequest, User};

pub mod memory;
pub mod note;
pub mod user;

pub use memory::InMemoryStore;
pub use note::PgNoteRepository;
pub use user::PgUserRepository;

/// Name of the unique index guarding `users.email`
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// Name of the foreign key from `notes.user_id` to `users.id`
pub const NOTES_USER_ID_FKEY: &str = "notes_user_id_fkey";

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a taken email yields `DatabaseError::UniqueViolation`
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    /// Exact lookup by (already normalized) email
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Every user, ordered by id
    async fn list(&self) -> DatabaseResult<Vec<User>>;
}

/// Note store; every operation is scoped by the owning user id
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create(&self, user_id: i64, note: &NoteRequest) -> DatabaseResult<Note>;

    /// Notes owned by `user_id`, ordered by id
    async fn list_for_user(&self, user_id: i64) -> DatabaseResult<Vec<Note>>;

    async fn find_owned(&self, id: i64, user_id: i64) -> DatabaseResult<Option<Note>>;

    /// Replace title and content of an owned note; `None` if `(id, user_id)` matches nothing
    async fn update_owned(
        &self,
        id: i64,
        user_id: i64,
        note: &NoteRequest,
    ) -> DatabaseResult<Option<Note>>;

    /// Returns whether an owned note was deleted
    async fn delete_owned(&self, id: i64, user_id: i64) -> DatabaseResult<bool>;
}
