//! In-memory implementation of the repositories
//!
//! Mirrors the PostgreSQL schema's guarantees: generated ids, a unique email
//! index and the `notes.user_id` foreign key. All tables sit behind one
//! mutex, so every call is atomic.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use tokio::sync::Mutex;

use super::{NOTES_USER_ID_FKEY, NoteRepository, USERS_EMAIL_KEY, UserRepository};
use crate::models::{NewUser, Note, NoteRequest, User};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    notes: BTreeMap<i64, Note>,
    last_user_id: i64,
    last_note_id: i64,
}

/// Shared in-memory store; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut tables = self.tables.lock().await;

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::UniqueViolation(USERS_EMAIL_KEY.to_string()));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role.as_str().to_string(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().cloned().collect())
    }
}

#[async_trait]
impl NoteRepository for InMemoryStore {
    async fn create(&self, user_id: i64, note: &NoteRequest) -> DatabaseResult<Note> {
        let mut tables = self.tables.lock().await;

        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::ForeignKeyViolation(
                NOTES_USER_ID_FKEY.to_string(),
            ));
        }

        tables.last_note_id += 1;
        let now = Utc::now();
        let note = Note {
            id: tables.last_note_id,
            title: note.title.clone(),
            content: note.content.clone(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn list_for_user(&self, user_id: i64) -> DatabaseResult<Vec<Note>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notes
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_owned(&self, id: i64, user_id: i64) -> DatabaseResult<Option<Note>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notes
            .get(&id)
            .filter(|n| n.user_id == user_id)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: i64,
        user_id: i64,
        note: &NoteRequest,
    ) -> DatabaseResult<Option<Note>> {
        let mut tables = self.tables.lock().await;

        let Some(existing) = tables.notes.get_mut(&id).filter(|n| n.user_id == user_id) else {
            return Ok(None);
        };

        existing.title = note.title.clone();
        existing.content = note.content.clone();
        existing.updated_at = Utc::now();

        Ok(Some(existing.clone()))
    }

    async fn delete_owned(&self, id: i64, user_id: i64) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;

        let owned = tables.notes.get(&id).is_some_and(|n| n.user_id == user_id);
        if owned {
            tables.notes.remove(&id);
        }

        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: Role::User,
        }
    }

    fn note(title: &str) -> NoteRequest {
        NoteRequest {
            title: title.to_string(),
            content: None,
        }
    }

    #[tokio::test]
    async fn test_unique_email_is_enforced() {
        let store = InMemoryStore::new();

        let first = UserRepository::create(&store, &new_user("a@example.com"))
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.role, "user");

        let err = UserRepository::create(&store, &new_user("a@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_note_requires_existing_owner() {
        let store = InMemoryStore::new();

        let err = NoteRepository::create(&store, 99, &note("orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn test_owned_operations_ignore_foreign_notes() {
        let store = InMemoryStore::new();
        let alice = UserRepository::create(&store, &new_user("alice@example.com"))
            .await
            .unwrap();
        let bob = UserRepository::create(&store, &new_user("bob@example.com"))
            .await
            .unwrap();

        let created = NoteRepository::create(&store, alice.id, &note("alice's"))
            .await
            .unwrap();

        assert!(store.find_owned(created.id, bob.id).await.unwrap().is_none());
        assert!(
            store
                .update_owned(created.id, bob.id, &note("hijacked"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_owned(created.id, bob.id).await.unwrap());
        assert!(store.list_for_user(bob.id).await.unwrap().is_empty());

        let found = store.find_owned(created.id, alice.id).await.unwrap().unwrap();
        assert_eq!(found.title, "alice's");
        assert!(store.delete_owned(created.id, alice.id).await.unwrap());
        assert!(store.find_owned(created.id, alice.id).await.unwrap().is_none());
    }
}
