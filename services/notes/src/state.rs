//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{
    InMemoryStore, NoteRepository, PgNoteRepository, PgUserRepository, UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub user_repository: Arc<dyn UserRepository>,
    pub note_repository: Arc<dyn NoteRepository>,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool, jwt_service: JwtService) -> Self {
        Self {
            jwt_service,
            user_repository: Arc::new(PgUserRepository::new(pool.clone())),
            note_repository: Arc::new(PgNoteRepository::new(pool)),
        }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(jwt_service: JwtService) -> Self {
        let store = InMemoryStore::new();
        Self {
            jwt_service,
            user_repository: Arc::new(store.clone()),
            note_repository: Arc::new(store),
        }
    }
}
