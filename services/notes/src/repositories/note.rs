//! PostgreSQL note repository

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;

use super::NoteRepository;
use crate::models::{Note, NoteRequest};

/// Note repository
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    /// Create a new note repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn create(&self, user_id: i64, note: &NoteRequest) -> DatabaseResult<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (title, content, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, user_id, created_at, updated_at
            "#,
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(note)
    }

    async fn list_for_user(&self, user_id: i64) -> DatabaseResult<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, user_id, created_at, updated_at
            FROM notes
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(notes)
    }

    async fn find_owned(&self, id: i64, user_id: i64) -> DatabaseResult<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, user_id, created_at, updated_at
            FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(note)
    }

    async fn update_owned(
        &self,
        id: i64,
        user_id: i64,
        note: &NoteRequest,
    ) -> DatabaseResult<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = $3, content = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, title, content, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&note.title)
        .bind(&note.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(note)
    }

    async fn delete_owned(&self, id: i64, user_id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}
