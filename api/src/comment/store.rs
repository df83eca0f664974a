use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{db::PgStore, error::StoreError, schema::comments};

use super::{Comment, NewComment};

/// Persistence operations on the comment collection.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Bulk lookup. Rows come back in no particular order and ids without a
    /// row are simply missing from the result.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Comment>, StoreError>;

    /// Newest first.
    async fn find_all(&self, offset: i64, limit: i64) -> Result<Vec<Comment>, StoreError>;

    async fn count_by_parent(
        &self,
        parent_reference: &str,
        parent_model: &str,
    ) -> Result<i64, StoreError>;

    async fn insert(&self, comment: NewComment) -> Result<Comment, StoreError>;

    async fn update_content(
        &self,
        id: i32,
        content: String,
        updated_by: Option<i32>,
    ) -> Result<Option<Comment>, StoreError>;

    async fn delete(&self, id: i32) -> Result<Option<Comment>, StoreError>;
}

#[async_trait]
impl CommentStore for PgStore {
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Comment>, StoreError> {
        let mut conn = self.conn().await?;

        Ok(comments::table
            .filter(comments::id.eq_any(ids))
            .select(Comment::as_select())
            .load(&mut conn)
            .await?)
    }

    async fn find_all(&self, offset: i64, limit: i64) -> Result<Vec<Comment>, StoreError> {
        let mut conn = self.conn().await?;

        Ok(comments::table
            .order(comments::created_at.desc())
            .offset(offset)
            .limit(limit)
            .select(Comment::as_select())
            .load(&mut conn)
            .await?)
    }

    async fn count_by_parent(
        &self,
        parent_reference: &str,
        parent_model: &str,
    ) -> Result<i64, StoreError> {
        let mut conn = self.conn().await?;

        Ok(comments::table
            .filter(comments::parent_reference.eq(parent_reference))
            .filter(comments::parent_model.eq(parent_model))
            .count()
            .get_result(&mut conn)
            .await?)
    }

    async fn insert(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut conn = self.conn().await?;

        Ok(diesel::insert_into(comments::table)
            .values(&comment)
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await?)
    }

    async fn update_content(
        &self,
        id: i32,
        content: String,
        updated_by: Option<i32>,
    ) -> Result<Option<Comment>, StoreError> {
        let mut conn = self.conn().await?;

        // parent columns are never part of the changeset
        Ok(diesel::update(comments::table.find(id))
            .set((
                comments::content.eq(content),
                comments::updated_by.eq(updated_by),
                comments::updated_at.eq(Utc::now().naive_utc()),
            ))
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?)
    }

    async fn delete(&self, id: i32) -> Result<Option<Comment>, StoreError> {
        let mut conn = self.conn().await?;

        Ok(diesel::delete(comments::table.find(id))
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?)
    }
}
