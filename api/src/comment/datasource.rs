use std::{sync::Arc, time::Duration};

use crate::{error::AppError, identity::store::IdentityStore};

use super::{Comment, NewComment, loader::CommentLoader, store::CommentStore};

/// Comment operations exposed to resolvers. Point lookups go through a
/// [`CommentLoader`], everything else straight to the store.
pub struct CommentDataSource {
    store: Arc<dyn CommentStore>,
    identities: Arc<dyn IdentityStore>,
    loader: CommentLoader,
}

impl CommentDataSource {
    pub fn new(
        store: Arc<dyn CommentStore>,
        identities: Arc<dyn IdentityStore>,
        batch_delay: Duration,
    ) -> Self {
        CommentDataSource {
            loader: CommentLoader::new(store.clone(), batch_delay),
            store,
            identities,
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, AppError> {
        self.loader.load(id).await
    }

    pub async fn find_all(&self, offset: i64, limit: i64) -> Result<Vec<Comment>, AppError> {
        Ok(self.store.find_all(offset, limit).await?)
    }

    pub async fn count_by_parent(
        &self,
        parent_reference: &str,
        parent_model: &str,
    ) -> Result<i64, AppError> {
        Ok(self
            .store
            .count_by_parent(parent_reference, parent_model)
            .await?)
    }

    /// Creates a comment on behalf of `author_id`, snapshotting the author's
    /// name. `acting_member` is recorded as `created_by`.
    pub async fn create(
        &self,
        author_id: i32,
        content: String,
        parent_reference: String,
        parent_model: String,
        acting_member: Option<i32>,
    ) -> Result<Comment, AppError> {
        let author = self
            .identities
            .find_user(author_id)
            .await?
            .ok_or(AppError::AuthorNotFound)?;

        let comment = self
            .store
            .insert(NewComment {
                content,
                author_name: author.full_name,
                author_reference: author.id,
                parent_reference,
                parent_model,
                created_by: acting_member,
            })
            .await?;

        tracing::info!(
            comment_id = comment.id,
            parent = %comment.parent_reference,
            model = %comment.parent_model,
            "Created comment"
        );

        Ok(comment)
    }

    pub async fn update_content(
        &self,
        id: i32,
        content: String,
        acting_member: Option<i32>,
    ) -> Result<Option<Comment>, AppError> {
        Ok(self.store.update_content(id, content, acting_member).await?)
    }

    pub async fn remove(&self, id: i32) -> Result<Option<Comment>, AppError> {
        Ok(self.store.delete(id).await?)
    }
}
