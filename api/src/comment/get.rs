use futures::future::try_join_all;

use crate::{context::RequestContext, error::AppError};

use super::{Comment, parse_id};

pub const DEFAULT_LIMIT: i32 = 10;
pub const DEFAULT_OFFSET: i32 = 0;

/// Lists comments. With `ids`, the `[offset, offset + limit)` slice of the
/// list is resolved through the batched loader and ids that no longer exist
/// are dropped; without, the newest comments are paged from the store.
///
/// `limit = 0` returns an empty list on both paths, it does not mean
/// "unlimited". Negative `limit` or `offset` are clamped to 0, so a negative
/// offset does not count from the end of `ids`.
pub async fn get_list_of_comments(
    ctx: &RequestContext,
    ids: Option<Vec<String>>,
    limit: i32,
    offset: i32,
) -> Result<Vec<Comment>, AppError> {
    // negative windows are treated as empty/zero, there is no upper bound
    let limit = limit.max(0);
    let offset = offset.max(0);

    match ids {
        Some(ids) => {
            let loads = ids
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .map(|raw_id| async move {
                    match parse_id(raw_id) {
                        Some(id) => ctx.api.comment.find_by_id(id).await,
                        None => Ok(None),
                    }
                });

            let comments = try_join_all(loads).await?;

            Ok(comments.into_iter().flatten().collect())
        }
        None => {
            ctx.api
                .comment
                .find_all(offset as i64, limit as i64)
                .await
        }
    }
}

pub async fn get_comment_by_id(ctx: &RequestContext, id: &str) -> Result<Comment, AppError> {
    let comment = match parse_id(id) {
        Some(id) => ctx.api.comment.find_by_id(id).await?,
        None => None,
    };

    comment.ok_or_else(|| {
        AppError::not_found(serde_json::json!({ "reason": "Invalid id for comment" }))
    })
}

pub async fn count_of_comments(
    ctx: &RequestContext,
    parent_id: &str,
    parent_type: &str,
) -> Result<i64, AppError> {
    ctx.api.comment.count_by_parent(parent_id, parent_type).await
}
