use crate::{context::RequestContext, error::AppError};

use super::{Comment, can_mutate_comment};

/// Replaces the content of a comment. Returns `None` if the comment vanished
/// between the permission check and the update.
pub async fn update_comment_content(
    ctx: &RequestContext,
    id: &str,
    content: String,
) -> Result<Option<Comment>, AppError> {
    let id = can_mutate_comment(ctx, id).await?;

    ctx.api
        .comment
        .update_content(id, content, ctx.acting_member())
        .await
}
