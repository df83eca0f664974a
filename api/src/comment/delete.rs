use crate::{context::RequestContext, error::AppError};

use super::{Comment, can_mutate_comment};

pub async fn delete_comment(ctx: &RequestContext, id: &str) -> Result<Option<Comment>, AppError> {
    let id = can_mutate_comment(ctx, id).await?;

    ctx.api.comment.remove(id).await
}
