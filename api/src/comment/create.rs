use crate::{context::RequestContext, error::AppError};

use super::{COMMENT_WRITE_ALL, COMMENT_WRITE_NEW, Comment, parse_id};

pub async fn create_comment(
    ctx: &RequestContext,
    author_id: &str,
    content: String,
    parent_id: String,
    parent_type: String,
) -> Result<Comment, AppError> {
    if !ctx.has_permission(COMMENT_WRITE_NEW) && !ctx.has_permission(COMMENT_WRITE_ALL) {
        return Err(AppError::forbidden(
            "User does not have required permission to create comment",
        ));
    }

    let author_id = parse_id(author_id).ok_or(AppError::AuthorNotFound)?;

    ctx.api
        .comment
        .create(
            author_id,
            content,
            parent_id,
            parent_type,
            ctx.acting_member(),
        )
        .await
}
