pub mod create;
pub mod datasource;
pub mod delete;
pub mod get;
pub mod loader;
pub mod patch;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::{context::RequestContext, error::AppError};

/// Allows creating comments and mutating the ones the member authored.
pub const COMMENT_WRITE_NEW: &str = "comment.write.new";
/// Allows creating comments and mutating any comment.
pub const COMMENT_WRITE_ALL: &str = "comment.write.all";

// The model that maps to the database table
#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub author_name: String,
    pub author_reference: i32,
    pub parent_reference: String,
    pub parent_model: String,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub content: String,
    pub author_name: String,
    pub author_reference: i32,
    pub parent_reference: String,
    pub parent_model: String,
    pub created_by: Option<i32>,
}

/// Comment ids travel as opaque strings on the API surface. Anything that is
/// not an integer can never match a stored comment.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Loads the comment behind `raw_id` and checks that the acting member may
/// update or delete it. Returns the parsed id on success.
///
/// Allowed when the member authored the comment and holds
/// [`COMMENT_WRITE_NEW`], or holds [`COMMENT_WRITE_ALL`] regardless of
/// authorship.
pub(crate) async fn can_mutate_comment(ctx: &RequestContext, raw_id: &str) -> Result<i32, AppError> {
    let comment = match parse_id(raw_id) {
        Some(id) => ctx.api.comment.find_by_id(id).await?,
        None => None,
    };

    let comment = comment.ok_or_else(|| {
        AppError::not_found(serde_json::json!({ "reason": "Requested comments were not found" }))
    })?;

    let is_author = ctx.mid == Some(comment.author_reference);
    let allowed = (is_author && ctx.has_permission(COMMENT_WRITE_NEW))
        || ctx.has_permission(COMMENT_WRITE_ALL);

    if !allowed {
        tracing::info!(
            comment_id = comment.id,
            mid = ?ctx.mid,
            "Denied comment mutation"
        );
        return Err(AppError::forbidden(
            "User does not have required permission to update the comment",
        ));
    }

    Ok(comment.id)
}
