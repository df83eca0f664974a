use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, ID, Object, Schema, SimpleObject,
    http::GraphiQLSource,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use chrono::NaiveDateTime;

use crate::{
    App,
    comment::{
        Comment, create, delete,
        get::{self, DEFAULT_LIMIT, DEFAULT_OFFSET},
        patch,
    },
    context::RequestContext,
    error::AppError,
};

pub type CommentSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema() -> CommentSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish()
}

fn into_graphql(e: AppError) -> async_graphql::Error {
    e.extend()
}

#[derive(SimpleObject)]
struct CommentAuthor {
    name: String,
    reference: ID,
}

#[derive(SimpleObject)]
struct CommentParent {
    reference: ID,
    model: String,
}

#[Object]
impl Comment {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn content(&self) -> &str {
        &self.content
    }

    async fn author(&self) -> CommentAuthor {
        CommentAuthor {
            name: self.author_name.clone(),
            reference: ID(self.author_reference.to_string()),
        }
    }

    async fn parent(&self) -> CommentParent {
        CommentParent {
            reference: ID(self.parent_reference.clone()),
            model: self.parent_model.clone(),
        }
    }

    async fn created_by(&self) -> Option<ID> {
        self.created_by.map(|id| ID(id.to_string()))
    }

    async fn updated_by(&self) -> Option<ID> {
        self.updated_by.map(|id| ID(id.to_string()))
    }

    async fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    async fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn get_list_of_comments(
        &self,
        ctx: &Context<'_>,
        ids: Option<Vec<ID>>,
        #[graphql(default_with = "DEFAULT_LIMIT")] limit: i32,
        #[graphql(default_with = "DEFAULT_OFFSET")] offset: i32,
    ) -> async_graphql::Result<Vec<Comment>> {
        let req = ctx.data::<RequestContext>()?;
        let ids = ids.map(|ids| ids.into_iter().map(|id| id.0).collect());

        get::get_list_of_comments(req, ids, limit, offset)
            .await
            .map_err(into_graphql)
    }

    async fn get_comment_by_id(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Comment> {
        let req = ctx.data::<RequestContext>()?;

        get::get_comment_by_id(req, &id).await.map_err(into_graphql)
    }

    async fn count_of_comments(
        &self,
        ctx: &Context<'_>,
        id: ID,
        parent_type: String,
    ) -> async_graphql::Result<i64> {
        let req = ctx.data::<RequestContext>()?;

        get::count_of_comments(req, &id, &parent_type)
            .await
            .map_err(into_graphql)
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "authorID")] author_id: ID,
        content: String,
        #[graphql(name = "parentID")] parent_id: ID,
        parent_type: String,
    ) -> async_graphql::Result<Comment> {
        let req = ctx.data::<RequestContext>()?;

        create::create_comment(req, &author_id, content, parent_id.0, parent_type)
            .await
            .map_err(into_graphql)
    }

    async fn update_comment_content(
        &self,
        ctx: &Context<'_>,
        id: ID,
        content: String,
    ) -> async_graphql::Result<Option<Comment>> {
        let req = ctx.data::<RequestContext>()?;

        patch::update_comment_content(req, &id, content)
            .await
            .map_err(into_graphql)
    }

    async fn delete_comment(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<Comment>> {
        let req = ctx.data::<RequestContext>()?;

        delete::delete_comment(req, &id).await.map_err(into_graphql)
    }
}

pub async fn graphql_handler(
    State(app): State<App>,
    ctx: RequestContext,
    req: GraphQLRequest,
) -> GraphQLResponse {
    app.schema.execute(req.into_inner().data(ctx)).await.into()
}

pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
